use thiserror::Error;

use crate::decimal::Money;
use crate::types::{TransactionId, TransactionStatus};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("transaction not active: current status is {status:?}")]
    TransactionNotActive {
        status: TransactionStatus,
    },

    #[error("transaction not found: {id}")]
    TransactionNotFound {
        id: TransactionId,
    },

    #[error("invalid draft: {message}")]
    InvalidDraft {
        message: String,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
