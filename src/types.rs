use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a ledger entry
pub type TransactionId = Uuid;

/// direction of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// money owed to the ledger owner
    Receivable,
    /// money the ledger owner owes
    Payable,
}

/// lifecycle status of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// installments still outstanding
    Active,
    /// all installments retired; terminal
    Settled,
}

/// one recorded payment; immutable once appended to the history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// date the payment was recorded, as supplied by the user
    pub date: NaiveDate,
    /// portion applied to principal + interest (excludes the fine portion)
    pub amount: Money,
    /// portion applied to accrued fines
    pub fine: Money,
    /// installment periods retired by this record; 0 for fine-only payments
    pub installments_paid: u32,
    /// change returned to the payer, never carried forward as credit
    pub remaining_balance: Money,
}
