use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::amortization::FlatTerms;
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::types::{PaymentRecord, TransactionId, TransactionKind, TransactionStatus};

/// input for a new ledger entry, validated at the boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub counterparty: String,
    pub principal: Money,
    pub interest_rate: Rate,
    pub installment_count: u32,
    pub start_date: NaiveDate,
}

impl TransactionDraft {
    /// reject drafts the engine must never see
    pub fn validate(&self) -> Result<()> {
        if self.counterparty.trim().is_empty() {
            return Err(LedgerError::InvalidDraft {
                message: "counterparty must not be empty".to_string(),
            });
        }
        if !self.principal.is_positive() {
            return Err(LedgerError::InvalidDraft {
                message: format!("principal must be positive, got {}", self.principal),
            });
        }
        if self.interest_rate.is_negative() {
            return Err(LedgerError::InvalidDraft {
                message: format!("interest rate must not be negative, got {}", self.interest_rate),
            });
        }
        if self.installment_count == 0 {
            return Err(LedgerError::InvalidDraft {
                message: "installment count must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// a ledger entry: one loan or debt with its full payment history
///
/// owned exclusively by the [`Ledger`](crate::ledger::Ledger); mutated only
/// through payment allocation or deletion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub counterparty: String,
    pub principal: Money,
    pub interest_rate: Rate,
    pub installment_count: u32,
    pub start_date: NaiveDate,
    pub status: TransactionStatus,
    pub date_completed: Option<NaiveDate>,
    /// insertion order is recording order, not necessarily `date` order
    pub payment_history: Vec<PaymentRecord>,
}

impl Transaction {
    /// create a new active entry from a validated draft
    pub fn from_draft(draft: TransactionDraft) -> Result<Self> {
        draft.validate()?;

        Ok(Self {
            id: Uuid::new_v4(),
            kind: draft.kind,
            counterparty: draft.counterparty.trim().to_string(),
            principal: draft.principal,
            interest_rate: draft.interest_rate,
            installment_count: draft.installment_count,
            start_date: draft.start_date,
            status: TransactionStatus::Active,
            date_completed: None,
            payment_history: Vec::new(),
        })
    }

    /// static repayment terms for this entry
    pub fn terms(&self) -> FlatTerms {
        FlatTerms::compute(self.principal, self.interest_rate, self.installment_count)
    }

    /// installment periods retired across the whole history
    pub fn installments_paid(&self) -> u32 {
        self.payment_history
            .iter()
            .map(|record| record.installments_paid)
            .sum()
    }

    /// installment periods still outstanding
    pub fn remaining_installments(&self) -> u32 {
        self.installment_count.saturating_sub(self.installments_paid())
    }

    pub fn is_active(&self) -> bool {
        self.status == TransactionStatus::Active
    }

    pub fn is_settled(&self) -> bool {
        self.status == TransactionStatus::Settled
    }

    /// one-way transition to settled; `date_completed` is set exactly once
    pub(crate) fn settle(&mut self, date: NaiveDate) {
        if self.status == TransactionStatus::Active {
            self.status = TransactionStatus::Settled;
            self.date_completed = Some(date);
        }
    }

    /// due date of the next unpaid installment; `None` when fully paid
    pub fn next_due_date(&self) -> Option<NaiveDate> {
        crate::schedule::next_due_date(self)
    }
}
