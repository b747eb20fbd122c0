//! due reminders
//!
//! walks the active side of the ledger and produces reminder data; how
//! the reminders reach the user (notifications, a list, nothing) is the
//! caller's concern

use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::fines::FineEngine;
use crate::ledger::Ledger;
use crate::schedule::{due_status, DueStatus};
use crate::types::{TransactionId, TransactionKind};

/// why a transaction needs attention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReminderKind {
    /// fines have accrued; `amount_due` is overdue balance plus fines
    FineAccruing {
        total_fine: Money,
        amount_due: Money,
    },
    /// the next installment is overdue or imminent
    PaymentDue {
        status: DueStatus,
        overdue_balance: Money,
    },
}

/// one reminder for one active transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub transaction_id: TransactionId,
    pub counterparty: String,
    pub kind: TransactionKind,
    pub urgency: ReminderKind,
}

/// collect reminders for every active entry that warrants one, as of the
/// injected clock's current date
pub fn collect(ledger: &Ledger, time: &SafeTimeProvider) -> Vec<Reminder> {
    let today = time.now().date_naive();
    let engine = FineEngine::new(ledger.fine_config());
    let mut reminders = Vec::new();

    for tx in ledger.active() {
        let next_due = tx.next_due_date();
        if next_due.is_none() {
            continue;
        }

        let statement = engine.assess(tx, today);

        let urgency = if statement.total_fine.is_positive() {
            ReminderKind::FineAccruing {
                total_fine: statement.total_fine,
                amount_due: statement.amount_due(),
            }
        } else {
            match due_status(next_due, today) {
                status @ (DueStatus::Overdue { .. }
                | DueStatus::DueToday
                | DueStatus::DueSoon { .. }) => ReminderKind::PaymentDue {
                    status,
                    overdue_balance: statement.overdue_balance,
                },
                DueStatus::OnTrack | DueStatus::FullyPaid => continue,
            }
        };

        reminders.push(Reminder {
            transaction_id: tx.id,
            counterparty: tx.counterparty.clone(),
            kind: tx.kind,
            urgency,
        });
    }

    reminders
}
