use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// position of an upcoming installment relative to a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DueStatus {
    /// the next installment's due date has passed
    Overdue { days: i64 },
    DueToday,
    /// due within the next seven days
    DueSoon { days: i64 },
    OnTrack,
    /// no installment remains
    FullyPaid,
}

/// due date of installment `index` (1-based): the start date advanced by
/// `index` calendar months, with the day clamped to the last day of the
/// target month when the start day does not exist there (jan 31 -> feb 28/29)
///
/// returns `None` for `index == 0` or when the projection leaves chrono's
/// representable range
pub fn due_date_of(start_date: NaiveDate, index: u32) -> Option<NaiveDate> {
    if index == 0 {
        return None;
    }
    start_date.checked_add_months(Months::new(index))
}

/// due date of the next unpaid installment; `None` when every installment
/// has been retired
pub fn next_due_date(transaction: &Transaction) -> Option<NaiveDate> {
    let next_index = transaction.installments_paid() + 1;
    if next_index > transaction.installment_count {
        return None;
    }
    due_date_of(transaction.start_date, next_index)
}

/// classify the next due date against a reference date
pub fn due_status(next_due: Option<NaiveDate>, today: NaiveDate) -> DueStatus {
    let due = match next_due {
        Some(date) => date,
        None => return DueStatus::FullyPaid,
    };

    let days = (due - today).num_days();
    if days < 0 {
        DueStatus::Overdue { days: -days }
    } else if days == 0 {
        DueStatus::DueToday
    } else if days <= 7 {
        DueStatus::DueSoon { days }
    } else {
        DueStatus::OnTrack
    }
}
