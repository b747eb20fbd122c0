use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::schedule::due_date_of;
use crate::transaction::Transaction;

/// penalty policy for overdue installments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FineConfig {
    /// penalty rate applied once per late period to the overdue balance
    pub rate: Rate,
    /// fixed length of a late period in days; deliberately NOT calendar
    /// months, matching the ledgers this model has to reproduce
    pub period_days: i64,
}

impl Default for FineConfig {
    fn default() -> Self {
        Self {
            rate: Rate::from_percent(dec!(5)),
            period_days: 30,
        }
    }
}

/// one late period of compounded penalty; amounts are reported rounded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinePeriod {
    /// 1-based late period index
    pub period: u32,
    pub fine: Money,
    /// overdue balance the fine was computed on, before the fine was added
    pub basis: Money,
}

/// arrears of a transaction as of a reference date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ArrearsStatement {
    /// overdue installment balance, rounded
    pub overdue_balance: Money,
    /// accumulated penalty, rounded
    pub total_fine: Money,
    pub overdue_count: u32,
    /// total payable minus installments already retired, rounded
    pub remaining_total: Money,
    pub fine_details: Vec<FinePeriod>,
    pub first_overdue_date: Option<NaiveDate>,
}

impl ArrearsStatement {
    /// the current bill: overdue installments plus accrued fines
    pub fn amount_due(&self) -> Money {
        self.overdue_balance + self.total_fine
    }
}

/// engine deriving overdue balance and compounded penalty
///
/// pure with respect to its inputs: assessing the same transaction twice
/// with the same reference date yields the same statement
pub struct FineEngine {
    pub config: FineConfig,
}

impl FineEngine {
    pub fn new(config: FineConfig) -> Self {
        Self { config }
    }

    /// assess arrears as of `as_of`; settled transactions report all zeroes
    pub fn assess(&self, transaction: &Transaction, as_of: NaiveDate) -> ArrearsStatement {
        if !transaction.is_active() {
            return ArrearsStatement::default();
        }

        let terms = transaction.terms();
        let per_installment = terms.per_installment.as_decimal();
        let paid = transaction.installments_paid();

        // walk unpaid installments strictly in order; the first one still
        // inside its due date stops the scan, there is no out-of-order
        // catch-up
        let mut overdue_balance = Decimal::ZERO;
        let mut overdue_count = 0u32;
        let mut first_overdue_date = None;

        for index in paid + 1..=transaction.installment_count {
            let due = match due_date_of(transaction.start_date, index) {
                Some(date) => date,
                None => break,
            };
            if as_of > due {
                overdue_balance += per_installment;
                overdue_count += 1;
                if first_overdue_date.is_none() {
                    first_overdue_date = Some(due);
                }
            } else {
                break;
            }
        }

        // compound the penalty once per full late period since the first
        // overdue date; the balance carries earlier fines (interest on
        // interest) and keeps full precision between periods, only the
        // reported figures round
        let mut total_fine = Decimal::ZERO;
        let mut fine_details = Vec::new();

        if let Some(first_overdue) = first_overdue_date {
            let days_late = (as_of - first_overdue).num_days();
            let periods_late = days_late / self.config.period_days;

            let rate = self.config.rate.as_decimal();
            let mut balance = overdue_balance;

            for period in 1..=periods_late.max(0) as u32 {
                let fine = balance * rate;
                fine_details.push(FinePeriod {
                    period,
                    fine: Money::from_decimal(fine).round_whole(),
                    basis: Money::from_decimal(balance).round_whole(),
                });
                balance += fine;
                total_fine += fine;
            }
        }

        let retired = per_installment * Decimal::from(paid);
        let remaining_total = terms.total_amount.as_decimal() - retired;

        ArrearsStatement {
            overdue_balance: Money::from_decimal(overdue_balance).round_whole(),
            total_fine: Money::from_decimal(total_fine).round_whole(),
            overdue_count,
            remaining_total: Money::from_decimal(remaining_total).round_whole(),
            fine_details,
            first_overdue_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionDraft;
    use crate::types::{PaymentRecord, TransactionKind};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn transaction(principal: i64, rate_percent: Decimal, count: u32) -> Transaction {
        Transaction::from_draft(TransactionDraft {
            kind: TransactionKind::Receivable,
            counterparty: "Agus".to_string(),
            principal: Money::from_major(principal),
            interest_rate: Rate::from_percent(rate_percent),
            installment_count: count,
            start_date: ymd(2024, 1, 15),
        })
        .unwrap()
    }

    fn engine() -> FineEngine {
        FineEngine::new(FineConfig::default())
    }

    #[test]
    fn test_two_late_periods_compound() {
        // single installment of exactly 1,000,000, due 2024-02-15;
        // 61 days late puts it two full 30-day periods overdue
        let tx = transaction(1_000_000, dec!(0), 1);
        let statement = engine().assess(&tx, ymd(2024, 4, 16));

        assert_eq!(statement.overdue_count, 1);
        assert_eq!(statement.overdue_balance, Money::from_major(1_000_000));
        assert_eq!(statement.total_fine, Money::from_major(102_500));
        assert_eq!(statement.fine_details.len(), 2);
        assert_eq!(statement.fine_details[0].fine, Money::from_major(50_000));
        assert_eq!(statement.fine_details[0].basis, Money::from_major(1_000_000));
        assert_eq!(statement.fine_details[1].fine, Money::from_major(52_500));
        assert_eq!(statement.fine_details[1].basis, Money::from_major(1_050_000));
        assert_eq!(statement.amount_due(), Money::from_major(1_102_500));
    }

    #[test]
    fn test_period_boundaries() {
        let tx = transaction(1_000_000, dec!(0), 1);
        // due 2024-02-15

        // 29 days late: overdue but inside the first late period
        let statement = engine().assess(&tx, ymd(2024, 3, 15));
        assert_eq!(statement.overdue_count, 1);
        assert_eq!(statement.total_fine, Money::ZERO);
        assert!(statement.fine_details.is_empty());

        // exactly 30 days late: one full period
        let statement = engine().assess(&tx, ymd(2024, 3, 16));
        assert_eq!(statement.total_fine, Money::from_major(50_000));

        // 59 days late: still one period
        let statement = engine().assess(&tx, ymd(2024, 4, 14));
        assert_eq!(statement.fine_details.len(), 1);
    }

    #[test]
    fn test_on_time_transaction_has_no_arrears() {
        let tx = transaction(1_000_000, dec!(5), 3);
        let statement = engine().assess(&tx, ymd(2024, 2, 15));

        // the first due date itself is not overdue yet
        assert_eq!(statement.overdue_count, 0);
        assert_eq!(statement.overdue_balance, Money::ZERO);
        assert_eq!(statement.total_fine, Money::ZERO);
        assert_eq!(statement.remaining_total, Money::from_major(1_150_000));
    }

    #[test]
    fn test_settled_transaction_reports_zeroes() {
        let mut tx = transaction(1_000_000, dec!(5), 1);
        tx.payment_history.push(PaymentRecord {
            date: ymd(2024, 2, 10),
            amount: Money::from_major(1_050_000),
            fine: Money::ZERO,
            installments_paid: 1,
            remaining_balance: Money::ZERO,
        });
        tx.settle(ymd(2024, 2, 10));

        let statement = engine().assess(&tx, ymd(2024, 12, 31));
        assert_eq!(statement, ArrearsStatement::default());
    }

    #[test]
    fn test_compounding_keeps_precision_between_periods() {
        // fractional per-installment amount: 1,150,000 / 3
        let tx = transaction(1_000_000, dec!(5), 3);
        // installments 1 and 2 (due feb 15, mar 15) overdue; 31 days late
        let statement = engine().assess(&tx, ymd(2024, 3, 17));

        assert_eq!(statement.overdue_count, 2);
        assert_eq!(statement.overdue_balance, Money::from_major(766_667));
        assert_eq!(statement.fine_details.len(), 1);
        assert_eq!(statement.fine_details[0].fine, Money::from_major(38_333));
        assert_eq!(statement.fine_details[0].basis, Money::from_major(766_667));

        // 60 days late: two periods, and the third installment (due apr 15)
        // is not yet overdue; the second fine is computed on the unrounded
        // balance carrying the first
        let statement = engine().assess(&tx, ymd(2024, 4, 15));
        assert_eq!(statement.fine_details.len(), 2);
        assert_eq!(statement.fine_details[1].fine, Money::from_major(40_250));
        assert_eq!(statement.fine_details[1].basis, Money::from_major(805_000));
        assert_eq!(statement.total_fine, Money::from_major(78_583));
    }

    #[test]
    fn test_remaining_total_reflects_retired_installments() {
        let mut tx = transaction(1_000_000, dec!(5), 3);
        let per = tx.terms().per_installment;
        tx.payment_history.push(PaymentRecord {
            date: ymd(2024, 2, 10),
            amount: per,
            fine: Money::ZERO,
            installments_paid: 1,
            remaining_balance: Money::ZERO,
        });

        let statement = engine().assess(&tx, ymd(2024, 2, 20));
        assert_eq!(statement.remaining_total, Money::from_major(766_667));
        assert_eq!(statement.overdue_count, 0);
    }

    #[test]
    fn test_assessment_is_idempotent() {
        let tx = transaction(2_500_000, dec!(3), 4);
        let as_of = ymd(2024, 6, 1);

        let first = engine().assess(&tx, as_of);
        let second = engine().assess(&tx, as_of);
        assert_eq!(first, second);
    }
}
