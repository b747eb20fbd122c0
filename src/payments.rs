use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::fines::{FineConfig, FineEngine};
use crate::transaction::Transaction;
use crate::types::{PaymentRecord, TransactionId};

/// a request to record a payment against a transaction
///
/// the date is whatever the user recorded, it is not validated against the
/// reference date used for arrears
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: Money,
    pub date: NaiveDate,
}

/// money movement recorded by a successful allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub transaction_id: TransactionId,
    pub fine_paid: Money,
    pub installments_covered: u32,
    /// portion that retired installments (excludes fine and change)
    pub amount_to_installments: Money,
    /// leftover returned to the payer; not carried forward as credit
    pub change: Money,
    pub settled: bool,
}

/// outcome of applying a payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Allocation {
    Applied(PaymentReceipt),
    /// the payment covered neither any fine nor one full installment;
    /// nothing was recorded and the transaction is unchanged
    NothingCovered {
        fine_due: Money,
        per_installment: Money,
    },
}

/// allocates a payment across fines and installments, in that order
///
/// single pass, no fractional installment crediting: arrears must be
/// cleared before the schedule advances, and at most one installment may
/// be prepaid while the transaction is current
pub struct PaymentAllocator {
    fine_engine: FineEngine,
}

impl PaymentAllocator {
    pub fn new(config: FineConfig) -> Self {
        Self {
            fine_engine: FineEngine::new(config),
        }
    }

    /// apply a payment, mutating the transaction in place
    ///
    /// `today` drives the arrears assessment; `request.date` is only
    /// recorded. the caller is responsible for persisting the transaction
    pub fn apply(
        &self,
        transaction: &mut Transaction,
        request: PaymentRequest,
        today: NaiveDate,
        events: &mut EventStore,
    ) -> Result<Allocation> {
        if !request.amount.is_positive() {
            return Err(LedgerError::InvalidPaymentAmount {
                amount: request.amount,
            });
        }
        if !transaction.is_active() {
            return Err(LedgerError::TransactionNotActive {
                status: transaction.status,
            });
        }

        let arrears = self.fine_engine.assess(transaction, today);
        let per_installment = transaction.terms().per_installment;

        let mut remaining = request.amount;

        // fines are settled first, partial fine payments allowed
        let fine_paid = remaining.min(arrears.total_fine);
        remaining -= fine_paid;

        // then whole installments
        let mut installments_covered = 0u32;
        if remaining.is_positive() && per_installment.is_positive() {
            let max_coverable = (remaining.as_decimal() / per_installment.as_decimal())
                .floor()
                .to_u32()
                .unwrap_or(0);

            installments_covered = if arrears.overdue_count > 0 {
                max_coverable.min(arrears.overdue_count)
            } else {
                max_coverable.min(1)
            };
            installments_covered = installments_covered.min(transaction.remaining_installments());
        }

        let applied = per_installment * Decimal::from(installments_covered);
        let change = remaining - applied;

        if installments_covered == 0 && fine_paid.is_zero() {
            return Ok(Allocation::NothingCovered {
                fine_due: arrears.total_fine,
                per_installment,
            });
        }

        transaction.payment_history.push(PaymentRecord {
            date: request.date,
            amount: (request.amount - fine_paid).round_whole(),
            fine: fine_paid.round_whole(),
            installments_paid: installments_covered,
            remaining_balance: change.round_whole(),
        });

        events.emit(Event::PaymentReceived {
            transaction_id: transaction.id,
            amount: request.amount,
            applied_to_fine: fine_paid,
            applied_to_installments: applied,
            installments_covered,
            change,
            date: request.date,
        });

        let settled = transaction.installments_paid() >= transaction.installment_count;
        if settled {
            transaction.settle(request.date);
            events.emit(Event::TransactionSettled {
                transaction_id: transaction.id,
                date_completed: request.date,
            });
        }

        info!(
            transaction_id = %transaction.id,
            amount = %request.amount,
            fine_paid = %fine_paid,
            installments_covered,
            settled,
            "payment allocated"
        );

        Ok(Allocation::Applied(PaymentReceipt {
            transaction_id: transaction.id,
            fine_paid,
            installments_covered,
            amount_to_installments: applied,
            change,
            settled,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::transaction::TransactionDraft;
    use crate::types::{TransactionKind, TransactionStatus};
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn transaction(principal: i64, rate_percent: Decimal, count: u32) -> Transaction {
        Transaction::from_draft(TransactionDraft {
            kind: TransactionKind::Receivable,
            counterparty: "Dewi".to_string(),
            principal: Money::from_major(principal),
            interest_rate: Rate::from_percent(rate_percent),
            installment_count: count,
            start_date: ymd(2024, 1, 15),
        })
        .unwrap()
    }

    fn allocator() -> PaymentAllocator {
        PaymentAllocator::new(FineConfig::default())
    }

    #[test]
    fn test_fine_then_installment_then_change() {
        // one installment of 1,000,000 due 2024-02-15, 30 days late:
        // fine due is 50,000
        let mut tx = transaction(1_000_000, dec!(0), 1);
        let mut events = EventStore::new();

        let allocation = allocator()
            .apply(
                &mut tx,
                PaymentRequest {
                    amount: Money::from_major(1_200_000),
                    date: ymd(2024, 3, 16),
                },
                ymd(2024, 3, 16),
                &mut events,
            )
            .unwrap();

        let receipt = match allocation {
            Allocation::Applied(receipt) => receipt,
            other => panic!("expected applied allocation, got {:?}", other),
        };

        assert_eq!(receipt.fine_paid, Money::from_major(50_000));
        assert_eq!(receipt.installments_covered, 1);
        assert_eq!(receipt.change, Money::from_major(150_000));
        assert!(receipt.settled);

        let record = &tx.payment_history[0];
        assert_eq!(record.amount, Money::from_major(1_150_000));
        assert_eq!(record.fine, Money::from_major(50_000));
        assert_eq!(record.installments_paid, 1);
        assert_eq!(record.remaining_balance, Money::from_major(150_000));

        assert_eq!(tx.status, TransactionStatus::Settled);
        assert_eq!(tx.date_completed, Some(ymd(2024, 3, 16)));
    }

    #[test]
    fn test_too_small_payment_is_a_no_op() {
        let mut tx = transaction(1_000_000, dec!(0), 1);
        let mut events = EventStore::new();

        // nothing due yet, and 400,000 does not cover one installment
        let allocation = allocator()
            .apply(
                &mut tx,
                PaymentRequest {
                    amount: Money::from_major(400_000),
                    date: ymd(2024, 2, 1),
                },
                ymd(2024, 2, 1),
                &mut events,
            )
            .unwrap();

        assert_eq!(
            allocation,
            Allocation::NothingCovered {
                fine_due: Money::ZERO,
                per_installment: Money::from_major(1_000_000),
            }
        );
        assert!(tx.payment_history.is_empty());
        assert!(events.events().is_empty());
        assert!(tx.is_active());
    }

    #[test]
    fn test_fine_only_payment_does_not_advance_schedule() {
        let mut tx = transaction(1_000_000, dec!(0), 1);
        let mut events = EventStore::new();

        let allocation = allocator()
            .apply(
                &mut tx,
                PaymentRequest {
                    amount: Money::from_major(30_000),
                    date: ymd(2024, 3, 20),
                },
                ymd(2024, 3, 20),
                &mut events,
            )
            .unwrap();

        let receipt = match allocation {
            Allocation::Applied(receipt) => receipt,
            other => panic!("expected applied allocation, got {:?}", other),
        };

        // partial fine, no installment retired
        assert_eq!(receipt.fine_paid, Money::from_major(30_000));
        assert_eq!(receipt.installments_covered, 0);
        assert!(!receipt.settled);

        assert_eq!(tx.payment_history[0].installments_paid, 0);
        assert_eq!(tx.installments_paid(), 0);
        assert!(tx.is_active());
    }

    #[test]
    fn test_arrears_block_prepaying_ahead() {
        // four installments of 1,000,000; two overdue as of 2024-03-16
        // with one full late period of fine on the pair (100,000)
        let mut tx = transaction(4_000_000, dec!(0), 4);
        let mut events = EventStore::new();

        let allocation = allocator()
            .apply(
                &mut tx,
                PaymentRequest {
                    amount: Money::from_major(3_100_000),
                    date: ymd(2024, 3, 16),
                },
                ymd(2024, 3, 16),
                &mut events,
            )
            .unwrap();

        let receipt = match allocation {
            Allocation::Applied(receipt) => receipt,
            other => panic!("expected applied allocation, got {:?}", other),
        };

        // money for three installments, but only the two overdue ones are
        // covered; the rest comes back as change
        assert_eq!(receipt.fine_paid, Money::from_major(100_000));
        assert_eq!(receipt.installments_covered, 2);
        assert_eq!(receipt.change, Money::from_major(1_000_000));
        assert!(!receipt.settled);
    }

    #[test]
    fn test_current_transaction_prepays_at_most_one() {
        let mut tx = transaction(3_000_000, dec!(0), 3);
        let mut events = EventStore::new();

        let allocation = allocator()
            .apply(
                &mut tx,
                PaymentRequest {
                    amount: Money::from_major(2_000_000),
                    date: ymd(2024, 1, 20),
                },
                ymd(2024, 1, 20),
                &mut events,
            )
            .unwrap();

        let receipt = match allocation {
            Allocation::Applied(receipt) => receipt,
            other => panic!("expected applied allocation, got {:?}", other),
        };

        assert_eq!(receipt.installments_covered, 1);
        assert_eq!(receipt.change, Money::from_major(1_000_000));
    }

    #[test]
    fn test_settlement_boundary_is_exact() {
        let mut tx = transaction(3_000_000, dec!(0), 3);
        let mut events = EventStore::new();
        let per = Money::from_major(1_000_000);

        for n in 1..=3u32 {
            let date = ymd(2024, 1, 15 + n);
            let allocation = allocator()
                .apply(&mut tx, PaymentRequest { amount: per, date }, date, &mut events)
                .unwrap();
            let receipt = match allocation {
                Allocation::Applied(receipt) => receipt,
                other => panic!("expected applied allocation, got {:?}", other),
            };

            if n < 3 {
                assert!(!receipt.settled);
                assert!(tx.is_active());
            } else {
                assert!(receipt.settled);
                assert!(tx.is_settled());
                assert_eq!(tx.date_completed, Some(date));
            }
        }
        assert_eq!(tx.installments_paid(), 3);

        // terminal: further payments are rejected
        let err = allocator()
            .apply(
                &mut tx,
                PaymentRequest {
                    amount: per,
                    date: ymd(2024, 2, 1),
                },
                ymd(2024, 2, 1),
                &mut events,
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::TransactionNotActive { .. }));
    }

    #[test]
    fn test_non_positive_amount_is_rejected() {
        let mut tx = transaction(1_000_000, dec!(0), 1);
        let mut events = EventStore::new();

        let err = allocator()
            .apply(
                &mut tx,
                PaymentRequest {
                    amount: Money::ZERO,
                    date: ymd(2024, 2, 1),
                },
                ymd(2024, 2, 1),
                &mut events,
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidPaymentAmount { .. }));
        assert!(tx.payment_history.is_empty());
    }

    #[test]
    fn test_settlement_event_emitted() {
        let mut tx = transaction(1_000_000, dec!(0), 1);
        let mut events = EventStore::new();
        let date = ymd(2024, 2, 1);

        allocator()
            .apply(
                &mut tx,
                PaymentRequest {
                    amount: Money::from_major(1_000_000),
                    date,
                },
                date,
                &mut events,
            )
            .unwrap();

        let emitted = events.take_events();
        assert_eq!(emitted.len(), 2);
        assert!(matches!(emitted[0], Event::PaymentReceived { .. }));
        assert!(matches!(
            emitted[1],
            Event::TransactionSettled { date_completed, .. } if date_completed == date
        ));
    }
}
