/// quick start - record a loan, preview its terms, pay it off
use chrono::{NaiveDate, TimeZone, Utc};
use installment_ledger_rs::{
    Allocation, EventStore, Ledger, Money, PaymentRequest, Rate, SafeTimeProvider, TimeSource,
    TransactionDraft, TransactionKind,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
    ));

    let mut ledger = Ledger::new();
    let mut events = EventStore::new();

    // lend 1,000,000 at 5% flat over 3 monthly installments
    let id = ledger.record(
        TransactionDraft {
            kind: TransactionKind::Receivable,
            counterparty: "Budi".to_string(),
            principal: Money::from_major(1_000_000),
            interest_rate: Rate::from_percent(dec!(5)),
            installment_count: 3,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        },
        &mut events,
    )?;

    let tx = ledger.get(id).unwrap();
    let terms = tx.terms();
    println!("total payable:   {}", terms.total_amount);
    println!("per installment: {}", terms.per_installment.round_whole());
    println!("first due date:  {}", tx.next_due_date().unwrap());

    // pay the first installment on time
    let allocation = ledger.pay(
        id,
        PaymentRequest {
            amount: terms.per_installment.round_whole() + Money::ONE,
            date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
        },
        &time,
        &mut events,
    )?;

    match allocation {
        Allocation::Applied(receipt) => {
            println!(
                "covered {} installment(s), change {}",
                receipt.installments_covered, receipt.change
            );
        }
        Allocation::NothingCovered { per_installment, .. } => {
            println!("payment too small, one installment is {}", per_installment);
        }
    }

    println!("next due date: {:?}", ledger.get(id).unwrap().next_due_date());
    for event in events.take_events() {
        println!("event: {:?}", event);
    }

    Ok(())
}
