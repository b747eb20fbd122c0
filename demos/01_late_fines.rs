/// late fines - time travel through a delinquent loan
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use installment_ledger_rs::{
    EventStore, Ledger, Money, PaymentRequest, Rate, SafeTimeProvider, TimeSource,
    TransactionDraft, TransactionKind,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
    ));
    let control = time.test_control().unwrap();

    let mut ledger = Ledger::new();
    let mut events = EventStore::new();

    let id = ledger.record(
        TransactionDraft {
            kind: TransactionKind::Receivable,
            counterparty: "Sari".to_string(),
            principal: Money::from_major(1_000_000),
            interest_rate: Rate::from_percent(dec!(0)),
            installment_count: 1,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        },
        &mut events,
    )?;

    // the installment falls due on 2024-02-15; jump 91 days past origination
    control.advance(Duration::days(91));
    println!("today: {}", time.now().date_naive());

    let statement = ledger.arrears_of(id, &time)?;
    println!("overdue installments: {}", statement.overdue_count);
    println!("overdue balance:      {}", statement.overdue_balance);
    println!("total fine:           {}", statement.total_fine);
    for detail in &statement.fine_details {
        println!(
            "  period {}: {} x 5% = {}",
            detail.period, detail.basis, detail.fine
        );
    }
    println!("amount due:           {}", statement.amount_due());

    // settle everything: fines first, then the overdue installment
    let allocation = ledger.pay(
        id,
        PaymentRequest {
            amount: statement.amount_due(),
            date: time.now().date_naive(),
        },
        &time,
        &mut events,
    )?;
    println!("allocation: {:?}", allocation);
    println!("status: {:?}", ledger.get(id).unwrap().status);

    Ok(())
}
