/// export and import - csv summary plus wholesale json replacement
use chrono::{NaiveDate, TimeZone, Utc};
use installment_ledger_rs::{
    export, EventStore, Ledger, Money, Rate, SafeTimeProvider, TimeSource, TransactionDraft,
    TransactionKind,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
    ));

    let mut ledger = Ledger::new();
    let mut events = EventStore::new();

    for (kind, counterparty, principal, count) in [
        (TransactionKind::Receivable, "Budi", 1_000_000_i64, 3),
        (TransactionKind::Payable, "Koperasi Maju", 500_000, 2),
    ] {
        ledger.record(
            TransactionDraft {
                kind,
                counterparty: counterparty.to_string(),
                principal: Money::from_major(principal),
                interest_rate: Rate::from_percent(dec!(2.5)),
                installment_count: count,
                start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            },
            &mut events,
        )?;
    }

    println!("--- csv export ---");
    let mut csv = Vec::new();
    export::write_csv(&ledger, time.now().date_naive(), &mut csv)?;
    print!("{}", String::from_utf8(csv)?);

    println!("\n--- json snapshot round trip ---");
    let blob = ledger.to_json()?;
    let restored = Ledger::from_json(&blob)?;
    println!("restored {} transactions", restored.len());

    // wholesale import: the replacement array overwrites the collection
    let mut json = Vec::new();
    export::write_transactions_json(&ledger, &mut json)?;
    let replacement = export::read_transactions_json(json.as_slice())?;

    let mut fresh = Ledger::new();
    fresh.import(replacement, &mut events);
    println!("imported {} transactions", fresh.len());

    Ok(())
}
