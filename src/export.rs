//! export and import surfaces
//!
//! csv export carries one summary row per transaction; import accepts a
//! full replacement array of transaction records as json (wholesale
//! overwrite, no merge). csv is not an import format.

use chrono::NaiveDate;
use csv::WriterBuilder;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::decimal::Money;
use crate::errors::Result;
use crate::fines::FineEngine;
use crate::ledger::Ledger;
use crate::transaction::Transaction;
use crate::types::{TransactionId, TransactionKind, TransactionStatus};

/// one export row per ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub counterparty: String,
    pub principal: Money,
    /// flat rate in percent
    pub interest_rate: Decimal,
    pub installment_count: u32,
    pub start_date: NaiveDate,
    pub status: TransactionStatus,
    pub date_completed: Option<NaiveDate>,
    /// principal plus flat interest, rounded
    pub total_payable: Money,
    /// remaining plus accrued fines as of the export date, rounded;
    /// zero once settled
    pub outstanding: Money,
}

/// build export rows for every entry, outstanding assessed as of `as_of`
pub fn rows(ledger: &Ledger, as_of: NaiveDate) -> Vec<ExportRow> {
    let engine = FineEngine::new(ledger.fine_config());

    ledger
        .transactions()
        .iter()
        .map(|tx| {
            let terms = tx.terms();
            let outstanding = if tx.is_active() {
                let statement = engine.assess(tx, as_of);
                statement.remaining_total + statement.total_fine
            } else {
                Money::ZERO
            };

            ExportRow {
                id: tx.id,
                kind: tx.kind,
                counterparty: tx.counterparty.clone(),
                principal: tx.principal,
                interest_rate: tx.interest_rate.as_percent(),
                installment_count: tx.installment_count,
                start_date: tx.start_date,
                status: tx.status,
                date_completed: tx.date_completed,
                total_payable: terms.total_amount.round_whole(),
                outstanding,
            }
        })
        .collect()
}

/// write the ledger as csv, one row per entry
pub fn write_csv<W: Write>(ledger: &Ledger, as_of: NaiveDate, writer: W) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for row in rows(ledger, as_of) {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// read a full replacement transaction array from json
pub fn read_transactions_json<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    Ok(serde_json::from_reader(reader)?)
}

/// write the full transaction array as json, the import counterpart
pub fn write_transactions_json<W: Write>(ledger: &Ledger, writer: W) -> Result<()> {
    Ok(serde_json::to_writer_pretty(writer, ledger.transactions())?)
}
