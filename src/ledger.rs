use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::fines::{ArrearsStatement, FineConfig, FineEngine};
use crate::payments::{Allocation, PaymentAllocator, PaymentRequest};
use crate::transaction::{Transaction, TransactionDraft};
use crate::types::{TransactionId, TransactionKind, TransactionStatus};

/// the transaction collection
///
/// owns every ledger entry; engines receive entries by reference, nothing
/// reads from ambient state. ledger-level operations take the injected
/// clock and derive "today" from it, the pure engines take dates directly
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Ledger {
    #[serde(default)]
    fine_config: FineConfig,
    transactions: Vec<Transaction>,
}

/// current portfolio position, receivable and payable sides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PortfolioTotals {
    /// total payable of every receivable entry ever recorded
    pub receivable_committed: Money,
    pub payable_committed: Money,
    /// outstanding (remaining plus fines) across active receivables
    pub receivable_outstanding: Money,
    pub payable_outstanding: Money,
    /// receivable outstanding minus payable outstanding
    pub net_position: Money,
}

/// committed totals split by kind and status, for dashboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PortfolioBreakdown {
    pub receivable_active: Money,
    pub receivable_settled: Money,
    pub payable_active: Money,
    pub payable_settled: Money,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(fine_config: FineConfig) -> Self {
        Self {
            fine_config,
            transactions: Vec::new(),
        }
    }

    pub fn fine_config(&self) -> FineConfig {
        self.fine_config
    }

    /// validate a draft and append it as a new active entry
    pub fn record(&mut self, draft: TransactionDraft, events: &mut EventStore) -> Result<TransactionId> {
        let transaction = Transaction::from_draft(draft)?;
        let id = transaction.id;

        events.emit(Event::TransactionRecorded {
            transaction_id: id,
            kind: transaction.kind,
            counterparty: transaction.counterparty.clone(),
            principal: transaction.principal,
            installment_count: transaction.installment_count,
        });
        info!(
            transaction_id = %id,
            counterparty = %transaction.counterparty,
            "transaction recorded"
        );

        self.transactions.push(transaction);
        Ok(id)
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    /// delete an entry permanently; the only way out of `Settled`
    pub fn remove(&mut self, id: TransactionId, events: &mut EventStore) -> Result<Transaction> {
        let index = self
            .transactions
            .iter()
            .position(|tx| tx.id == id)
            .ok_or(LedgerError::TransactionNotFound { id })?;

        let removed = self.transactions.remove(index);
        events.emit(Event::TransactionDeleted { transaction_id: id });
        info!(transaction_id = %id, "transaction deleted");
        Ok(removed)
    }

    /// record a payment; arrears are assessed as of the injected clock's
    /// current date, while the request carries the user-supplied date
    pub fn pay(
        &mut self,
        id: TransactionId,
        request: PaymentRequest,
        time: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<Allocation> {
        let today = time.now().date_naive();
        let allocator = PaymentAllocator::new(self.fine_config);

        let transaction = self
            .transactions
            .iter_mut()
            .find(|tx| tx.id == id)
            .ok_or(LedgerError::TransactionNotFound { id })?;

        allocator.apply(transaction, request, today, events)
    }

    /// arrears of one entry as of the injected clock's current date
    pub fn arrears_of(&self, id: TransactionId, time: &SafeTimeProvider) -> Result<ArrearsStatement> {
        let transaction = self
            .get(id)
            .ok_or(LedgerError::TransactionNotFound { id })?;

        let engine = FineEngine::new(self.fine_config);
        Ok(engine.assess(transaction, time.now().date_naive()))
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn active(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|tx| tx.is_active())
    }

    pub fn settled(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|tx| tx.is_settled())
    }

    pub fn by_kind(&self, kind: TransactionKind) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(move |tx| tx.kind == kind)
    }

    /// case-insensitive counterparty search
    pub fn search(&self, query: &str) -> Vec<&Transaction> {
        let needle = query.to_lowercase();
        self.transactions
            .iter()
            .filter(|tx| tx.counterparty.to_lowercase().contains(&needle))
            .collect()
    }

    /// active entries ordered by next due date, earliest (most overdue)
    /// first; entries with no remaining installment sort last
    pub fn sorted_by_next_due(&self) -> Vec<&Transaction> {
        let mut active: Vec<&Transaction> = self.active().collect();
        active.sort_by_key(|tx| match tx.next_due_date() {
            Some(date) => (0u8, date),
            None => (1u8, chrono::NaiveDate::MAX),
        });
        active
    }

    /// portfolio position as of the injected clock's current date
    pub fn totals(&self, time: &SafeTimeProvider) -> PortfolioTotals {
        let today = time.now().date_naive();
        let engine = FineEngine::new(self.fine_config);
        let mut totals = PortfolioTotals::default();

        for tx in &self.transactions {
            let committed = tx.terms().total_amount;
            match tx.kind {
                TransactionKind::Receivable => totals.receivable_committed += committed,
                TransactionKind::Payable => totals.payable_committed += committed,
            }

            if tx.is_active() {
                let statement = engine.assess(tx, today);
                let outstanding = statement.remaining_total + statement.total_fine;
                match tx.kind {
                    TransactionKind::Receivable => totals.receivable_outstanding += outstanding,
                    TransactionKind::Payable => totals.payable_outstanding += outstanding,
                }
            }
        }

        totals.net_position = totals.receivable_outstanding - totals.payable_outstanding;
        totals
    }

    /// committed totals by kind and status
    pub fn breakdown(&self) -> PortfolioBreakdown {
        let mut breakdown = PortfolioBreakdown::default();

        for tx in &self.transactions {
            let committed = tx.terms().total_amount;
            match (tx.kind, tx.status) {
                (TransactionKind::Receivable, TransactionStatus::Active) => {
                    breakdown.receivable_active += committed
                }
                (TransactionKind::Receivable, TransactionStatus::Settled) => {
                    breakdown.receivable_settled += committed
                }
                (TransactionKind::Payable, TransactionStatus::Active) => {
                    breakdown.payable_active += committed
                }
                (TransactionKind::Payable, TransactionStatus::Settled) => {
                    breakdown.payable_settled += committed
                }
            }
        }

        breakdown
    }

    /// serialize the whole collection as the persistence blob
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// load a previously saved blob; the collection arrives whole
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// replace the entire collection; wholesale overwrite, no merge
    pub fn import(&mut self, transactions: Vec<Transaction>, events: &mut EventStore) {
        info!(
            replaced = self.transactions.len(),
            imported = transactions.len(),
            "ledger replaced by import"
        );
        events.emit(Event::LedgerImported {
            transaction_count: transactions.len(),
        });
        self.transactions = transactions;
    }
}
