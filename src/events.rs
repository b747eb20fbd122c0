use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{TransactionId, TransactionKind};

/// all events emitted by ledger mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    TransactionRecorded {
        transaction_id: TransactionId,
        kind: TransactionKind,
        counterparty: String,
        principal: Money,
        installment_count: u32,
    },
    PaymentReceived {
        transaction_id: TransactionId,
        amount: Money,
        applied_to_fine: Money,
        applied_to_installments: Money,
        installments_covered: u32,
        change: Money,
        date: NaiveDate,
    },
    TransactionSettled {
        transaction_id: TransactionId,
        date_completed: NaiveDate,
    },
    TransactionDeleted {
        transaction_id: TransactionId,
    },
    LedgerImported {
        transaction_count: usize,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
