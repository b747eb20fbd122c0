pub mod amortization;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod export;
pub mod fines;
pub mod ledger;
pub mod payments;
pub mod reminders;
pub mod schedule;
pub mod transaction;
pub mod types;

// re-export key types
pub use amortization::FlatTerms;
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use fines::{ArrearsStatement, FineConfig, FineEngine, FinePeriod};
pub use ledger::{Ledger, PortfolioBreakdown, PortfolioTotals};
pub use payments::{Allocation, PaymentAllocator, PaymentReceipt, PaymentRequest};
pub use reminders::{Reminder, ReminderKind};
pub use schedule::{due_date_of, due_status, next_due_date, DueStatus};
pub use transaction::{Transaction, TransactionDraft};
pub use types::{PaymentRecord, TransactionId, TransactionKind, TransactionStatus};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
