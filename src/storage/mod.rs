//! Storage layer for the expense tracker
//!
//! The data manager only talks to storage through the [`ExpenseStore`]
//! trait. [`JsonEventStore`] is the file-backed implementation; it keeps the
//! hosted event-tree layout so the data can be synced or exported as-is.

pub mod event_tree;
pub mod events;
pub mod file_io;

pub use event_tree::EventDocument;
pub use events::JsonEventStore;
pub use file_io::{read_json, write_json_atomic};

use crate::error::TrackerResult;
use crate::models::{IncomeEntry, IncomeId, Record, RecordId, UserId};

/// Raw entries stored under one year key, not yet bucketed by month
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearEvents {
    pub label: String,
    pub records: Vec<Record>,
    pub incomes: Vec<IncomeEntry>,
}

/// Persistence collaborator used by the data manager
///
/// Implementations must be shareable across threads; the manager calls them
/// without holding any of its own locks.
pub trait ExpenseStore: Send + Sync {
    /// Every year stored for the user
    ///
    /// A user with no stored data is an error, not an empty list.
    fn fetch_years(&self, user: &UserId) -> TrackerResult<Vec<YearEvents>>;

    fn save_record(&self, user: &UserId, record: &Record) -> TrackerResult<()>;

    fn save_income(&self, user: &UserId, income: &IncomeEntry) -> TrackerResult<()>;

    fn remove_record(&self, user: &UserId, id: RecordId) -> TrackerResult<()>;

    fn remove_income(&self, user: &UserId, id: IncomeId) -> TrackerResult<()>;
}
