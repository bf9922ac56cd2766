//! Core data models for the expense tracker
//!
//! This module contains the data structures of the tracking domain: spending
//! records, income entries, and the month/year aggregates built from them.

pub mod ids;
pub mod income;
pub mod money;
pub mod month;
pub mod record;
pub mod user;
pub mod year;

pub use ids::{IncomeId, RecordId};
pub use income::IncomeEntry;
pub use money::Money;
pub use month::{MonthBucket, MonthOfYear};
pub use record::{Entry, EntryValidationError, Record};
pub use user::UserId;
pub use year::{MonthlyTotals, YearAggregate};
