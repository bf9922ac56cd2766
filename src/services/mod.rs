//! Service layer for the expense tracker
//!
//! The service layer sits on top of the storage layer: it aggregates stored
//! entries into month/year views, tracks which month and year are selected,
//! and validates entries before they are persisted.

pub mod aggregator;
pub mod data_manager;
pub mod navigation;

pub use aggregator::PeriodAggregator;
pub use data_manager::{DataManager, RefreshOutcome};
pub use navigation::{NavigationCursor, Step};
