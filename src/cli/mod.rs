//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod entry;
pub mod report;

pub use entry::{handle_income, handle_remove, handle_spend, EntryArgs};
pub use report::{handle_month, handle_year, MonthArgs, YearArgs};
