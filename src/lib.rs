//! Expense tracker - personal spending and income by month and year
//!
//! This library provides the core of a command-line expense tracker. Spending
//! records and income entries are stored per user in a JSON event tree,
//! grouped into calendar months and years, and browsed one month or one year
//! at a time.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `logging`: Tracing subscriber setup
//! - `models`: Core data models (records, incomes, month and year aggregates)
//! - `storage`: JSON event tree storage layer
//! - `services`: Aggregation, navigation and the data manager
//! - `display`: Text rendering of month and year overviews
//! - `cli`: Command handlers for the `expense` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use expense_tracker::config::{TrackerPaths, Settings};
//! use expense_tracker::services::DataManager;
//! use expense_tracker::storage::JsonEventStore;
//!
//! let paths = TrackerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let store = Arc::new(JsonEventStore::open(paths.events_file())?);
//! let manager = DataManager::new(store, settings.user()?);
//! manager.fetch_data()?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{TrackerError, TrackerResult};
