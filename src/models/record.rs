//! Spending record model
//!
//! A record is one spending entry. Records are never edited in place: the
//! user creates them and later removes them by id.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::RecordId;
use super::money::Money;

/// Read access shared by spending records and income entries
///
/// The aggregator buckets both kinds through this trait.
pub trait Entry {
    /// The amount of the entry, always positive for valid entries
    fn amount(&self) -> Money;

    /// Wall-clock date and time the entry belongs to
    fn date(&self) -> NaiveDateTime;

    /// Check the entry before it is stored or accepted from storage
    fn validate(&self) -> Result<(), EntryValidationError>;

    /// Year label the entry is filed under ("2019")
    fn year_label(&self) -> String {
        self.date().format("%Y").to_string()
    }
}

/// Validation errors shared by records and income entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    NonPositiveAmount,
    AmountTooLarge,
    MissingCategory,
}

impl fmt::Display for EntryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount => write!(f, "Amount must be greater than zero"),
            Self::AmountTooLarge => write!(f, "Amount exceeds {}", Money::MAX_ENTRY),
            Self::MissingCategory => write!(f, "Category cannot be empty"),
        }
    }
}

impl std::error::Error for EntryValidationError {}

/// Amount rules shared by both kinds of entry
pub(crate) fn check_amount(amount: Money) -> Result<(), EntryValidationError> {
    if !amount.is_positive() {
        return Err(EntryValidationError::NonPositiveAmount);
    }
    if amount > Money::MAX_ENTRY {
        return Err(EntryValidationError::AmountTooLarge);
    }
    Ok(())
}

/// A single spending entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub amount: Money,
    pub date: NaiveDateTime,
    pub category: String,
    #[serde(default)]
    pub note: String,
}

impl Record {
    /// Create a new record with a fresh id
    pub fn new(amount: Money, date: NaiveDateTime, category: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            amount,
            date,
            category: category.into(),
            note: String::new(),
        }
    }

    /// Create a record dated at midnight of the given day
    pub fn on_day(amount: Money, day: NaiveDate, category: impl Into<String>) -> Self {
        Self::new(amount, day.and_time(chrono::NaiveTime::MIN), category)
    }

    /// Attach a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

impl Entry for Record {
    fn amount(&self) -> Money {
        self.amount
    }

    fn validate(&self) -> Result<(), EntryValidationError> {
        check_amount(self.amount)?;
        if self.category.trim().is_empty() {
            return Err(EntryValidationError::MissingCategory);
        }
        Ok(())
    }

    fn date(&self) -> NaiveDateTime {
        self.date
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.category,
            self.amount
        )
    }
}
