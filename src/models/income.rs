//! Income entry model
//!
//! Income entries have the same shape as spending records but are kept in a
//! separate bucket so that totals can be reported independently.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::IncomeId;
use super::money::Money;
use super::record::{check_amount, Entry, EntryValidationError};

/// A single income entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub id: IncomeId,
    pub amount: Money,
    pub date: NaiveDateTime,
    /// Where the money came from (salary, refund, ...)
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub note: String,
}

impl IncomeEntry {
    /// Create a new income entry with a fresh id
    pub fn new(amount: Money, date: NaiveDateTime, source: impl Into<String>) -> Self {
        Self {
            id: IncomeId::new(),
            amount,
            date,
            source: source.into(),
            note: String::new(),
        }
    }

    /// Create an income entry dated at midnight of the given day
    pub fn on_day(amount: Money, day: NaiveDate, source: impl Into<String>) -> Self {
        Self::new(amount, day.and_time(NaiveTime::MIN), source)
    }

    /// Attach a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

impl Entry for IncomeEntry {
    fn amount(&self) -> Money {
        self.amount
    }

    /// Income only requires a valid amount; the source is optional.
    fn validate(&self) -> Result<(), EntryValidationError> {
        check_amount(self.amount)
    }

    fn date(&self) -> NaiveDateTime {
        self.date
    }
}

impl fmt::Display for IncomeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = if self.source.is_empty() {
            "(income)"
        } else {
            self.source.as_str()
        };
        write!(f, "{} {} {}", self.date.format("%Y-%m-%d"), source, self.amount)
    }
}
