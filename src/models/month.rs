//! Calendar months and per-month buckets
//!
//! A `MonthBucket` holds everything filed under one calendar month of one
//! year. Buckets are derived data: they are rebuilt from scratch whenever the
//! backing records change.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::income::IncomeEntry;
use super::money::Money;
use super::record::{Entry, Record};

/// A month of the year, January through December
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthOfYear {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl MonthOfYear {
    /// All months in calendar order
    pub const ALL: [MonthOfYear; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// Month for a zero-based index, if the index is in 0..=11
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Month an entry's date falls in
    ///
    /// Panics if the calendar reports a month outside 1..=12, which chrono
    /// never does for a valid date.
    pub fn of(date: &impl Datelike) -> Self {
        Self::ALL[date.month0() as usize]
    }

    /// Zero-based index (January = 0)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    /// Three letter abbreviation for chart axes
    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }
}

impl fmt::Display for MonthOfYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Records and incomes attributed to one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub month: MonthOfYear,
    /// Spending, in the order it was supplied
    pub records: Vec<Record>,
    /// Income, newest first
    pub incomes: Vec<IncomeEntry>,
}

impl MonthBucket {
    /// An empty bucket for the given month
    pub fn empty(month: MonthOfYear) -> Self {
        Self {
            month,
            records: Vec::new(),
            incomes: Vec::new(),
        }
    }

    pub fn total_income(&self) -> Money {
        self.incomes.iter().map(Entry::amount).sum()
    }

    pub fn total_spending(&self) -> Money {
        self.records.iter().map(Entry::amount).sum()
    }

    /// Income minus spending
    pub fn total_balance(&self) -> Money {
        self.total_income() - self.total_spending()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.incomes.is_empty()
    }

    /// Number of records plus incomes
    pub fn entry_count(&self) -> usize {
        self.records.len() + self.incomes.len()
    }

    /// Spending grouped by category, largest first
    ///
    /// Ties are broken alphabetically so the order is stable between runs.
    pub fn spending_by_category(&self) -> Vec<(String, Money)> {
        let mut totals: HashMap<&str, Money> = HashMap::new();
        for record in &self.records {
            *totals.entry(record.category.as_str()).or_default() += record.amount;
        }

        let mut breakdown: Vec<(String, Money)> = totals
            .into_iter()
            .map(|(category, total)| (category.to_string(), total))
            .collect();
        breakdown.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        breakdown
    }
}
