//! Period aggregation
//!
//! Turns a flat list of dated records and incomes into a [`YearAggregate`]
//! with one bucket per calendar month.

use tracing::trace;

use crate::models::{Entry, IncomeEntry, MonthOfYear, Record, YearAggregate};

/// Buckets entries of a single year by calendar month
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodAggregator;

impl PeriodAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Build the aggregate for `year_label`
    ///
    /// Every entry lands in exactly one bucket, chosen by the month of its
    /// date. Spending keeps its input order; income within a month is sorted
    /// newest first. Entries are not checked against the label: the caller
    /// decides which entries belong to the year.
    pub fn aggregate(
        &self,
        records: Vec<Record>,
        incomes: Vec<IncomeEntry>,
        year_label: impl Into<String>,
    ) -> YearAggregate {
        let mut year = YearAggregate::empty(year_label);
        trace!(
            year = %year.label,
            records = records.len(),
            incomes = incomes.len(),
            "aggregating year"
        );

        for record in records {
            let month = MonthOfYear::of(&record.date());
            year.month_mut(month).records.push(record);
        }

        for income in incomes {
            let month = MonthOfYear::of(&income.date());
            year.month_mut(month).incomes.push(income);
        }

        for month in MonthOfYear::ALL {
            year.month_mut(month)
                .incomes
                .sort_by(|a, b| b.date.cmp(&a.date));
        }

        year
    }
}
