//! Yearly aggregate model

use serde::{Deserialize, Serialize};

use super::month::{MonthBucket, MonthOfYear};
use super::money::Money;

/// One row of the yearly bar chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyTotals {
    pub month: MonthOfYear,
    pub income: Money,
    pub spending: Money,
}

impl MonthlyTotals {
    pub fn balance(&self) -> Money {
        self.income - self.spending
    }
}

/// Twelve month buckets for a single year, January first
///
/// Built by [`PeriodAggregator`](crate::services::PeriodAggregator); the
/// constructor guarantees exactly one bucket per month in calendar order.
/// Deserialized values are checked for the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "YearAggregateData")]
pub struct YearAggregate {
    /// The year as it is keyed in storage ("2019")
    pub label: String,
    months: Vec<MonthBucket>,
}

/// Unchecked serialized form of [`YearAggregate`]
#[derive(Deserialize)]
struct YearAggregateData {
    label: String,
    months: Vec<MonthBucket>,
}

impl TryFrom<YearAggregateData> for YearAggregate {
    type Error = String;

    fn try_from(data: YearAggregateData) -> Result<Self, Self::Error> {
        if data.months.len() != MonthOfYear::ALL.len() {
            return Err(format!(
                "year {} must have 12 months, found {}",
                data.label,
                data.months.len()
            ));
        }

        for (expected, bucket) in MonthOfYear::ALL.iter().zip(&data.months) {
            if bucket.month != *expected {
                return Err(format!(
                    "year {}: expected {} but found {}",
                    data.label, expected, bucket.month
                ));
            }
            let misfiled = bucket
                .records
                .iter()
                .map(|r| r.date)
                .chain(bucket.incomes.iter().map(|i| i.date))
                .any(|date| MonthOfYear::of(&date) != bucket.month);
            if misfiled {
                return Err(format!(
                    "year {}: {} holds entries from another month",
                    data.label, bucket.month
                ));
            }
        }

        Ok(Self {
            label: data.label,
            months: data.months,
        })
    }
}

impl YearAggregate {
    /// A year with twelve empty buckets
    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            months: MonthOfYear::ALL.iter().map(|m| MonthBucket::empty(*m)).collect(),
        }
    }

    /// The twelve buckets, January to December
    pub fn months(&self) -> &[MonthBucket] {
        &self.months
    }

    pub fn month(&self, month: MonthOfYear) -> &MonthBucket {
        &self.months[month.index()]
    }

    pub(crate) fn month_mut(&mut self, month: MonthOfYear) -> &mut MonthBucket {
        &mut self.months[month.index()]
    }

    /// Bucket at a zero-based month index
    pub fn month_at(&self, index: usize) -> Option<&MonthBucket> {
        self.months.get(index)
    }

    pub fn total_income(&self) -> Money {
        self.months.iter().map(MonthBucket::total_income).sum()
    }

    pub fn total_spending(&self) -> Money {
        self.months.iter().map(MonthBucket::total_spending).sum()
    }

    /// Income minus spending for the whole year
    pub fn total_balance(&self) -> Money {
        self.total_income() - self.total_spending()
    }

    pub fn entry_count(&self) -> usize {
        self.months.iter().map(MonthBucket::entry_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.months.iter().all(MonthBucket::is_empty)
    }

    /// Income and spending per month, for the yearly bar chart
    pub fn monthly_totals(&self) -> Vec<MonthlyTotals> {
        self.months
            .iter()
            .map(|bucket| MonthlyTotals {
                month: bucket.month,
                income: bucket.total_income(),
                spending: bucket.total_spending(),
            })
            .collect()
    }
}
