//! Month and year navigation
//!
//! The cursor is a pair of indices into the year collection: which month of
//! the selected year is shown and which year is selected. It never owns the
//! collection, so every query takes the years it should look into.

use chrono::{Datelike, Local};

use crate::models::{MonthBucket, MonthOfYear, YearAggregate};

/// Direction of a navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Forward,
    Backward,
}

/// Selected month and year
///
/// All steps are total: stepping past a boundary leaves the cursor where it
/// is and reports that nothing moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationCursor {
    month_index: usize,
    year_index: usize,
}

impl NavigationCursor {
    /// Cursor on the given month of the first year
    pub fn new(month: MonthOfYear) -> Self {
        Self {
            month_index: month.index(),
            year_index: 0,
        }
    }

    /// Cursor on the real-world current month
    pub fn starting_today() -> Self {
        Self::new(MonthOfYear::of(&Local::now().date_naive()))
    }

    pub fn month_index(&self) -> usize {
        self.month_index
    }

    pub fn year_index(&self) -> usize {
        self.year_index
    }

    /// The selected month of the year
    pub fn month(&self) -> MonthOfYear {
        MonthOfYear::ALL[self.month_index]
    }

    pub fn current_year<'a>(&self, years: &'a [YearAggregate]) -> Option<&'a YearAggregate> {
        years.get(self.year_index)
    }

    pub fn current_month<'a>(&self, years: &'a [YearAggregate]) -> Option<&'a MonthBucket> {
        self.current_year(years)
            .and_then(|year| year.month_at(self.month_index))
    }

    /// Move one month; returns false if already at January/December
    pub fn step_month(&mut self, step: Step) -> bool {
        match step {
            Step::Forward if self.can_step_month_forward() => self.month_index += 1,
            Step::Backward if self.can_step_month_backward() => self.month_index -= 1,
            _ => return false,
        }
        true
    }

    /// Move one year within a collection of `year_count` years
    ///
    /// Returns false if the collection is empty or the cursor is already on
    /// the first/last year.
    pub fn step_year(&mut self, step: Step, year_count: usize) -> bool {
        match step {
            Step::Forward if year_count > 0 && self.year_index + 1 < year_count => {
                self.year_index += 1
            }
            Step::Backward if self.year_index > 0 => self.year_index -= 1,
            _ => return false,
        }
        true
    }

    pub fn can_step_month_forward(&self) -> bool {
        self.month_index < MonthOfYear::ALL.len() - 1
    }

    pub fn can_step_month_backward(&self) -> bool {
        self.month_index > 0
    }

    /// False for collections with fewer than two years
    pub fn can_step_year_forward(&self, year_count: usize) -> bool {
        year_count > 1 && self.year_index + 1 < year_count
    }

    /// False for collections with fewer than two years
    pub fn can_step_year_backward(&self, year_count: usize) -> bool {
        year_count > 1 && self.year_index > 0
    }

    /// Re-clamp after the collection was replaced: land on the latest year.
    /// The month is left alone.
    pub fn land_on_latest(&mut self, year_count: usize) {
        self.year_index = year_count.saturating_sub(1);
    }
}

impl Default for NavigationCursor {
    fn default() -> Self {
        Self::starting_today()
    }
}
