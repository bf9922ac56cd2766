//! Month and year views

use clap::Args;
use tracing::debug;

use crate::display::{format_month_overview, format_year_overview, DisplayOptions};
use crate::error::TrackerResult;
use crate::services::DataManager;

/// Navigation for the month view, relative to the current month of the latest year
#[derive(Args, Debug, Default)]
pub struct MonthArgs {
    /// Months to step back
    #[arg(short, long, default_value_t = 0)]
    pub back: usize,
    /// Months to step forward
    #[arg(short, long, default_value_t = 0)]
    pub forward: usize,
    /// Years to step back
    #[arg(short = 'y', long, default_value_t = 0)]
    pub year_back: usize,
}

/// Navigation for the year view, relative to the latest year
#[derive(Args, Debug, Default)]
pub struct YearArgs {
    /// Years to step back
    #[arg(short, long, default_value_t = 0)]
    pub back: usize,
    /// Years to step forward
    #[arg(short, long, default_value_t = 0)]
    pub forward: usize,
}

/// Show the month overview at the requested position
pub fn handle_month(
    manager: &DataManager,
    options: &DisplayOptions,
    args: MonthArgs,
) -> TrackerResult<()> {
    if !load(manager)? {
        println!("No records");
        return Ok(());
    }

    step_years_back(manager, args.year_back);
    for _ in 0..args.back {
        if manager.go_to_previous_month().is_none() {
            break;
        }
    }
    for _ in 0..args.forward {
        if manager.go_to_next_month().is_none() {
            break;
        }
    }

    let (Some(year), Some(month)) = (manager.current_year(), manager.current_month()) else {
        println!("No records");
        return Ok(());
    };

    print!("{}", format_month_overview(&month, &year.label, options));
    print_hints(
        manager.can_go_to_previous_month(),
        manager.can_go_to_next_month(),
        "month",
    );
    Ok(())
}

/// Show the year overview at the requested position
pub fn handle_year(
    manager: &DataManager,
    options: &DisplayOptions,
    args: YearArgs,
) -> TrackerResult<()> {
    if !load(manager)? {
        println!("No records");
        return Ok(());
    }

    step_years_back(manager, args.back);
    for _ in 0..args.forward {
        if manager.go_to_next_year().is_none() {
            break;
        }
    }

    let Some(year) = manager.current_year() else {
        println!("No records");
        return Ok(());
    };

    print!("{}", format_year_overview(&year, options));
    print_hints(
        manager.can_go_to_previous_year(),
        manager.can_go_to_next_year(),
        "year",
    );
    Ok(())
}

/// Fetch the user's data; `false` when there is nothing to show
fn load(manager: &DataManager) -> TrackerResult<bool> {
    match manager.fetch_data() {
        Ok(_) => Ok(manager.year_count() > 0),
        Err(err) if err.cause().is_some_and(|cause| cause.is_not_found()) => {
            debug!(user = %manager.user(), "no events stored for user");
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

fn step_years_back(manager: &DataManager, count: usize) {
    for _ in 0..count {
        if manager.go_to_previous_year().is_none() {
            break;
        }
    }
}

fn print_hints(has_previous: bool, has_next: bool, unit: &str) {
    let mut hints = Vec::new();
    if has_previous {
        hints.push(format!("earlier {} available", unit));
    }
    if has_next {
        hints.push(format!("later {} available", unit));
    }
    if !hints.is_empty() {
        println!();
        println!("{}", hints.join(" | "));
    }
}
