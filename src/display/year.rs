//! Year overview with a per-month income/spending chart

use super::report::{money_bar, separator};
use super::DisplayOptions;
use crate::models::{Money, YearAggregate};

const WIDTH: usize = 78;

/// Render a year as a 12-row chart followed by totals
///
/// Each month gets an income row and a spending row. Bars are scaled to the
/// largest single monthly amount in the year.
pub fn format_year_overview(year: &YearAggregate, options: &DisplayOptions) -> String {
    let symbol = options.currency_symbol.as_str();
    let totals = year.monthly_totals();
    let largest = totals
        .iter()
        .flat_map(|t| [t.income, t.spending])
        .max()
        .unwrap_or_else(Money::zero);

    let mut output = String::new();
    output.push_str(&format!("Year {}\n", year.label));
    output.push_str(&separator(WIDTH));
    output.push('\n');

    for month in &totals {
        output.push_str(&format!(
            "{:<4} in  {} {:>12}\n",
            month.month.short_name(),
            money_bar(month.income, largest, options.chart_width),
            month.income.format_with_symbol(symbol)
        ));
        output.push_str(&format!(
            "{:<4} out {} {:>12}\n",
            "",
            money_bar(month.spending, largest, options.chart_width),
            month.spending.format_with_symbol(symbol)
        ));
    }

    output.push_str(&separator(WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "{:<12} {:>14}\n",
        "Income:",
        year.total_income().format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "{:<12} {:>14}\n",
        "Spending:",
        year.total_spending().format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "{:<12} {:>14}\n",
        "Balance:",
        year.total_balance().format_with_symbol(symbol)
    ));
    output.push_str(&format!("{:<12} {:>14}\n", "Entries:", year.entry_count()));

    output
}
