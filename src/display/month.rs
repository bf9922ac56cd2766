//! Month overview: totals, spending by category and the entry list

use super::report::{format_date, money_bar, separator, truncate};
use super::DisplayOptions;
use crate::models::MonthBucket;

const WIDTH: usize = 78;

/// Render one month of a year
pub fn format_month_overview(
    bucket: &MonthBucket,
    year_label: &str,
    options: &DisplayOptions,
) -> String {
    let symbol = options.currency_symbol.as_str();
    let mut output = String::new();

    output.push_str(&format!("{} {}\n", bucket.month.name(), year_label));
    output.push_str(&separator(WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "{:<12} {:>14}\n",
        "Income:",
        bucket.total_income().format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "{:<12} {:>14}\n",
        "Spending:",
        bucket.total_spending().format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "{:<12} {:>14}\n",
        "Balance:",
        bucket.total_balance().format_with_symbol(symbol)
    ));

    if bucket.is_empty() {
        output.push_str("\nNo records for this month.\n");
        return output;
    }

    let breakdown = bucket.spending_by_category();
    if let Some((_, largest)) = breakdown.first() {
        output.push_str("\nSpending by category\n");
        for (category, total) in &breakdown {
            output.push_str(&format!(
                "  {:<20} {:>12}  {}\n",
                truncate(category, 20),
                total.format_with_symbol(symbol),
                money_bar(*total, *largest, options.chart_width)
            ));
        }
    }

    output.push_str("\nEntries\n");
    output.push_str(&separator(WIDTH));
    output.push('\n');

    for income in &bucket.incomes {
        let label = if income.source.is_empty() {
            "(income)"
        } else {
            income.source.as_str()
        };
        output.push_str(&format!(
            "{:<12} {:<20} {:>12}  inc-{}{}\n",
            format_date(&income.date, &options.date_format),
            truncate(label, 20),
            format!("+{}", income.amount.format_with_symbol(symbol)),
            income.id.key(),
            note_suffix(&income.note)
        ));
    }

    for record in &bucket.records {
        output.push_str(&format!(
            "{:<12} {:<20} {:>12}  rec-{}{}\n",
            format_date(&record.date, &options.date_format),
            truncate(&record.category, 20),
            format!("-{}", record.amount.format_with_symbol(symbol)),
            record.id.key(),
            note_suffix(&record.note)
        ));
    }

    output
}

fn note_suffix(note: &str) -> String {
    if note.is_empty() {
        String::new()
    } else {
        format!("  {}", truncate(note, 30))
    }
}
