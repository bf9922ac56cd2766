//! Formatting helpers shared by the month and year views

use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::models::Money;

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a date with a user-supplied strftime pattern
///
/// An invalid pattern falls back to ISO dates instead of failing the report.
pub fn format_date(date: &NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        out.clear();
        let _ = write!(out, "{}", date.format(FALLBACK_DATE_FORMAT));
    }
    out
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Bar for a money amount relative to the largest amount on the chart
pub fn money_bar(value: Money, max_value: Money, width: usize) -> String {
    format_bar(value.as_f64(), max_value.as_f64(), width)
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
