//! Display formatting for terminal output
//!
//! Renders month and year aggregates as plain text reports.

pub mod month;
pub mod report;
pub mod year;

pub use month::format_month_overview;
pub use year::format_year_overview;

/// Presentation preferences taken from the user's settings
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub currency_symbol: String,
    pub date_format: String,
    pub chart_width: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "$".into(),
            date_format: "%Y-%m-%d".into(),
            chart_width: 30,
        }
    }
}

impl From<&crate::config::Settings> for DisplayOptions {
    fn from(settings: &crate::config::Settings) -> Self {
        Self {
            currency_symbol: settings.currency_symbol.clone(),
            date_format: settings.date_format.clone(),
            chart_width: settings.chart_width,
        }
    }
}
