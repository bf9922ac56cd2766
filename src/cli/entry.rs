//! Adding and removing entries

use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::Args;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{IncomeEntry, IncomeId, Money, Record, RecordId};
use crate::services::DataManager;

/// Arguments shared by `spend` and `income`
#[derive(Args, Debug)]
pub struct EntryArgs {
    /// Amount (e.g. "12.50" or "$1,200")
    pub amount: String,
    /// Date (YYYY-MM-DD or "YYYY-MM-DD HH:MM"), defaults to now
    #[arg(short, long)]
    pub date: Option<String>,
    /// Free-form note
    #[arg(short, long)]
    pub note: Option<String>,
}

impl EntryArgs {
    fn amount(&self) -> TrackerResult<Money> {
        Money::parse(&self.amount).map_err(|e| {
            TrackerError::Validation(format!(
                "Invalid amount: '{}'. Use format like '12.50'. Error: {}",
                self.amount, e
            ))
        })
    }

    fn date(&self) -> TrackerResult<NaiveDateTime> {
        match &self.date {
            Some(text) => parse_date(text),
            None => Ok(Local::now().naive_local()),
        }
    }
}

/// Record a spending entry
pub fn handle_spend(manager: &DataManager, args: EntryArgs, category: String) -> TrackerResult<()> {
    let mut record = Record::new(args.amount()?, args.date()?, category);
    if let Some(note) = &args.note {
        record = record.with_note(note.as_str());
    }

    manager.save_record(&record)?;

    println!("Recorded spending: {}", record);
    println!("  ID: rec-{}", record.id.key());
    Ok(())
}

/// Record an income entry
pub fn handle_income(manager: &DataManager, args: EntryArgs, source: String) -> TrackerResult<()> {
    let mut income = IncomeEntry::new(args.amount()?, args.date()?, source);
    if let Some(note) = &args.note {
        income = income.with_note(note.as_str());
    }

    manager.save_income(&income)?;

    println!("Recorded income: {}", income);
    println!("  ID: inc-{}", income.id.key());
    Ok(())
}

/// Remove a record or income entry by id
///
/// Ids prefixed with `inc-` (or any id when `income` is set) are income
/// entries; everything else is treated as a spending record.
pub fn handle_remove(manager: &DataManager, id: &str, income: bool) -> TrackerResult<()> {
    let id = id.trim();

    if income || id.starts_with("inc-") {
        let income_id: IncomeId = id
            .parse()
            .map_err(|_| TrackerError::Validation(format!("Invalid income id: '{}'", id)))?;
        manager.remove_income(income_id)?;
        println!("Removed income inc-{}", income_id.key());
    } else {
        let record_id: RecordId = id
            .parse()
            .map_err(|_| TrackerError::Validation(format!("Invalid record id: '{}'", id)))?;
        manager.remove_record(record_id)?;
        println!("Removed record rec-{}", record_id.key());
    }

    Ok(())
}

/// Parse a command-line date, with or without a time of day
pub fn parse_date(text: &str) -> TrackerResult<NaiveDateTime> {
    let text = text.trim();

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(date);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(|day| day.and_time(chrono::NaiveTime::MIN))
        .map_err(|_| {
            TrackerError::Validation(format!(
                "Invalid date: '{}'. Use YYYY-MM-DD or 'YYYY-MM-DD HH:MM'",
                text
            ))
        })
}
