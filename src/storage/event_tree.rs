//! Event tree document
//!
//! All data lives in one JSON document laid out the way the hosted database
//! keys it:
//!
//! ```text
//! user-events/<user>/<year>/spending/<record id> = { amount, date, category, note }
//! user-events/<user>/<year>/income/<income id>   = { amount, date, source, note }
//! ```
//!
//! The document is handled as untyped JSON so that a malformed node can be
//! reported with its exact path instead of failing the whole file.

use chrono::NaiveDateTime;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{Entry, IncomeEntry, IncomeId, Money, Record, RecordId, UserId};

use super::YearEvents;

pub const ROOT_KEY: &str = "user-events";
pub const SPENDING_KEY: &str = "spending";
pub const INCOME_KEY: &str = "income";

/// Stored form of a record; the id is the node key
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordNode {
    amount: Money,
    date: NaiveDateTime,
    category: String,
    #[serde(default)]
    note: String,
}

impl RecordNode {
    fn from_record(record: &Record) -> Self {
        Self {
            amount: record.amount,
            date: record.date,
            category: record.category.clone(),
            note: record.note.clone(),
        }
    }

    fn into_record(self, id: RecordId) -> Record {
        Record {
            id,
            amount: self.amount,
            date: self.date,
            category: self.category,
            note: self.note,
        }
    }
}

/// Stored form of an income entry; the id is the node key
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IncomeNode {
    amount: Money,
    date: NaiveDateTime,
    #[serde(default)]
    source: String,
    #[serde(default)]
    note: String,
}

impl IncomeNode {
    fn from_income(income: &IncomeEntry) -> Self {
        Self {
            amount: income.amount,
            date: income.date,
            source: income.source.clone(),
            note: income.note.clone(),
        }
    }

    fn into_income(self, id: IncomeId) -> IncomeEntry {
        IncomeEntry {
            id,
            amount: self.amount,
            date: self.date,
            source: self.source,
            note: self.note,
        }
    }
}

/// The whole stored document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDocument {
    #[serde(rename = "user-events", default)]
    users: Map<String, Value>,
}

impl EventDocument {
    /// Whether the user has a node at all
    pub fn has_user(&self, user: &UserId) -> bool {
        self.users.contains_key(user.as_str())
    }

    /// Parse every year stored for the user
    ///
    /// Returns `None` when the user has no node. Years come back in key
    /// order; entries within a year are ordered by date.
    pub fn user_years(&self, user: &UserId) -> TrackerResult<Option<Vec<YearEvents>>> {
        let Some(node) = self.users.get(user.as_str()) else {
            return Ok(None);
        };
        let user_path = format!("{}/{}", ROOT_KEY, user);
        let years = as_object(node, &user_path)?;

        let mut parsed = Vec::with_capacity(years.len());
        for (label, year_node) in years {
            let year_path = format!("{}/{}", user_path, label);
            parsed.push(parse_year(label, year_node, &year_path)?);
        }
        Ok(Some(parsed))
    }

    /// Store a record under the year of its date
    pub fn insert_record(&mut self, user: &UserId, record: &Record) -> TrackerResult<()> {
        let node = serde_json::to_value(RecordNode::from_record(record))?;
        self.insert(user, &record.year_label(), SPENDING_KEY, record.id.key(), node)
    }

    /// Store an income entry under the year of its date
    pub fn insert_income(&mut self, user: &UserId, income: &IncomeEntry) -> TrackerResult<()> {
        let node = serde_json::to_value(IncomeNode::from_income(income))?;
        self.insert(user, &income.year_label(), INCOME_KEY, income.id.key(), node)
    }

    /// Delete a record from whichever year holds it
    pub fn remove_record(&mut self, user: &UserId, id: RecordId) -> TrackerResult<()> {
        if self.remove(user, SPENDING_KEY, &id.key()) {
            Ok(())
        } else {
            Err(TrackerError::record_not_found(id.to_string()))
        }
    }

    /// Delete an income entry from whichever year holds it
    pub fn remove_income(&mut self, user: &UserId, id: IncomeId) -> TrackerResult<()> {
        if self.remove(user, INCOME_KEY, &id.key()) {
            Ok(())
        } else {
            Err(TrackerError::income_not_found(id.to_string()))
        }
    }

    fn insert(
        &mut self,
        user: &UserId,
        year: &str,
        kind: &str,
        key: String,
        node: Value,
    ) -> TrackerResult<()> {
        let user_path = format!("{}/{}", ROOT_KEY, user);
        let years = child_object(&mut self.users, user.as_str(), &user_path)?;

        let year_path = format!("{}/{}", user_path, year);
        let kinds = child_object(years, year, &year_path)?;

        let kind_path = format!("{}/{}", year_path, kind);
        let entries = child_object(kinds, kind, &kind_path)?;

        entries.insert(key, node);
        Ok(())
    }

    /// Remove `key` from the `kind` map of any year, pruning emptied nodes
    fn remove(&mut self, user: &UserId, kind: &str, key: &str) -> bool {
        let Some(Value::Object(years)) = self.users.get_mut(user.as_str()) else {
            return false;
        };

        let mut emptied_year = None;
        let mut removed = false;
        for (label, year_node) in years.iter_mut() {
            let Value::Object(kinds) = year_node else {
                continue;
            };
            let Some(Value::Object(entries)) = kinds.get_mut(kind) else {
                continue;
            };
            if entries.remove(key).is_none() {
                continue;
            }

            removed = true;
            if entries.is_empty() {
                kinds.remove(kind);
            }
            if kinds.is_empty() {
                emptied_year = Some(label.clone());
            }
            break;
        }

        if let Some(label) = emptied_year {
            years.remove(&label);
        }
        removed
    }
}

fn as_object<'a>(node: &'a Value, path: &str) -> TrackerResult<&'a Map<String, Value>> {
    node.as_object().ok_or_else(|| {
        TrackerError::parse(path, format!("expected an object, found {}", kind_of(node)))
    })
}

/// Get or create an object child of `parent`
fn child_object<'a>(
    parent: &'a mut Map<String, Value>,
    key: &str,
    path: &str,
) -> TrackerResult<&'a mut Map<String, Value>> {
    let child = parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    let found = kind_of(child);
    child
        .as_object_mut()
        .ok_or_else(|| TrackerError::parse(path, format!("expected an object, found {}", found)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_year(label: &str, node: &Value, path: &str) -> TrackerResult<YearEvents> {
    let kinds = as_object(node, path)?;

    let mut records = parse_entries(kinds, SPENDING_KEY, path, RecordNode::into_record)?;
    let mut incomes = parse_entries(kinds, INCOME_KEY, path, IncomeNode::into_income)?;

    records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.as_uuid().cmp(b.id.as_uuid())));
    incomes.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.as_uuid().cmp(b.id.as_uuid())));

    Ok(YearEvents {
        label: label.to_string(),
        records,
        incomes,
    })
}

fn parse_entries<N, I, T, F>(
    kinds: &Map<String, Value>,
    kind: &str,
    year_path: &str,
    build: F,
) -> TrackerResult<Vec<T>>
where
    N: DeserializeOwned,
    I: std::str::FromStr,
    T: Entry,
    F: Fn(N, I) -> T,
{
    let Some(node) = kinds.get(kind) else {
        return Ok(Vec::new());
    };
    let kind_path = format!("{}/{}", year_path, kind);
    let entries = as_object(node, &kind_path)?;

    entries
        .iter()
        .map(|(key, value)| {
            let path = format!("{}/{}", kind_path, key);
            let id: I = key
                .parse()
                .map_err(|_| TrackerError::parse(&path, "key is not a valid id"))?;
            let parsed: N = N::deserialize(value)
                .map_err(|e| TrackerError::parse(&path, e.to_string()))?;
            let entry = build(parsed, id);
            entry
                .validate()
                .map_err(|e| TrackerError::parse(&path, e.to_string()))?;
            Ok(entry)
        })
        .collect()
}
