//! File-backed event store
//!
//! Keeps the whole event document in memory and rewrites `events.json`
//! atomically after every mutation.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{IncomeEntry, IncomeId, Record, RecordId, UserId};

use super::event_tree::EventDocument;
use super::file_io::{read_json, write_json_atomic};
use super::{ExpenseStore, YearEvents};

/// [`ExpenseStore`] over a JSON event document on disk
pub struct JsonEventStore {
    path: PathBuf,
    document: RwLock<EventDocument>,
}

impl JsonEventStore {
    /// Create an empty store that will write to `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            document: RwLock::new(EventDocument::default()),
        }
    }

    /// Create a store and load whatever is already on disk
    pub fn open(path: PathBuf) -> TrackerResult<Self> {
        let store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload the document from disk, replacing the cached copy
    pub fn load(&self) -> TrackerResult<()> {
        let loaded: EventDocument = read_json(&self.path)?;

        let mut document = self
            .document
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *document = loaded;

        debug!(path = %self.path.display(), "loaded event document");
        Ok(())
    }

    /// Apply `change` to a copy of the document, persist it, then swap it in
    ///
    /// The cached document is left untouched if the change or the write fails.
    fn mutate<F>(&self, change: F) -> TrackerResult<()>
    where
        F: FnOnce(&mut EventDocument) -> TrackerResult<()>,
    {
        let mut document = self
            .document
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut updated = document.clone();
        change(&mut updated)?;
        write_json_atomic(&self.path, &updated)?;
        *document = updated;
        Ok(())
    }
}

impl ExpenseStore for JsonEventStore {
    fn fetch_years(&self, user: &UserId) -> TrackerResult<Vec<YearEvents>> {
        let document = self
            .document
            .read()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let years = document.user_years(user)?.ok_or_else(|| TrackerError::NotFound {
            entity_type: "User events",
            identifier: user.to_string(),
        })?;

        debug!(user = %user, years = years.len(), "fetched event tree");
        Ok(years)
    }

    fn save_record(&self, user: &UserId, record: &Record) -> TrackerResult<()> {
        self.mutate(|doc| doc.insert_record(user, record))?;
        info!(user = %user, id = %record.id, amount = %record.amount, "saved record");
        Ok(())
    }

    fn save_income(&self, user: &UserId, income: &IncomeEntry) -> TrackerResult<()> {
        self.mutate(|doc| doc.insert_income(user, income))?;
        info!(user = %user, id = %income.id, amount = %income.amount, "saved income");
        Ok(())
    }

    fn remove_record(&self, user: &UserId, id: RecordId) -> TrackerResult<()> {
        self.mutate(|doc| doc.remove_record(user, id))?;
        info!(user = %user, id = %id, "removed record");
        Ok(())
    }

    fn remove_income(&self, user: &UserId, id: IncomeId) -> TrackerResult<()> {
        self.mutate(|doc| doc.remove_income(user, id))?;
        info!(user = %user, id = %id, "removed income");
        Ok(())
    }
}
