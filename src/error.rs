//! Custom error types for the expense tracker
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for expense tracker operations
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Stored event data that does not have the expected shape
    #[error("Malformed data at '{path}': {reason}")]
    Parse { path: String, reason: String },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Fetching the user's records failed or there was nothing to fetch
    #[error("Failed to fetch records")]
    FetchRecordFailed(#[source] Box<TrackerError>),

    /// Saving a spending record failed
    #[error("Failed to save record")]
    SaveRecordFailed(#[source] Box<TrackerError>),

    /// Saving an income entry failed
    #[error("Failed to save income")]
    SaveIncomeFailed(#[source] Box<TrackerError>),

    /// Removing a spending record failed
    #[error("Failed to remove record")]
    RemoveRecordFailed(#[source] Box<TrackerError>),

    /// Removing an income entry failed
    #[error("Failed to remove income")]
    RemoveIncomeFailed(#[source] Box<TrackerError>),
}

impl TrackerError {
    /// Create a "not found" error for spending records
    pub fn record_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Record",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for income entries
    pub fn income_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Income",
            identifier: identifier.into(),
        }
    }

    /// Create a parse error for a node in the event tree
    pub fn parse(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The underlying error of a failed store operation, if any
    pub fn cause(&self) -> Option<&TrackerError> {
        match self {
            Self::FetchRecordFailed(cause)
            | Self::SaveRecordFailed(cause)
            | Self::SaveIncomeFailed(cause)
            | Self::RemoveRecordFailed(cause)
            | Self::RemoveIncomeFailed(cause) => Some(cause.as_ref()),
            _ => None,
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for expense tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;
