//! Store error types.

use thiserror::Error;

/// Errors raised by the task store, execution log, and batch store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem read/write failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A task file could not be parsed into a record.
    #[error("parse error in {path}: {reason}")]
    Parse { path: String, reason: String },

    /// No task file exists for the given ID.
    #[error("task not found: {0}")]
    NotFound(String),

    /// An update carried a value the target field cannot accept, or would
    /// violate a record invariant.
    #[error("invalid update for {field} on {id}: {reason}")]
    InvalidUpdate {
        id: String,
        field: String,
        reason: String,
    },

    /// JSON (de)serialization failure for state artifacts.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
