//! Context-layer error types.

use thiserror::Error;

/// Errors from the snapshot cache. Aggregation itself is infallible — source
/// failures are data in the snapshot, not errors.
#[derive(Debug, Error)]
pub enum ContextError {
    /// Filesystem read/write failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Cache entry (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ContextError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
