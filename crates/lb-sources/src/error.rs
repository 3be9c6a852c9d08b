//! Source adapter error types.

use thiserror::Error;

/// Errors that can occur while fetching from an external source.
///
/// These stay inside the adapter boundary: `fetch` converts them into a
/// `failed` source result rather than propagating them to the aggregator.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The source API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the source.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The source rejected the request at the application level (e.g. a chat
    /// API `ok: false` envelope).
    #[error("source rejected request: {0}")]
    Rejected(String),

    /// Failed to parse a source response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The source returned a 429 Too Many Requests response.
    #[error("rate limited - retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Local repository access failure.
    #[error("repository error: {0}")]
    Repo(String),
}
