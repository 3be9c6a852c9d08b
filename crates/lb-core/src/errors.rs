//! Cross-cutting error types for Logbook.
//!
//! Domain-specific errors (`StoreError`, `SourceError`, ...) live in their
//! respective crates and converge into `anyhow` at the CLI. Entity-level
//! invariant checks raise [`CoreError`] here.

use thiserror::Error;

/// Errors raised by the core entity types themselves.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (record invariants, formats, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
