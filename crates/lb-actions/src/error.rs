//! Gate and executor error types.

use lb_core::enums::Decision;
use lb_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    /// No suggestion with the given ID in the batch.
    #[error("suggestion not found: {0}")]
    NotFound(String),

    /// Decisions are terminal; only `pending` may transition.
    #[error("cannot move suggestion from {from} to {to}")]
    InvalidDecision { from: Decision, to: Decision },

    /// An `edited` decision needs the replacement value.
    #[error("edited decision requires a replacement value")]
    MissingEditValue,

    /// Superseded batches are retained for history but refuse execution.
    #[error("batch {0} was superseded by a newer run")]
    BatchSuperseded(String),

    /// Local store failure outside per-suggestion execution (e.g. persisting
    /// the batch itself).
    #[error(transparent)]
    Store(#[from] StoreError),
}
