use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ExecutionOutcome, TaskField};

/// Append-only record of one executed suggestion.
///
/// Keyed by `(record_id, field, signature)`: the suggestion engine consults
/// the log to avoid re-offering a suggestion whose evidence already produced
/// a successful execution, which is what makes re-runs over overlapping
/// windows idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExecutionLogEntry {
    pub ts: DateTime<Utc>,
    pub suggestion_id: String,
    pub record_id: String,
    pub field: TaskField,
    /// Originating finding signature.
    pub signature: String,
    pub outcome: ExecutionOutcome,
}

impl ExecutionLogEntry {
    /// Whether this entry suppresses an equivalent suggestion.
    #[must_use]
    pub fn suppresses(&self, record_id: &str, field: TaskField, signature: &str) -> bool {
        self.outcome.suppresses_reoffer()
            && self.record_id == record_id
            && self.field == field
            && self.signature == signature
    }
}
