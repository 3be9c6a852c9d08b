use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{CheckKind, Confidence, Decision, ExecutionOutcome, TaskField};
use crate::ids;

/// A proposed mutation to one task record, derived from one or more findings.
///
/// Confidence is inherited from the strongest supporting finding and never
/// upgraded. Low-confidence evidence never becomes a suggestion at all.
/// Regardless of confidence a suggestion never self-approves: high confidence
/// only makes it batch-confirmable at the approval gate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Suggestion {
    pub id: String,
    pub record_id: String,
    pub check: CheckKind,
    pub field: TaskField,
    pub from_value: serde_json::Value,
    /// Proposed value. For status changes into `blocked` this is an object
    /// carrying the blocking metadata; otherwise the field's plain value.
    pub to_value: serde_json::Value,
    pub confidence: Confidence,
    /// Derived: true iff confidence is medium.
    pub requires_confirmation: bool,
    /// Signature of the strongest supporting finding, for idempotency.
    pub signature: String,
    /// One-line human rationale built from the evidence.
    pub rationale: String,
    pub decision: Decision,
    pub outcome: Option<ExecutionOutcome>,
    /// Copy-pasteable manual instruction, set when an external mutation
    /// failed and fell back.
    pub fallback: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Suggestion {
    /// Create a pending suggestion with derived flags.
    #[must_use]
    pub fn new(
        record_id: impl Into<String>,
        check: CheckKind,
        field: TaskField,
        from_value: serde_json::Value,
        to_value: serde_json::Value,
        confidence: Confidence,
        signature: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            id: ids::new_id(ids::SUGGESTION_PREFIX),
            record_id: record_id.into(),
            check,
            field,
            from_value,
            to_value,
            confidence,
            requires_confirmation: confidence == Confidence::Medium,
            signature: signature.into(),
            rationale: rationale.into(),
            decision: Decision::Pending,
            outcome: None,
            fallback: None,
            created_at: Utc::now(),
        }
    }

    /// Whether the approval gate may include this suggestion in a single
    /// batch-confirm action. Never implies automatic execution.
    #[must_use]
    pub fn auto_eligible(&self) -> bool {
        self.confidence == Confidence::High && self.decision == Decision::Pending
    }
}
