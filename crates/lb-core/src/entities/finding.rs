use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::SourceEvent;
use crate::enums::{Confidence, FindingKind};

/// A single piece of evidence extracted from a snapshot that confirms or
/// contradicts one task record's metadata.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Finding {
    pub id: String,
    pub record_id: String,
    pub kind: FindingKind,
    pub confidence: Confidence,
    /// The evidentiary event.
    pub event: SourceEvent,
    /// Stable signature used for idempotency: the same evidence produces the
    /// same signature across runs over overlapping windows.
    pub signature: String,
}

impl Finding {
    /// Build the deterministic signature for a piece of evidence.
    #[must_use]
    pub fn signature_for(record_id: &str, kind: FindingKind, event: &SourceEvent) -> String {
        format!("{record_id}:{kind}:{}:{}", event.source, event.id)
    }
}

/// Kind of informational alert. Alerts are surfaced in reports but are not
/// mutations and never enter the approval gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Overdue,
    Stale,
}

impl AlertKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Stale => "stale",
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An informational alert about one record (overdue next action, no activity).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Alert {
    pub record_id: String,
    pub kind: AlertKind,
    pub message: String,
}
