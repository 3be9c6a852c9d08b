use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{SourceKind, SourceStatus};

/// An explicit, machine-structured field change reported by an authoritative
/// source (e.g. a tracker status transition or due-date edit). Its presence
/// is what qualifies an event as high-confidence evidence.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StructuredChange {
    /// Source-side field name (`resolution`, `status`, `duedate`, ...).
    pub field: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// One extracted activity event from an external source.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SourceEvent {
    pub id: String,
    pub source: SourceKind,
    pub ts: DateTime<Utc>,
    pub author: Option<String>,
    /// Short label: issue summary, page title, commit subject, channel name.
    pub title: String,
    /// Full text used for signal extraction. May be empty.
    pub body: String,
    /// External reference keys carried by the event (e.g. `PROJ-123`).
    pub refs: Vec<String>,
    /// Changed file paths, for version-control events.
    pub paths: Vec<String>,
    pub url: Option<String>,
    pub change: Option<StructuredChange>,
}

impl SourceEvent {
    /// Title and body joined for text-signal scanning.
    #[must_use]
    pub fn text(&self) -> String {
        if self.body.is_empty() {
            self.title.clone()
        } else {
            format!("{}\n{}", self.title, self.body)
        }
    }
}

/// One adapter's contribution to a snapshot. A failed fetch is recorded here
/// as data; it never aborts the aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SourceResult {
    pub source: SourceKind,
    pub status: SourceStatus,
    pub error: Option<String>,
    pub events: Vec<SourceEvent>,
}

impl SourceResult {
    /// A failure sub-result with no events.
    #[must_use]
    pub fn failed(source: SourceKind, error: impl Into<String>) -> Self {
        Self {
            source,
            status: SourceStatus::Failed,
            error: Some(error.into()),
            events: Vec::new(),
        }
    }

    /// A sub-result for a source that is not configured or not enabled.
    #[must_use]
    pub const fn disabled(source: SourceKind) -> Self {
        Self {
            source,
            status: SourceStatus::Disabled,
            error: None,
            events: Vec::new(),
        }
    }

    /// A successful sub-result carrying `events`.
    #[must_use]
    pub const fn success(source: SourceKind, events: Vec<SourceEvent>) -> Self {
        Self {
            source,
            status: SourceStatus::Success,
            error: None,
            events,
        }
    }
}
