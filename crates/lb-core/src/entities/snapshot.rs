use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{SourceEvent, SourceResult};
use crate::enums::SourceStatus;
use crate::window::{Period, TimeWindow};

/// One immutable, time-windowed aggregation of external events.
///
/// Partial snapshots are first-class: a snapshot with zero successful sources
/// is still valid and flows through the rest of the pipeline (all findings
/// will simply be empty downstream).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ContextSnapshot {
    pub window: TimeWindow,
    pub period: Period,
    pub generated_at: DateTime<Utc>,
    /// One sub-result per configured source, in [`crate::enums::SourceKind::ALL`] order.
    pub sources: Vec<SourceResult>,
    /// Materialized mapping from task record ID to the events linked to it.
    /// Events matching no record stay only in `sources` (retained for audit).
    pub links: BTreeMap<String, Vec<SourceEvent>>,
}

impl ContextSnapshot {
    /// Events linked to one record. Missing entries read as empty.
    #[must_use]
    pub fn events_for(&self, record_id: &str) -> &[SourceEvent] {
        self.links.get(record_id).map_or(&[], Vec::as_slice)
    }

    /// Sources that produced usable data.
    #[must_use]
    pub fn successful_sources(&self) -> usize {
        self.sources.iter().filter(|s| s.status.has_data()).count()
    }

    /// Sources that were enabled but failed.
    #[must_use]
    pub fn failed_sources(&self) -> usize {
        self.sources
            .iter()
            .filter(|s| s.status == SourceStatus::Failed)
            .count()
    }

    /// Total event count across all sub-results.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.sources.iter().map(|s| s.events.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::SourceKind;

    #[test]
    fn empty_snapshot_is_valid_and_countable() {
        let now = Utc::now();
        let snapshot = ContextSnapshot {
            window: TimeWindow::ending_at(now, chrono::Duration::hours(24)),
            period: Period::Last24h,
            generated_at: now,
            sources: vec![
                SourceResult::failed(SourceKind::Chat, "boom"),
                SourceResult::failed(SourceKind::Tracker, "boom"),
                SourceResult::disabled(SourceKind::Wiki),
                SourceResult::disabled(SourceKind::Vcs),
            ],
            links: BTreeMap::new(),
        };
        assert_eq!(snapshot.successful_sources(), 0);
        assert_eq!(snapshot.failed_sources(), 2);
        assert_eq!(snapshot.event_count(), 0);
        assert!(snapshot.events_for("anything").is_empty());

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: ContextSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
