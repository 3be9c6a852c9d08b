use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Alert, Suggestion};
use crate::ids;
use crate::window::{Period, TimeWindow};

/// The serializable artifact that persists between the approval gate and the
/// executor. Writing it to disk and reloading reproduces the exact per-
/// suggestion decision state, so the pipeline can be interrupted and resumed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SuggestionBatch {
    pub id: String,
    pub period: Period,
    pub window: TimeWindow,
    pub created_at: DateTime<Utc>,
    pub suggestions: Vec<Suggestion>,
    pub alerts: Vec<Alert>,
    /// Set when a newer run produced a batch; superseded batches are retained
    /// on disk but refuse execution.
    #[serde(default)]
    pub superseded: bool,
}

impl SuggestionBatch {
    #[must_use]
    pub fn new(
        period: Period,
        window: TimeWindow,
        suggestions: Vec<Suggestion>,
        alerts: Vec<Alert>,
    ) -> Self {
        Self {
            id: ids::new_id(ids::BATCH_PREFIX),
            period,
            window,
            created_at: Utc::now(),
            suggestions,
            alerts,
            superseded: false,
        }
    }

    /// Whether any suggestion still awaits a human decision.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.suggestions
            .iter()
            .any(|s| s.decision == crate::enums::Decision::Pending)
    }

    #[must_use]
    pub fn suggestion(&self, id: &str) -> Option<&Suggestion> {
        self.suggestions.iter().find(|s| s.id == id)
    }

    pub fn suggestion_mut(&mut self, id: &str) -> Option<&mut Suggestion> {
        self.suggestions.iter_mut().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{CheckKind, Confidence, Decision, TaskField};
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn batch_roundtrips_with_decisions_intact() {
        let now = Utc::now();
        let mut batch = SuggestionBatch::new(
            Period::Last24h,
            TimeWindow::ending_at(now, Duration::hours(24)),
            vec![
                Suggestion::new(
                    "task-a",
                    CheckKind::BlockerResolved,
                    TaskField::Status,
                    json!("blocked"),
                    json!("started"),
                    Confidence::High,
                    "sig-a",
                    "blocker resolved",
                ),
                Suggestion::new(
                    "task-b",
                    CheckKind::ImplicitDateChange,
                    TaskField::NextActionDue,
                    json!("2026-01-10"),
                    json!("2026-01-17"),
                    Confidence::Medium,
                    "sig-b",
                    "date slipped",
                ),
            ],
            vec![],
        );
        batch.suggestions[0].decision = Decision::Approved;
        batch.suggestions[1].decision = Decision::Rejected;

        let json = serde_json::to_string_pretty(&batch).unwrap();
        let back: SuggestionBatch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, batch);
        assert!(!back.has_pending());
    }

    #[test]
    fn superseded_defaults_to_false_for_old_artifacts() {
        let now = Utc::now();
        let batch = SuggestionBatch::new(
            Period::Last7d,
            TimeWindow::ending_at(now, Duration::days(7)),
            vec![],
            vec![],
        );
        let mut value = serde_json::to_value(&batch).unwrap();
        value.as_object_mut().unwrap().remove("superseded");
        let back: SuggestionBatch = serde_json::from_value(value).unwrap();
        assert!(!back.superseded);
    }
}
