//! # lb-engine
//!
//! The suggestion engine: per record, classify the events the snapshot linked
//! to it into findings, then run the closed check table over those findings.
//! Checks see only their record's linked findings — the engine is linear in
//! event count, never record×event.
//!
//! Suggestions that already have a successful execution log entry for the
//! same `(record, field, signature)` are suppressed before they surface,
//! which makes re-runs over overlapping windows idempotent. Rejection is not
//! suppression: only success suppresses.

pub mod checks;
pub mod findings;
pub mod signals;

pub use checks::EngineParams;

use lb_core::entities::{Alert, ContextSnapshot, ExecutionLogEntry, Finding, Suggestion, TaskRecord};
use lb_core::enums::CheckKind;

/// Everything one engine pass produced.
#[derive(Debug, Default)]
pub struct EngineOutput {
    /// All findings, including low-confidence topical mentions (recorded for
    /// audit, never surfaced).
    pub findings: Vec<Finding>,
    pub suggestions: Vec<Suggestion>,
    pub alerts: Vec<Alert>,
}

/// Run the full check table over every record.
#[must_use]
pub fn evaluate(
    records: &[TaskRecord],
    snapshot: &ContextSnapshot,
    executed: &[ExecutionLogEntry],
    params: &EngineParams,
) -> EngineOutput {
    let mut output = EngineOutput::default();

    for record in records {
        let events = snapshot.events_for(&record.id);
        let record_findings = findings::extract(record, events, params.today);

        for check in CheckKind::ALL {
            let result = checks::run(check, record, &record_findings, params);
            for suggestion in result.suggestions {
                if already_executed(executed, &suggestion) {
                    tracing::debug!(
                        record = %suggestion.record_id,
                        signature = %suggestion.signature,
                        "suppressing already-executed suggestion"
                    );
                    continue;
                }
                output.suggestions.push(suggestion);
            }
            output.alerts.extend(result.alerts);
        }

        output.findings.extend(record_findings);
    }

    output
}

fn already_executed(executed: &[ExecutionLogEntry], suggestion: &Suggestion) -> bool {
    executed
        .iter()
        .any(|entry| entry.suppresses(&suggestion.record_id, suggestion.field, &suggestion.signature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use pretty_assertions::assert_eq;
    use lb_core::entities::{BlockInfo, SourceEvent, SourceResult, StructuredChange};
    use lb_core::enums::{
        Category, Confidence, Decision, ExecutionOutcome, Priority, SourceKind, TaskField,
        TaskStatus,
    };
    use lb_core::window::{Period, TimeWindow};
    use std::collections::BTreeMap;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn params() -> EngineParams {
        EngineParams {
            today: day("2026-01-15"),
            stale_threshold_days: 7,
        }
    }

    fn blocked_record() -> TaskRecord {
        TaskRecord {
            id: "vendor-contract".to_string(),
            title: "Renew vendor contract".to_string(),
            category: Category::Admin,
            priority: Priority::P2,
            status: TaskStatus::Blocked,
            due_date: None,
            next_action: None,
            next_action_due: None,
            block: Some(BlockInfo {
                block_type: Some("approval".to_string()),
                blocked_by: "legal review".to_string(),
                expected: Some(day("2026-01-10")),
            }),
            progress: vec![],
            pending_steps: vec![],
            refs: vec!["PROJ-77".to_string()],
            updated_at: Utc::now(),
        }
    }

    fn resolution_event() -> SourceEvent {
        SourceEvent {
            id: "jira-PROJ-77-1".to_string(),
            source: SourceKind::Tracker,
            ts: Utc::now(),
            author: None,
            title: "PROJ-77: legal review".to_string(),
            body: "resolution: Done".to_string(),
            refs: vec!["PROJ-77".to_string()],
            paths: vec![],
            url: None,
            change: Some(StructuredChange {
                field: "resolution".to_string(),
                from: None,
                to: Some("Done".to_string()),
            }),
        }
    }

    fn snapshot_with(record_id: &str, events: Vec<SourceEvent>) -> ContextSnapshot {
        let window = TimeWindow::ending_at(Utc::now(), chrono::Duration::hours(24));
        let mut links = BTreeMap::new();
        links.insert(record_id.to_string(), events.clone());
        ContextSnapshot {
            window,
            period: Period::Last24h,
            generated_at: Utc::now(),
            sources: vec![SourceResult::success(SourceKind::Tracker, events)],
            links,
        }
    }

    #[test]
    fn blocker_resolution_emits_exactly_one_high_suggestion() {
        let record = blocked_record();
        let snapshot = snapshot_with(&record.id, vec![resolution_event()]);
        let output = evaluate(&[record], &snapshot, &[], &params());

        assert_eq!(output.suggestions.len(), 1);
        let s = &output.suggestions[0];
        assert_eq!(s.field, TaskField::Status);
        assert_eq!(s.to_value, serde_json::json!("started"));
        assert_eq!(s.confidence, Confidence::High);
        assert!(s.auto_eligible());
        assert!(!s.requires_confirmation);
    }

    #[test]
    fn successful_execution_suppresses_reemission() {
        let record = blocked_record();
        let snapshot = snapshot_with(&record.id, vec![resolution_event()]);

        let first = evaluate(std::slice::from_ref(&record), &snapshot, &[], &params());
        let s = &first.suggestions[0];
        let log = vec![ExecutionLogEntry {
            ts: Utc::now(),
            suggestion_id: s.id.clone(),
            record_id: s.record_id.clone(),
            field: s.field,
            signature: s.signature.clone(),
            outcome: ExecutionOutcome::Success,
        }];

        let second = evaluate(&[record], &snapshot, &log, &params());
        assert!(second.suggestions.is_empty());
        // Findings are still recorded.
        assert!(!second.findings.is_empty());
    }

    #[test]
    fn rejection_does_not_suppress() {
        let record = blocked_record();
        let snapshot = snapshot_with(&record.id, vec![resolution_event()]);
        let first = evaluate(std::slice::from_ref(&record), &snapshot, &[], &params());
        let mut s = first.suggestions[0].clone();
        s.decision = Decision::Rejected;

        // A rejected suggestion never reaches the log, so re-evaluation
        // surfaces the same suggestion as pending again.
        let second = evaluate(&[record], &snapshot, &[], &params());
        assert_eq!(second.suggestions.len(), 1);
        assert_eq!(second.suggestions[0].signature, s.signature);
        assert_eq!(second.suggestions[0].decision, Decision::Pending);
    }

    #[test]
    fn overdue_and_stale_are_alerts_not_suggestions() {
        let mut overdue = blocked_record();
        overdue.id = "overdue-task".to_string();
        overdue.status = TaskStatus::Started;
        overdue.block = None;
        overdue.next_action = Some("send signed copy".to_string());
        overdue.next_action_due = Some(day("2026-01-10"));

        let mut stale = blocked_record();
        stale.id = "stale-task".to_string();
        stale.status = TaskStatus::NotStarted;
        stale.block = None;
        // 30 days before the fixed `params().today` (2026-01-15), so the test
        // does not depend on the wall clock.
        stale.updated_at = "2025-12-16T00:00:00Z".parse().unwrap();

        let snapshot = snapshot_with("unrelated", vec![]);
        let output = evaluate(&[overdue, stale], &snapshot, &[], &params());

        assert!(output.suggestions.is_empty());
        assert_eq!(output.alerts.len(), 2);
    }

    #[test]
    fn empty_snapshot_yields_empty_output_for_fresh_records() {
        let mut record = blocked_record();
        record.updated_at = Utc::now();
        let snapshot = snapshot_with("unrelated", vec![]);
        let output = evaluate(&[record], &snapshot, &[], &params());
        assert!(output.suggestions.is_empty());
        assert!(output.findings.is_empty());
        assert!(output.alerts.is_empty());
    }

    #[test]
    fn structured_due_date_edit_yields_high_date_suggestion() {
        let mut record = blocked_record();
        record.status = TaskStatus::Started;
        record.block = None;
        record.next_action = Some("send signed copy".to_string());
        record.next_action_due = Some(day("2026-01-20"));

        // Shaped like a tracker event for an issue whose due date was edited.
        let mut ev = resolution_event();
        ev.body = "status: In Progress\ndue: 2026-02-03".to_string();
        ev.change = Some(StructuredChange {
            field: "duedate".to_string(),
            from: Some("2026-01-20".to_string()),
            to: Some("2026-02-03".to_string()),
        });

        let snapshot = snapshot_with(&record.id, vec![ev]);
        let output = evaluate(&[record], &snapshot, &[], &params());

        let s = output
            .suggestions
            .iter()
            .find(|s| s.field == TaskField::NextActionDue)
            .unwrap();
        assert_eq!(s.confidence, Confidence::High);
        assert!(s.auto_eligible());
        assert!(!s.requires_confirmation);
        assert_eq!(s.to_value, serde_json::json!("2026-02-03"));
    }

    #[test]
    fn text_inference_requires_confirmation() {
        let mut record = blocked_record();
        record.status = TaskStatus::Started;
        record.block = None;
        record.next_action = Some("send signed copy".to_string());
        record.next_action_due = Some(day("2026-01-20"));

        let mut ev = resolution_event();
        ev.change = None;
        ev.body = "timeline slipped to 2026-02-03 per vendor".to_string();

        let snapshot = snapshot_with(&record.id, vec![ev]);
        let output = evaluate(&[record], &snapshot, &[], &params());

        let s = output
            .suggestions
            .iter()
            .find(|s| s.field == TaskField::NextActionDue)
            .unwrap();
        assert_eq!(s.confidence, Confidence::Medium);
        assert!(s.requires_confirmation);
        assert_eq!(s.to_value, serde_json::json!("2026-02-03"));
    }
}
