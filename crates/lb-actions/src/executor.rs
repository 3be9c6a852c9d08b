//! The executor.
//!
//! Walks a batch's approved/edited suggestions strictly in submission order.
//! Local mutations go through the task store, so each suggestion observes the
//! mutations of the ones before it. A local write failure skips that
//! suggestion only (outcome `logged`); a failed external mutation produces a
//! copy-pasteable fallback instruction (outcome `failed-with-fallback`).
//! Every executed suggestion appends exactly one execution log entry, which
//! is what makes later engine passes idempotent, and applied changes are
//! noted in the record's own progress history.

use chrono::Utc;
use tracing::warn;

use lb_core::entities::{ExecutionLogEntry, ProgressEntry, SuggestionBatch};
use lb_core::enums::{ExecutionOutcome, TaskField};
use lb_store::{ExecutionLog, TaskStore};

use crate::error::ActionError;
use crate::tracker_push::TrackerPush;

/// Per-batch execution tally.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionReport {
    pub executed: usize,
    pub succeeded: usize,
    pub failed_with_fallback: usize,
    pub logged: usize,
}

pub struct Executor<'a> {
    store: &'a TaskStore,
    log: &'a ExecutionLog,
    tracker: Option<TrackerPush>,
}

impl<'a> Executor<'a> {
    #[must_use]
    pub const fn new(store: &'a TaskStore, log: &'a ExecutionLog, tracker: Option<TrackerPush>) -> Self {
        Self { store, log, tracker }
    }

    /// Execute every approved/edited suggestion in the batch, in order.
    ///
    /// Outcomes and fallback instructions are written onto the batch's
    /// suggestions; the caller persists the batch afterwards. Already-executed
    /// suggestions (outcome set) are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::BatchSuperseded`] for superseded batches and
    /// [`ActionError::Store`] only for log-append failures — per-suggestion
    /// store failures are recorded as outcomes, never raised.
    pub async fn execute(&self, batch: &mut SuggestionBatch) -> Result<ExecutionReport, ActionError> {
        if batch.superseded {
            return Err(ActionError::BatchSuperseded(batch.id.clone()));
        }

        let mut report = ExecutionReport::default();
        for suggestion in &mut batch.suggestions {
            if !suggestion.decision.is_executable() || suggestion.outcome.is_some() {
                continue;
            }
            report.executed += 1;

            let updated = match self.store.update(
                &suggestion.record_id,
                suggestion.field,
                &suggestion.to_value,
            ) {
                Ok(record) => record,
                Err(e) => {
                    warn!(
                        record = %suggestion.record_id,
                        field = %suggestion.field,
                        %e,
                        "local mutation failed, skipping suggestion"
                    );
                    suggestion.outcome = Some(ExecutionOutcome::Logged);
                    report.logged += 1;
                    self.append_entry(suggestion)?;
                    continue;
                }
            };

            let outcome = if matches!(
                suggestion.field,
                TaskField::DueDate | TaskField::NextActionDue
            ) {
                self.sync_tracker(suggestion, &updated.refs).await
            } else {
                ExecutionOutcome::Success
            };

            match outcome {
                ExecutionOutcome::Success => report.succeeded += 1,
                ExecutionOutcome::FailedWithFallback => report.failed_with_fallback += 1,
                ExecutionOutcome::Logged => report.logged += 1,
            }
            suggestion.outcome = Some(outcome);
            self.note_progress(suggestion);
            self.append_entry(suggestion)?;
        }
        Ok(report)
    }

    /// Push a date change to the tracker's due-date field when the record
    /// references an issue. No tracker, no refs, or a non-date value: the
    /// local write alone is success.
    async fn sync_tracker(
        &self,
        suggestion: &mut lb_core::entities::Suggestion,
        refs: &[String],
    ) -> ExecutionOutcome {
        let (Some(tracker), Some(issue_key)) = (&self.tracker, refs.first()) else {
            return ExecutionOutcome::Success;
        };
        let Some(date) = suggestion
            .to_value
            .as_str()
            .and_then(|s| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        else {
            return ExecutionOutcome::Success;
        };

        match tracker.update_due_date(issue_key, date).await {
            Ok(()) => ExecutionOutcome::Success,
            Err(e) => {
                warn!(issue = %issue_key, %e, "tracker update failed, falling back");
                suggestion.fallback = Some(format!(
                    "set the due date of {issue_key} to {date} in the tracker by hand"
                ));
                ExecutionOutcome::FailedWithFallback
            }
        }
    }

    /// Record the applied change in the task's own progress history. A note
    /// failure never fails the execution.
    fn note_progress(&self, suggestion: &lb_core::entities::Suggestion) {
        let entry = ProgressEntry {
            date: Utc::now().date_naive(),
            text: suggestion.rationale.clone(),
        };
        if let Err(e) = self.store.append_progress(&suggestion.record_id, &entry) {
            warn!(record = %suggestion.record_id, %e, "could not append progress note");
        }
    }

    fn append_entry(&self, suggestion: &lb_core::entities::Suggestion) -> Result<(), ActionError> {
        let entry = ExecutionLogEntry {
            ts: Utc::now(),
            suggestion_id: suggestion.id.clone(),
            record_id: suggestion.record_id.clone(),
            field: suggestion.field,
            signature: suggestion.signature.clone(),
            outcome: suggestion.outcome.unwrap_or(ExecutionOutcome::Logged),
        };
        self.log.append(&entry)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lb_core::entities::Suggestion;
    use lb_core::enums::{CheckKind, Confidence, Decision};
    use lb_core::window::{Period, TimeWindow};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    const BLOCKED_TASK: &str = "---\ntitle: Renew vendor contract\nstatus: b\nblocked_by: legal review\nrefs: PROJ-77\n---\n\n## Next Steps\n- [ ] send signed copy (due 2026-02-05)\n- [ ] file in records\n";

    fn workspace() -> (TempDir, TaskStore, ExecutionLog) {
        let dir = TempDir::new().unwrap();
        let tasks = dir.path().join("Tasks");
        fs::create_dir_all(&tasks).unwrap();
        fs::write(tasks.join("vendor-contract.md"), BLOCKED_TASK).unwrap();
        let store = TaskStore::new(&tasks, dir.path().join("Tasks/archive"));
        let log = ExecutionLog::new(dir.path().join("state/execution-log.jsonl")).unwrap();
        (dir, store, log)
    }

    fn unblock_suggestion(decision: Decision) -> Suggestion {
        let mut s = Suggestion::new(
            "vendor-contract",
            CheckKind::BlockerResolved,
            lb_core::enums::TaskField::Status,
            json!("blocked"),
            json!("started"),
            Confidence::High,
            "vendor-contract:blocker_resolved:tracker:evt-1",
            "legal review resolved",
        );
        s.decision = decision;
        s
    }

    fn batch_of(suggestions: Vec<Suggestion>) -> SuggestionBatch {
        SuggestionBatch::new(
            Period::Last24h,
            TimeWindow::ending_at(Utc::now(), Duration::hours(24)),
            suggestions,
            vec![],
        )
    }

    #[tokio::test]
    async fn approved_status_change_executes_and_logs() {
        let (_dir, store, log) = workspace();
        let executor = Executor::new(&store, &log, None);
        let mut batch = batch_of(vec![unblock_suggestion(Decision::Approved)]);

        let report = executor.execute(&mut batch).await.unwrap();
        assert_eq!(report.executed, 1);
        assert_eq!(report.succeeded, 1);
        assert_eq!(
            batch.suggestions[0].outcome,
            Some(ExecutionOutcome::Success)
        );

        // Blocking fields cleared, next action promoted.
        let record = store.get("vendor-contract").unwrap();
        assert_eq!(record.status, lb_core::enums::TaskStatus::Started);
        assert!(record.block.is_none());
        assert_eq!(record.next_action.as_deref(), Some("send signed copy"));

        // The applied change lands in the task's progress history.
        assert_eq!(
            record.progress.last().unwrap().text,
            "legal review resolved"
        );

        // One log entry, keyed for idempotency.
        let entries = log.load().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(log
            .is_executed(
                "vendor-contract",
                lb_core::enums::TaskField::Status,
                "vendor-contract:blocker_resolved:tracker:evt-1"
            )
            .unwrap());
    }

    #[tokio::test]
    async fn pending_and_rejected_are_skipped() {
        let (_dir, store, log) = workspace();
        let executor = Executor::new(&store, &log, None);
        let mut batch = batch_of(vec![
            unblock_suggestion(Decision::Pending),
            unblock_suggestion(Decision::Rejected),
        ]);

        let report = executor.execute(&mut batch).await.unwrap();
        assert_eq!(report.executed, 0);
        assert!(log.load().unwrap().is_empty());
        assert_eq!(
            store.get("vendor-contract").unwrap().status,
            lb_core::enums::TaskStatus::Blocked
        );
    }

    #[tokio::test]
    async fn local_failure_skips_that_suggestion_only() {
        let (_dir, store, log) = workspace();
        let executor = Executor::new(&store, &log, None);

        let mut bad = unblock_suggestion(Decision::Approved);
        bad.record_id = "missing-task".to_string();
        let mut batch = batch_of(vec![bad, unblock_suggestion(Decision::Approved)]);

        let report = executor.execute(&mut batch).await.unwrap();
        assert_eq!(report.executed, 2);
        assert_eq!(report.logged, 1);
        assert_eq!(report.succeeded, 1);
        assert_eq!(batch.suggestions[0].outcome, Some(ExecutionOutcome::Logged));
        assert_eq!(
            batch.suggestions[1].outcome,
            Some(ExecutionOutcome::Success)
        );
    }

    #[tokio::test]
    async fn later_suggestions_observe_earlier_mutations() {
        let (_dir, store, log) = workspace();
        let executor = Executor::new(&store, &log, None);

        // First unblock, then mark the promoted action complete.
        let mut advance = Suggestion::new(
            "vendor-contract",
            CheckKind::ActionCompleted,
            lb_core::enums::TaskField::NextAction,
            json!("send signed copy"),
            json!("file in records"),
            Confidence::High,
            "vendor-contract:action_completed:chat:evt-2",
            "signed copy sent",
        );
        advance.decision = Decision::Approved;

        let mut batch = batch_of(vec![unblock_suggestion(Decision::Approved), advance]);
        let report = executor.execute(&mut batch).await.unwrap();
        assert_eq!(report.succeeded, 2);

        let record = store.get("vendor-contract").unwrap();
        assert_eq!(record.next_action.as_deref(), Some("file in records"));
    }

    const STARTED_TASK: &str = "---\ntitle: Billing migration\nstatus: s\nnext_action: confirm cutover window\nnext_action_due: 2026-01-20\nrefs: PROJ-42\n---\n";

    fn date_suggestion() -> Suggestion {
        let mut s = Suggestion::new(
            "billing-migration",
            CheckKind::ImplicitDateChange,
            lb_core::enums::TaskField::NextActionDue,
            json!("2026-01-20"),
            json!("2026-02-03"),
            Confidence::High,
            "billing-migration:date_revised:tracker:evt-3",
            "due date moved to 2026-02-03",
        );
        s.decision = Decision::Approved;
        s
    }

    fn unreachable_tracker() -> TrackerPush {
        let config = lb_config::TrackerConfig {
            domain: "127.0.0.1:1".to_string(),
            email: "dev@example.com".to_string(),
            api_token: "token".to_string(),
            project: "PROJ".to_string(),
            ..Default::default()
        };
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .unwrap();
        TrackerPush::from_config(http, &config).unwrap()
    }

    #[tokio::test]
    async fn failed_tracker_push_records_fallback() {
        let (dir, store, log) = workspace();
        fs::write(dir.path().join("Tasks/billing-migration.md"), STARTED_TASK).unwrap();

        let executor = Executor::new(&store, &log, Some(unreachable_tracker()));
        let mut batch = batch_of(vec![date_suggestion()]);
        let report = executor.execute(&mut batch).await.unwrap();

        assert_eq!(report.executed, 1);
        assert_eq!(report.failed_with_fallback, 1);
        let s = &batch.suggestions[0];
        assert_eq!(s.outcome, Some(ExecutionOutcome::FailedWithFallback));
        let fallback = s.fallback.as_deref().unwrap();
        assert!(fallback.contains("PROJ-42"));
        assert!(fallback.contains("2026-02-03"));

        // The local write landed and the execution was logged.
        let record = store.get("billing-migration").unwrap();
        assert_eq!(
            record.next_action_due,
            Some(chrono::NaiveDate::from_ymd_opt(2026, 2, 3).unwrap())
        );
        assert_eq!(log.load().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn date_change_without_tracker_is_local_success() {
        let (dir, store, log) = workspace();
        fs::write(dir.path().join("Tasks/billing-migration.md"), STARTED_TASK).unwrap();

        let executor = Executor::new(&store, &log, None);
        let mut batch = batch_of(vec![date_suggestion()]);
        let report = executor.execute(&mut batch).await.unwrap();

        assert_eq!(report.succeeded, 1);
        assert_eq!(batch.suggestions[0].outcome, Some(ExecutionOutcome::Success));
        assert!(batch.suggestions[0].fallback.is_none());
    }

    #[tokio::test]
    async fn superseded_batch_refuses_execution() {
        let (_dir, store, log) = workspace();
        let executor = Executor::new(&store, &log, None);
        let mut batch = batch_of(vec![unblock_suggestion(Decision::Approved)]);
        batch.superseded = true;
        assert!(matches!(
            executor.execute(&mut batch).await,
            Err(ActionError::BatchSuperseded(_))
        ));
    }

    #[tokio::test]
    async fn re_execution_skips_settled_outcomes() {
        let (_dir, store, log) = workspace();
        let executor = Executor::new(&store, &log, None);
        let mut batch = batch_of(vec![unblock_suggestion(Decision::Approved)]);
        executor.execute(&mut batch).await.unwrap();
        let report = executor.execute(&mut batch).await.unwrap();
        assert_eq!(report.executed, 0);
        assert_eq!(log.load().unwrap().len(), 1);
    }
}
