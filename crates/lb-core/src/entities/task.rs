use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Category, Priority, TaskStatus};
use crate::errors::CoreError;

/// Why a task is blocked. Present iff `status == blocked`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BlockInfo {
    /// Kind of blocker (e.g. `approval`, `dependency`, `external`).
    pub block_type: Option<String>,
    /// Who or what is blocking.
    pub blocked_by: String,
    /// When resolution is expected, if known.
    pub expected: Option<NaiveDate>,
}

/// One timestamped, append-only progress note.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProgressEntry {
    pub date: NaiveDate,
    pub text: String,
}

/// One outstanding step from the task's next-steps list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NextStep {
    pub text: String,
    pub due: Option<NaiveDate>,
}

/// A local unit of work, read from the task store and mutated only by
/// approved executor actions or direct user edits. Never deleted — archival
/// moves the record to a separate store with a completion date.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskRecord {
    /// Stable unique identifier (the task file's stem).
    pub id: String,
    pub title: String,
    pub category: Category,
    pub priority: Priority,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    /// Set only while `status == started` and more than one step is pending.
    pub next_action: Option<String>,
    pub next_action_due: Option<NaiveDate>,
    /// Present iff `status == blocked`.
    pub block: Option<BlockInfo>,
    /// Ordered, append-only progress history.
    pub progress: Vec<ProgressEntry>,
    /// Outstanding steps, in file order.
    pub pending_steps: Vec<NextStep>,
    /// External references into the tracker/wiki (e.g. issue keys).
    pub refs: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl TaskRecord {
    /// Check the record's cross-field invariants.
    ///
    /// - blocking metadata is present iff `status == blocked`
    /// - next-action fields are present iff `status == started` and more than
    ///   one step is outstanding
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] naming the violated invariant.
    pub fn validate(&self) -> Result<(), CoreError> {
        match (self.status, self.block.is_some()) {
            (TaskStatus::Blocked, false) => {
                return Err(CoreError::Validation(format!(
                    "task {} is blocked but carries no blocking metadata",
                    self.id
                )));
            }
            (TaskStatus::Blocked, true) => {}
            (_, true) => {
                return Err(CoreError::Validation(format!(
                    "task {} carries blocking metadata while {}",
                    self.id, self.status
                )));
            }
            (_, false) => {}
        }

        let wants_next_action = self.status == TaskStatus::Started && self.pending_steps.len() > 1;
        if wants_next_action && self.next_action.is_none() {
            return Err(CoreError::Validation(format!(
                "task {} is started with {} pending steps but has no next action",
                self.id,
                self.pending_steps.len()
            )));
        }
        if !wants_next_action && self.next_action.is_some() && self.status != TaskStatus::Started {
            return Err(CoreError::Validation(format!(
                "task {} carries a next action while {}",
                self.id, self.status
            )));
        }

        Ok(())
    }

    /// The pending step that should become the next action: earliest due date
    /// first, undated steps last, ties broken by list order (stable).
    #[must_use]
    pub fn earliest_pending_step(&self) -> Option<&NextStep> {
        self.pending_steps
            .iter()
            .enumerate()
            .min_by_key(|(idx, step)| (step.due.unwrap_or(NaiveDate::MAX), *idx))
            .map(|(_, step)| step)
    }

    /// The pending step after the current next action, by the same ordering.
    #[must_use]
    pub fn step_after_current(&self) -> Option<&NextStep> {
        let current = self.next_action.as_deref()?;
        let mut ordered: Vec<&NextStep> = self.pending_steps.iter().collect();
        ordered.sort_by_key(|step| step.due.unwrap_or(NaiveDate::MAX));
        let pos = ordered.iter().position(|step| step.text == current)?;
        ordered
            .iter()
            .skip(pos + 1)
            .find(|step| step.text != current)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record() -> TaskRecord {
        TaskRecord {
            id: "launch-checklist".to_string(),
            title: "Launch checklist".to_string(),
            category: Category::Project,
            priority: Priority::P1,
            status: TaskStatus::Started,
            due_date: None,
            next_action: Some("draft rollout plan".to_string()),
            next_action_due: Some(NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()),
            block: None,
            progress: vec![],
            pending_steps: vec![
                NextStep {
                    text: "draft rollout plan".to_string(),
                    due: Some(NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()),
                },
                NextStep {
                    text: "review with infra".to_string(),
                    due: Some(NaiveDate::from_ymd_opt(2026, 1, 25).unwrap()),
                },
            ],
            refs: vec!["PROJ-42".to_string()],
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn valid_record_passes() {
        record().validate().unwrap();
    }

    #[test]
    fn blocked_without_metadata_fails() {
        let mut r = record();
        r.status = TaskStatus::Blocked;
        r.next_action = None;
        assert!(r.validate().is_err());
    }

    #[test]
    fn block_metadata_outside_blocked_fails() {
        let mut r = record();
        r.block = Some(BlockInfo {
            block_type: None,
            blocked_by: "security review".to_string(),
            expected: None,
        });
        assert!(r.validate().is_err());
    }

    #[test]
    fn started_with_multiple_steps_needs_next_action() {
        let mut r = record();
        r.next_action = None;
        assert!(r.validate().is_err());
        r.pending_steps.truncate(1);
        r.validate().unwrap();
    }

    #[test]
    fn earliest_step_prefers_dated_over_undated() {
        let mut r = record();
        r.pending_steps.insert(
            0,
            NextStep {
                text: "someday item".to_string(),
                due: None,
            },
        );
        assert_eq!(
            r.earliest_pending_step().unwrap().text,
            "draft rollout plan"
        );
    }

    #[test]
    fn step_after_current_skips_to_next_by_due_date() {
        let r = record();
        assert_eq!(r.step_after_current().unwrap().text, "review with infra");
    }

    #[test]
    fn serde_roundtrip() {
        let r = record();
        let json = serde_json::to_string(&r).unwrap();
        let back: TaskRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
