//! Filesystem-backed task record store.
//!
//! Each record is one markdown file under the tasks directory; the file stem
//! is the record ID. Writes go through [`TaskStore::update`], which validates
//! status transitions and keeps the cross-field invariants (blocking metadata
//! iff blocked, next action iff started with multiple steps). Archival moves
//! the file into the archive directory with a `completed` date; records are
//! never deleted.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use tracing::warn;

use lb_core::entities::{BlockInfo, ProgressEntry, TaskRecord};
use lb_core::enums::{Category, Priority, TaskField, TaskStatus};

use crate::error::StoreError;
use crate::frontmatter::{
    self, TaskDocument, append_progress, parse_document, render_document,
};

pub struct TaskStore {
    tasks_dir: PathBuf,
    archive_dir: PathBuf,
}

impl TaskStore {
    #[must_use]
    pub fn new(tasks_dir: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            tasks_dir: tasks_dir.into(),
            archive_dir: archive_dir.into(),
        }
    }

    /// Load every active task record, sorted by ID.
    ///
    /// Files that are not task documents (no frontmatter) are skipped;
    /// documents with invalid fields are skipped with a warning rather than
    /// failing the whole listing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the tasks directory cannot be read.
    pub fn list(&self) -> Result<Vec<TaskRecord>, StoreError> {
        let entries = fs::read_dir(&self.tasks_dir)
            .map_err(|e| StoreError::io(self.tasks_dir.display().to_string(), e))?;

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(self.tasks_dir.display().to_string(), e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") || !path.is_file() {
                continue;
            }
            match self.read_record(&path) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable task file");
                }
            }
        }
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    /// Load one record by ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no file exists for the ID, or
    /// [`StoreError::Parse`] when the file is not a valid task document.
    pub fn get(&self, id: &str) -> Result<TaskRecord, StoreError> {
        let path = self.task_path(id);
        if !path.is_file() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.read_record(&path)?
            .ok_or_else(|| StoreError::Parse {
                path: path.display().to_string(),
                reason: "missing frontmatter".to_string(),
            })
    }

    /// Apply one field update to a record and rewrite its file.
    ///
    /// Status updates accept either a status string (name or code) or an
    /// object carrying blocking metadata: `{"status": "blocked", "blocked_by":
    /// ..., "block_type": ..., "expected": ...}`. Entering `started` clears
    /// any blocking metadata and promotes the earliest pending step to the
    /// next action when more than one step is outstanding; entering `blocked`
    /// or `done` clears the next action.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidUpdate`] for disallowed status
    /// transitions, malformed values, or blocked updates without a blocker.
    pub fn update(&self, id: &str, field: TaskField, value: &Value) -> Result<TaskRecord, StoreError> {
        let path = self.task_path(id);
        if !path.is_file() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| StoreError::io(path.display().to_string(), e))?;
        let mut doc = parse_document(&content).ok_or_else(|| StoreError::Parse {
            path: path.display().to_string(),
            reason: "missing frontmatter".to_string(),
        })?;

        match field {
            TaskField::Status => self.apply_status(id, &mut doc, value)?,
            TaskField::NextAction => apply_next_action(id, &mut doc, value)?,
            TaskField::NextActionDue => apply_date(id, &mut doc, "next_action_due", field, value)?,
            TaskField::DueDate => apply_date(id, &mut doc, "due_date", field, value)?,
        }

        fs::write(&path, render_document(&doc))
            .map_err(|e| StoreError::io(path.display().to_string(), e))?;
        self.get(id)
    }

    /// Append one progress bullet to a record's `## Progress` section.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for unknown IDs.
    pub fn append_progress(&self, id: &str, entry: &ProgressEntry) -> Result<(), StoreError> {
        let path = self.task_path(id);
        if !path.is_file() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| StoreError::io(path.display().to_string(), e))?;
        let mut doc = parse_document(&content).ok_or_else(|| StoreError::Parse {
            path: path.display().to_string(),
            reason: "missing frontmatter".to_string(),
        })?;
        doc.body = append_progress(&doc.body, entry);
        fs::write(&path, render_document(&doc))
            .map_err(|e| StoreError::io(path.display().to_string(), e))
    }

    /// Move a record into the archive directory, stamping its completion
    /// date. Only `done` records can be archived.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidUpdate`] when the record is not done.
    pub fn archive(&self, id: &str, completed: NaiveDate) -> Result<(), StoreError> {
        let record = self.get(id)?;
        if record.status != TaskStatus::Done {
            return Err(StoreError::InvalidUpdate {
                id: id.to_string(),
                field: "status".to_string(),
                reason: format!("cannot archive a {} task", record.status),
            });
        }

        let path = self.task_path(id);
        let content = fs::read_to_string(&path)
            .map_err(|e| StoreError::io(path.display().to_string(), e))?;
        let mut doc = parse_document(&content).ok_or_else(|| StoreError::Parse {
            path: path.display().to_string(),
            reason: "missing frontmatter".to_string(),
        })?;
        doc.fields.insert(
            "completed".to_string(),
            completed.format("%Y-%m-%d").to_string(),
        );

        fs::create_dir_all(&self.archive_dir)
            .map_err(|e| StoreError::io(self.archive_dir.display().to_string(), e))?;
        let dest = self.archive_dir.join(format!("{id}.md"));
        fs::write(&dest, render_document(&doc))
            .map_err(|e| StoreError::io(dest.display().to_string(), e))?;
        fs::remove_file(&path).map_err(|e| StoreError::io(path.display().to_string(), e))
    }

    fn task_path(&self, id: &str) -> PathBuf {
        self.tasks_dir.join(format!("{id}.md"))
    }

    fn read_record(&self, path: &Path) -> Result<Option<TaskRecord>, StoreError> {
        let content =
            fs::read_to_string(path).map_err(|e| StoreError::io(path.display().to_string(), e))?;
        let Some(doc) = parse_document(&content) else {
            return Ok(None);
        };
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        let updated_at = fs::metadata(path)
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        record_from_document(&id, &doc, updated_at)
            .map(Some)
            .map_err(|reason| StoreError::Parse {
                path: path.display().to_string(),
                reason,
            })
    }

    fn apply_status(&self, id: &str, doc: &mut TaskDocument, value: &Value) -> Result<(), StoreError> {
        let (target, block) = status_from_value(value).map_err(|reason| StoreError::InvalidUpdate {
            id: id.to_string(),
            field: "status".to_string(),
            reason,
        })?;

        let current = doc
            .fields
            .get("status")
            .and_then(|s| parse_status(s))
            .unwrap_or(TaskStatus::NotStarted);
        if !current.can_transition_to(target) {
            return Err(StoreError::InvalidUpdate {
                id: id.to_string(),
                field: "status".to_string(),
                reason: format!("cannot move from {current} to {target}"),
            });
        }

        doc.fields
            .insert("status".to_string(), target.code().to_string());

        match target {
            TaskStatus::Blocked => {
                let block = block.ok_or_else(|| StoreError::InvalidUpdate {
                    id: id.to_string(),
                    field: "status".to_string(),
                    reason: "blocked status requires a blocker".to_string(),
                })?;
                doc.fields.insert("blocked_by".to_string(), block.blocked_by);
                match block.block_type {
                    Some(t) => doc.fields.insert("blocked_type".to_string(), t),
                    None => doc.fields.remove("blocked_type"),
                };
                match block.expected {
                    Some(d) => doc
                        .fields
                        .insert("blocked_expected".to_string(), d.format("%Y-%m-%d").to_string()),
                    None => doc.fields.remove("blocked_expected"),
                };
                doc.fields.remove("next_action");
                doc.fields.remove("next_action_due");
            }
            TaskStatus::Started => {
                doc.fields.remove("blocked_by");
                doc.fields.remove("blocked_type");
                doc.fields.remove("blocked_expected");
                let pending = frontmatter::parse_pending_steps(&doc.body);
                if pending.len() > 1 && !doc.fields.contains_key("next_action") {
                    let promoted = pending
                        .iter()
                        .enumerate()
                        .min_by_key(|(idx, step)| (step.due.unwrap_or(NaiveDate::MAX), *idx))
                        .map(|(_, step)| step.clone());
                    if let Some(step) = promoted {
                        doc.fields.insert("next_action".to_string(), step.text);
                        match step.due {
                            Some(d) => doc.fields.insert(
                                "next_action_due".to_string(),
                                d.format("%Y-%m-%d").to_string(),
                            ),
                            None => doc.fields.remove("next_action_due"),
                        };
                    }
                }
            }
            TaskStatus::Done | TaskStatus::NotStarted => {
                doc.fields.remove("blocked_by");
                doc.fields.remove("blocked_type");
                doc.fields.remove("blocked_expected");
                doc.fields.remove("next_action");
                doc.fields.remove("next_action_due");
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Value interpretation
// ---------------------------------------------------------------------------

/// Accept both the single-letter file codes and the full status names.
fn parse_status(s: &str) -> Option<TaskStatus> {
    TaskStatus::from_code(s).or_else(|| match s {
        "not_started" => Some(TaskStatus::NotStarted),
        "started" => Some(TaskStatus::Started),
        "blocked" => Some(TaskStatus::Blocked),
        "done" => Some(TaskStatus::Done),
        _ => None,
    })
}

fn status_from_value(value: &Value) -> Result<(TaskStatus, Option<BlockInfo>), String> {
    match value {
        Value::String(s) => {
            let status = parse_status(s).ok_or_else(|| format!("unknown status {s:?}"))?;
            Ok((status, None))
        }
        Value::Object(map) => {
            let status_str = map
                .get("status")
                .and_then(Value::as_str)
                .ok_or_else(|| "status object missing \"status\"".to_string())?;
            let status =
                parse_status(status_str).ok_or_else(|| format!("unknown status {status_str:?}"))?;
            let block = map
                .get("blocked_by")
                .and_then(Value::as_str)
                .map(|blocked_by| BlockInfo {
                    block_type: map
                        .get("block_type")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    blocked_by: blocked_by.to_string(),
                    expected: map
                        .get("expected")
                        .and_then(Value::as_str)
                        .and_then(frontmatter::parse_date),
                });
            Ok((status, block))
        }
        other => Err(format!("status value must be a string or object, got {other}")),
    }
}

fn apply_next_action(id: &str, doc: &mut TaskDocument, value: &Value) -> Result<(), StoreError> {
    match value {
        Value::String(s) if !s.is_empty() => {
            doc.fields.insert("next_action".to_string(), s.clone());
            Ok(())
        }
        Value::Null => {
            doc.fields.remove("next_action");
            doc.fields.remove("next_action_due");
            Ok(())
        }
        other => Err(StoreError::InvalidUpdate {
            id: id.to_string(),
            field: "next_action".to_string(),
            reason: format!("expected a non-empty string or null, got {other}"),
        }),
    }
}

fn apply_date(
    id: &str,
    doc: &mut TaskDocument,
    key: &str,
    field: TaskField,
    value: &Value,
) -> Result<(), StoreError> {
    match value {
        Value::String(s) => {
            let date = frontmatter::parse_date(s).ok_or_else(|| StoreError::InvalidUpdate {
                id: id.to_string(),
                field: field.as_str().to_string(),
                reason: format!("expected YYYY-MM-DD, got {s:?}"),
            })?;
            doc.fields
                .insert(key.to_string(), date.format("%Y-%m-%d").to_string());
            Ok(())
        }
        Value::Null => {
            doc.fields.remove(key);
            Ok(())
        }
        other => Err(StoreError::InvalidUpdate {
            id: id.to_string(),
            field: field.as_str().to_string(),
            reason: format!("expected a date string or null, got {other}"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Document -> record
// ---------------------------------------------------------------------------

fn record_from_document(
    id: &str,
    doc: &TaskDocument,
    updated_at: DateTime<Utc>,
) -> Result<TaskRecord, String> {
    let title = doc
        .fields
        .get("title")
        .cloned()
        .ok_or_else(|| "missing title".to_string())?;
    let status = doc
        .fields
        .get("status")
        .map(|s| parse_status(s).ok_or_else(|| format!("unknown status {s:?}")))
        .transpose()?
        .unwrap_or(TaskStatus::NotStarted);
    let priority = doc
        .fields
        .get("priority")
        .map(|p| Priority::from_code(p).ok_or_else(|| format!("unknown priority {p:?}")))
        .transpose()?
        .unwrap_or(Priority::P2);
    let category = doc
        .fields
        .get("category")
        .map_or(Category::Other, |c| Category::from_code(c));

    let refs = doc
        .fields
        .get("refs")
        .map(|r| {
            r.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let record = TaskRecord {
        id: id.to_string(),
        title,
        category,
        priority,
        status,
        due_date: doc.fields.get("due_date").and_then(|s| frontmatter::parse_date(s)),
        next_action: doc.fields.get("next_action").cloned(),
        next_action_due: doc
            .fields
            .get("next_action_due")
            .and_then(|s| frontmatter::parse_date(s)),
        block: frontmatter::block_info(&doc.fields),
        progress: frontmatter::parse_progress(&doc.body),
        pending_steps: frontmatter::parse_pending_steps(&doc.body),
        refs,
        updated_at,
    };
    Ok(record)
}
