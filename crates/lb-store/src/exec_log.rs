//! Append-only JSONL execution log.
//!
//! One line per executed suggestion under `.logbook/state/execution-log.jsonl`.
//! Uses `serde_jsonlines::append_json_lines` for atomic per-line appends. The
//! log is what makes re-runs over overlapping windows idempotent: a suggestion
//! whose `(record_id, field, signature)` already produced a successful
//! execution is never offered again.

use std::path::{Path, PathBuf};

use lb_core::entities::ExecutionLogEntry;
use lb_core::enums::TaskField;

use crate::error::StoreError;

pub struct ExecutionLog {
    path: PathBuf,
}

impl ExecutionLog {
    /// Point the log at its file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the parent directory cannot be created.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::io(parent.display().to_string(), e))?;
        }
        Ok(Self { path })
    }

    /// Append one entry. Never rewrites existing lines.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file write fails.
    pub fn append(&self, entry: &ExecutionLogEntry) -> Result<(), StoreError> {
        serde_jsonlines::append_json_lines(&self.path, [entry])
            .map_err(|e| StoreError::io(self.path.display().to_string(), e))
    }

    /// Load every entry in file order. A missing file is an empty log.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` on read failure or `StoreError::Serde` for a
    /// corrupt line.
    pub fn load(&self) -> Result<Vec<ExecutionLogEntry>, StoreError> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }
        serde_jsonlines::json_lines(&self.path)
            .map_err(|e| StoreError::io(self.path.display().to_string(), e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::io(self.path.display().to_string(), e))
    }

    /// Whether an equivalent suggestion was already executed successfully.
    ///
    /// # Errors
    ///
    /// Propagates load failures.
    pub fn is_executed(
        &self,
        record_id: &str,
        field: TaskField,
        signature: &str,
    ) -> Result<bool, StoreError> {
        Ok(self
            .load()?
            .iter()
            .any(|entry| entry.suppresses(record_id, field, signature)))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lb_core::enums::ExecutionOutcome;
    use tempfile::TempDir;

    fn entry(signature: &str, outcome: ExecutionOutcome) -> ExecutionLogEntry {
        ExecutionLogEntry {
            ts: Utc::now(),
            suggestion_id: "sug-0badcafe".to_string(),
            record_id: "vendor-contract".to_string(),
            field: TaskField::Status,
            signature: signature.to_string(),
            outcome,
        }
    }

    #[test]
    fn missing_file_is_empty_log() {
        let dir = TempDir::new().unwrap();
        let log = ExecutionLog::new(dir.path().join("state/execution-log.jsonl")).unwrap();
        assert!(log.load().unwrap().is_empty());
        assert!(!log
            .is_executed("vendor-contract", TaskField::Status, "sig")
            .unwrap());
    }

    #[test]
    fn append_then_load_preserves_order() {
        let dir = TempDir::new().unwrap();
        let log = ExecutionLog::new(dir.path().join("execution-log.jsonl")).unwrap();
        log.append(&entry("sig-1", ExecutionOutcome::Success)).unwrap();
        log.append(&entry("sig-2", ExecutionOutcome::Logged)).unwrap();

        let entries = log.load().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].signature, "sig-1");
        assert_eq!(entries[1].signature, "sig-2");
    }

    #[test]
    fn only_successful_entries_suppress() {
        let dir = TempDir::new().unwrap();
        let log = ExecutionLog::new(dir.path().join("execution-log.jsonl")).unwrap();
        log.append(&entry("sig-1", ExecutionOutcome::Success)).unwrap();
        log.append(&entry("sig-2", ExecutionOutcome::FailedWithFallback))
            .unwrap();

        assert!(log
            .is_executed("vendor-contract", TaskField::Status, "sig-1")
            .unwrap());
        assert!(!log
            .is_executed("vendor-contract", TaskField::Status, "sig-2")
            .unwrap());
        assert!(!log
            .is_executed("other-task", TaskField::Status, "sig-1")
            .unwrap());
    }
}
