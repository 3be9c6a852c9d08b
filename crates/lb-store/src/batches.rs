//! Persisted suggestion batches.
//!
//! One pretty-printed JSON file per batch under `.logbook/state/batches/`.
//! Saving a new batch supersedes every older batch that still has pending
//! suggestions; superseded batches stay on disk for history but refuse
//! execution.

use std::fs;
use std::path::PathBuf;

use tracing::warn;

use lb_core::entities::SuggestionBatch;

use crate::error::StoreError;

pub struct BatchStore {
    dir: PathBuf,
}

impl BatchStore {
    /// Open the batch directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(dir.display().to_string(), e))?;
        Ok(Self { dir })
    }

    /// Persist a new batch and supersede older batches with pending
    /// suggestions.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` or `StoreError::Serde` on write failure.
    pub fn save(&self, batch: &SuggestionBatch) -> Result<(), StoreError> {
        for mut older in self.list()? {
            if older.id != batch.id && !older.superseded && older.has_pending() {
                older.superseded = true;
                self.write(&older)?;
            }
        }
        self.write(batch)
    }

    /// Rewrite an existing batch in place (decision or outcome changes).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` or `StoreError::Serde` on write failure.
    pub fn update(&self, batch: &SuggestionBatch) -> Result<(), StoreError> {
        if !self.path_for(&batch.id).is_file() {
            return Err(StoreError::NotFound(batch.id.clone()));
        }
        self.write(batch)
    }

    /// Load one batch by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for unknown IDs.
    pub fn get(&self, id: &str) -> Result<SuggestionBatch, StoreError> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let content =
            fs::read_to_string(&path).map_err(|e| StoreError::io(path.display().to_string(), e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// The most recently created batch, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be read.
    pub fn load_latest(&self) -> Result<Option<SuggestionBatch>, StoreError> {
        Ok(self
            .list()?
            .into_iter()
            .max_by_key(|batch| batch.created_at))
    }

    /// Every batch on disk, unordered. Corrupt files are skipped with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be read.
    pub fn list(&self) -> Result<Vec<SuggestionBatch>, StoreError> {
        let entries =
            fs::read_dir(&self.dir).map_err(|e| StoreError::io(self.dir.display().to_string(), e))?;
        let mut batches = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(self.dir.display().to_string(), e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = fs::read_to_string(&path)
                .map_err(|e| StoreError::io(path.display().to_string(), e))?;
            match serde_json::from_str(&content) {
                Ok(batch) => batches.push(batch),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping corrupt batch file"),
            }
        }
        Ok(batches)
    }

    fn write(&self, batch: &SuggestionBatch) -> Result<(), StoreError> {
        let path = self.path_for(&batch.id);
        let json = serde_json::to_string_pretty(batch)?;
        fs::write(&path, json).map_err(|e| StoreError::io(path.display().to_string(), e))
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}
