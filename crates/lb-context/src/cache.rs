//! Snapshot cache with TTL.
//!
//! One JSON entry per period kind under the state cache directory. A cached
//! snapshot serves a request when its window covers the requested window and
//! the window's end is younger than the TTL; `put` replaces the period's
//! single entry. Anchoring freshness on the window end rather than the store
//! time means a snapshot of an already-old window never reads as fresh.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use lb_core::entities::ContextSnapshot;
use lb_core::window::{Period, TimeWindow};

use crate::error::ContextError;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    stored_at: DateTime<Utc>,
    snapshot: ContextSnapshot,
}

/// Summary of one cache entry, for `cache stats`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CacheEntryStats {
    pub period: Period,
    pub stored_at: DateTime<Utc>,
    pub window: TimeWindow,
    pub event_count: usize,
    pub expired: bool,
}

pub struct SnapshotCache {
    dir: PathBuf,
    ttl: Duration,
}

impl SnapshotCache {
    /// Open the cache directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Io`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>, ttl_minutes: u64) -> Result<Self, ContextError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| ContextError::io(dir.display().to_string(), e))?;
        Ok(Self {
            dir,
            ttl: Duration::minutes(i64::try_from(ttl_minutes).unwrap_or(i64::MAX)),
        })
    }

    /// Serve a cached snapshot if it is fresh and covers `window`.
    ///
    /// A corrupt or unreadable entry reads as a miss.
    #[must_use]
    pub fn get(&self, period: Period, window: &TimeWindow, now: DateTime<Utc>) -> Option<ContextSnapshot> {
        let path = self.entry_path(period);
        let content = fs::read_to_string(&path).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(path = %path.display(), %e, "ignoring corrupt cache entry");
                return None;
            }
        };
        if now - entry.snapshot.window.end > self.ttl {
            return None;
        }
        entry
            .snapshot
            .window
            .is_superset_of(window)
            .then_some(entry.snapshot)
    }

    /// Store a snapshot, replacing the period's previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Io`] or [`ContextError::Serde`] on failure.
    pub fn put(&self, snapshot: &ContextSnapshot, now: DateTime<Utc>) -> Result<(), ContextError> {
        let entry = CacheEntry {
            stored_at: now,
            snapshot: snapshot.clone(),
        };
        let path = self.entry_path(snapshot.period);
        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(&path, json).map_err(|e| ContextError::io(path.display().to_string(), e))
    }

    /// Per-entry summaries for every stored period.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Io`] if the cache directory cannot be read.
    pub fn stats(&self, now: DateTime<Utc>) -> Result<Vec<CacheEntryStats>, ContextError> {
        let mut stats = Vec::new();
        for period in [Period::Last24h, Period::Last7d, Period::SinceLastRun, Period::Custom] {
            let path = self.entry_path(period);
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };
            let Ok(entry) = serde_json::from_str::<CacheEntry>(&content) else {
                continue;
            };
            stats.push(CacheEntryStats {
                period,
                stored_at: entry.stored_at,
                window: entry.snapshot.window,
                event_count: entry.snapshot.event_count(),
                expired: now - entry.snapshot.window.end > self.ttl,
            });
        }
        Ok(stats)
    }

    /// Remove every cache entry. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Io`] if the cache directory cannot be read.
    pub fn clear(&self) -> Result<usize, ContextError> {
        let entries =
            fs::read_dir(&self.dir).map_err(|e| ContextError::io(self.dir.display().to_string(), e))?;
        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|e| ContextError::io(self.dir.display().to_string(), e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                fs::remove_file(&path)
                    .map_err(|e| ContextError::io(path.display().to_string(), e))?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn entry_path(&self, period: Period) -> PathBuf {
        self.dir.join(format!("{}.json", period.as_str()))
    }
}
