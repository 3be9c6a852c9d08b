//! Time windows and named period presets.
//!
//! Every pipeline run operates on one discrete, bounded [`TimeWindow`]
//! (start inclusive, end exclusive). Windows are produced from [`Period`]
//! presets anchored at "now", or given explicitly for custom runs.

use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    /// Exclusive.
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Construct a window, normalizing an inverted range to an empty one.
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if end < start {
            Self { start, end: start }
        } else {
            Self { start, end }
        }
    }

    /// Window of the given length ending at `end`.
    #[must_use]
    pub fn ending_at(end: DateTime<Utc>, length: Duration) -> Self {
        Self::new(end - length, end)
    }

    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts < self.end
    }

    /// Whether this window fully covers `other`. Used by the cache to decide
    /// if a stored snapshot can serve a narrower request.
    #[must_use]
    pub fn is_superset_of(&self, other: &Self) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start.to_rfc3339(),
            self.end.to_rfc3339()
        )
    }
}

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// Named window presets. Briefings use `last-24h`, closings `since-last-run`,
/// weekly reviews `last-7d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    // serde's kebab-case does not insert a hyphen before digits, so these two
    // need explicit renames to match `as_str` (`last-24h`, `last-7d`).
    #[serde(rename = "last-24h")]
    Last24h,
    #[serde(rename = "last-7d")]
    Last7d,
    SinceLastRun,
    Custom,
}

impl Period {
    /// Resolve the preset into a concrete window ending at `now`.
    ///
    /// `last_run_end` is the end of the newest prior run's window; when absent,
    /// `since-last-run` falls back to the last 24 hours. `Custom` has no
    /// preset length and also falls back to 24 hours — callers with explicit
    /// bounds construct the window directly instead.
    #[must_use]
    pub fn resolve(self, now: DateTime<Utc>, last_run_end: Option<DateTime<Utc>>) -> TimeWindow {
        match self {
            Self::Last24h | Self::Custom => TimeWindow::ending_at(now, Duration::hours(24)),
            Self::Last7d => TimeWindow::ending_at(now, Duration::days(7)),
            Self::SinceLastRun => match last_run_end {
                Some(since) if since < now => TimeWindow::new(since, now),
                _ => TimeWindow::ending_at(now, Duration::hours(24)),
            },
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Last24h => "last-24h",
            Self::Last7d => "last-7d",
            Self::SinceLastRun => "since-last-run",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
