//! General pipeline configuration.

use lb_core::window::Period;
use serde::{Deserialize, Serialize};

/// Default snapshot cache TTL in minutes.
const fn default_cache_ttl_minutes() -> u64 {
    25
}

/// Default per-adapter fetch budget in seconds.
const fn default_adapter_timeout_secs() -> u64 {
    10
}

/// Default stale threshold: days without linked activity before a
/// not-done record is flagged.
const fn default_stale_threshold_days() -> u32 {
    7
}

const fn default_period() -> Period {
    Period::Last24h
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// How long a cached snapshot stays servable.
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u64,

    /// Per-adapter time budget. One slow source must not stall the others
    /// beyond its own budget.
    #[serde(default = "default_adapter_timeout_secs")]
    pub adapter_timeout_secs: u64,

    /// Days without linked events before the stale check fires.
    #[serde(default = "default_stale_threshold_days")]
    pub stale_threshold_days: u32,

    /// Period preset used when none is given on the command line.
    #[serde(default = "default_period")]
    pub default_period: Period,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_ttl_minutes: default_cache_ttl_minutes(),
            adapter_timeout_secs: default_adapter_timeout_secs(),
            stale_threshold_days: default_stale_threshold_days(),
            default_period: default_period(),
        }
    }
}
