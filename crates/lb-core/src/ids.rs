//! ID prefix constants and generation helpers.
//!
//! Entity IDs are `{prefix}-{8 hex chars}`, e.g. `sug-a3f8b2c1`. Randomness
//! comes from `getrandom`; if the OS entropy source is unavailable the
//! generator falls back to a nanosecond timestamp so ID creation never fails.

use chrono::Utc;

pub const BATCH_PREFIX: &str = "bat";
pub const FINDING_PREFIX: &str = "fnd";
pub const SUGGESTION_PREFIX: &str = "sug";

/// Generate a prefixed random ID.
#[must_use]
pub fn new_id(prefix: &str) -> String {
    let mut bytes = [0u8; 4];
    if getrandom::fill(&mut bytes).is_ok() {
        format!(
            "{prefix}-{:02x}{:02x}{:02x}{:02x}",
            bytes[0], bytes[1], bytes[2], bytes[3]
        )
    } else {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        format!("{prefix}-{:08x}", (nanos as u64) & 0xffff_ffff)
    }
}
