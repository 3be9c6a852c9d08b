//! # lb-context
//!
//! Turns raw source activity into one linked [`ContextSnapshot`] per run:
//! concurrent adapter fan-out with per-source time budgets, entity linking
//! against the local task records, and a TTL'd per-period snapshot cache.
//!
//! [`ContextSnapshot`]: lb_core::entities::ContextSnapshot

pub mod aggregator;
pub mod cache;
pub mod linker;

mod error;

pub use aggregator::Aggregator;
pub use cache::{CacheEntryStats, SnapshotCache};
pub use error::ContextError;
