//! # lb-actions
//!
//! The human-gated write path: the approval gate records decisions on a
//! suggestion batch, and the executor applies approved mutations to the task
//! store (and, for due dates, the tracker) with fallback and idempotent
//! logging. Nothing in this crate writes anywhere without a recorded
//! decision.

pub mod executor;
pub mod gate;
pub mod tracker_push;

mod error;

pub use error::ActionError;
pub use executor::{ExecutionReport, Executor};
pub use tracker_push::TrackerPush;
