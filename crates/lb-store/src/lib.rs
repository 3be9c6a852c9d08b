//! Local state for Logbook: the markdown task store, the append-only
//! execution log, and persisted suggestion batches.
//!
//! Everything here is plain files — markdown under the tasks directory, JSONL
//! and JSON under `.logbook/state/`. No database, no locks; the CLI is the
//! only writer.

pub mod batches;
pub mod error;
pub mod exec_log;
pub mod frontmatter;
pub mod task_store;

pub use batches::BatchStore;
pub use error::StoreError;
pub use exec_log::ExecutionLog;
pub use task_store::TaskStore;
