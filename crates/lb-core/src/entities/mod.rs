//! Entity structs for all Logbook domain objects.
//!
//! Every pipeline stage consumes the previous stage's entity and produces a
//! complete, independently serializable one, so any stage can be replayed from
//! a saved output. All structs derive `Serialize`, `Deserialize`, and
//! `JsonSchema` for JSON roundtrip and schema generation.

mod batch;
mod event;
mod exec_log;
mod finding;
mod snapshot;
mod suggestion;
mod task;

pub use batch::SuggestionBatch;
pub use event::{SourceEvent, SourceResult, StructuredChange};
pub use exec_log::ExecutionLogEntry;
pub use finding::{Alert, AlertKind, Finding};
pub use snapshot::ContextSnapshot;
pub use suggestion::Suggestion;
pub use task::{BlockInfo, NextStep, ProgressEntry, TaskRecord};
