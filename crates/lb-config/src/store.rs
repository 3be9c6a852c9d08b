//! Local task store paths.

use serde::{Deserialize, Serialize};

fn default_tasks_dir() -> String {
    "Tasks".to_string()
}

fn default_archive_dir() -> String {
    "Tasks/archive".to_string()
}

fn default_state_dir() -> String {
    ".logbook/state".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Directory of markdown task files.
    #[serde(default = "default_tasks_dir")]
    pub tasks_dir: String,

    /// Where archived (done) tasks are moved. Records are never deleted.
    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,

    /// Pipeline-owned state: snapshot cache, suggestion batches, execution log.
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            tasks_dir: default_tasks_dir(),
            archive_dir: default_archive_dir(),
            state_dir: default_state_dir(),
        }
    }
}
