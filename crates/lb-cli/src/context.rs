use std::path::PathBuf;

use anyhow::Context as _;

use lb_config::LogbookConfig;
use lb_context::SnapshotCache;
use lb_store::{BatchStore, ExecutionLog, TaskStore};

/// Shared handles for command handlers: config plus the stores rooted under
/// the project's task and state directories.
pub struct AppContext {
    pub config: LogbookConfig,
    pub store: TaskStore,
    pub batches: BatchStore,
    pub log: ExecutionLog,
    pub cache: SnapshotCache,
}

impl AppContext {
    /// Load config and open the stores relative to the current directory.
    pub fn init() -> anyhow::Result<Self> {
        let config = LogbookConfig::load_with_dotenv().context("failed to load configuration")?;

        let state_dir = PathBuf::from(&config.store.state_dir);
        let store = TaskStore::new(&config.store.tasks_dir, &config.store.archive_dir);
        let batches = BatchStore::new(state_dir.join("batches"))
            .context("failed to open batch store")?;
        let log = ExecutionLog::new(state_dir.join("execution-log.jsonl"))
            .context("failed to open execution log")?;
        let cache = SnapshotCache::new(state_dir.join("cache"), config.general.cache_ttl_minutes)
            .context("failed to open snapshot cache")?;

        Ok(Self {
            config,
            store,
            batches,
            log,
            cache,
        })
    }
}
