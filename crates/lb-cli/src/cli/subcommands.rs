use clap::Subcommand;

/// `lgb task` subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// List task records from the store.
    List {
        /// Filter by status (code or name: n, s, b, d, started, ...).
        #[arg(long)]
        status: Option<String>,
    },
    /// Move a done task into the archive, stamping its completion date.
    Archive {
        /// The task's ID (file stem).
        id: String,
    },
}

/// `lgb cache` subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum CacheCommands {
    /// Show per-period cache entries and their freshness.
    Stats,
    /// Delete all cached snapshots.
    Clear,
}
