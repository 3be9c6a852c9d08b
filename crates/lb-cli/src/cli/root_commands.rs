use clap::{Args, Subcommand, ValueEnum};

use crate::cli::subcommands::{CacheCommands, TaskCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run a workflow: gather context, evaluate checks, save a batch.
    Run(RunArgs),
    /// Review the latest suggestion batch and record decisions.
    Review(ReviewArgs),
    /// Execute approved suggestions from the latest batch.
    Apply,
    /// Task file inspection.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Snapshot cache management.
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
}

/// Named workflows, each bound to a context window.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Workflow {
    /// Morning briefing over the last 24 hours.
    Briefing,
    /// Day-closing pass over activity since the previous run.
    Closing,
    /// Weekly review over the last 7 days.
    Weekly,
}

/// Arguments for `lgb run`.
#[derive(Clone, Debug, Args)]
pub struct RunArgs {
    /// Which workflow to run.
    #[arg(value_enum)]
    pub workflow: Workflow,

    /// Bypass the snapshot cache and fetch fresh context.
    #[arg(long)]
    pub no_cache: bool,

    /// Restrict the fetch to these sources (repeatable). Implies a fresh,
    /// uncached fetch.
    #[arg(long, value_enum, value_name = "SOURCE")]
    pub source: Vec<SourceArg>,
}

/// Fetchable sources, for `--source` filtering.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SourceArg {
    Chat,
    Tracker,
    Wiki,
    Vcs,
}

/// Arguments for `lgb review`.
///
/// Suggestions are addressed by their 1-based position in the listing that
/// `run` and `review` print.
#[derive(Clone, Debug, Args)]
pub struct ReviewArgs {
    /// Approve every pending high-confidence suggestion in one action.
    #[arg(long)]
    pub approve_all_auto: bool,

    /// Approve the suggestion at this position.
    #[arg(long, value_name = "N")]
    pub approve: Vec<usize>,

    /// Reject the suggestion at this position.
    #[arg(long, value_name = "N")]
    pub reject: Vec<usize>,

    /// Approve with a corrected value, as `N=value`.
    #[arg(long, value_name = "N=VALUE")]
    pub edit: Vec<String>,
}
