use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    tracing::debug!(?command, "dispatching");
    match command {
        Commands::Run(args) => commands::run::handle(&args, ctx, flags).await,
        Commands::Review(args) => commands::review::handle(&args, ctx, flags),
        Commands::Apply => commands::apply::handle(ctx, flags).await,
        Commands::Task { action } => commands::task::handle(&action, ctx, flags),
        Commands::Cache { action } => commands::cache::handle(&action, ctx, flags),
    }
}
