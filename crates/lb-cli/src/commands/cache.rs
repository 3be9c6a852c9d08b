//! `lgb cache`: snapshot cache maintenance.

use chrono::Utc;
use serde::Serialize;

use crate::cli::subcommands::CacheCommands;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output;

#[derive(Serialize)]
struct ClearReport {
    removed: usize,
}

pub fn handle(action: &CacheCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        CacheCommands::Stats => stats(ctx, flags),
        CacheCommands::Clear => clear(ctx, flags),
    }
}

fn stats(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let entries = ctx.cache.stats(Utc::now())?;

    match flags.format {
        OutputFormat::Json => output::json(&entries),
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("cache is empty");
                return Ok(());
            }
            for entry in &entries {
                let freshness = if entry.expired { "expired" } else { "fresh" };
                println!(
                    "{}: {} event(s), stored {} ({freshness})",
                    entry.period,
                    entry.event_count,
                    entry.stored_at.format("%Y-%m-%d %H:%M:%S"),
                );
            }
            Ok(())
        }
    }
}

fn clear(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let removed = ctx.cache.clear()?;

    match flags.format {
        OutputFormat::Json => output::json(&ClearReport { removed }),
        OutputFormat::Text => {
            println!("removed {removed} cached snapshot(s)");
            Ok(())
        }
    }
}
