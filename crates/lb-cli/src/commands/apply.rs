//! `lgb apply`: execute approved suggestions from the latest batch.

use anyhow::bail;
use serde::Serialize;

use lb_actions::{Executor, TrackerPush};
use lb_core::entities::Suggestion;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output;

#[derive(Serialize)]
struct ApplyReport<'a> {
    batch_id: &'a str,
    executed: usize,
    succeeded: usize,
    failed_with_fallback: usize,
    logged: usize,
    suggestions: &'a [Suggestion],
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(mut batch) = ctx.batches.load_latest()? else {
        bail!("no suggestion batch found; run `lgb run <workflow>` first");
    };

    let tracker = TrackerPush::from_config(
        lb_sources::http_client(ctx.config.general.adapter_timeout_secs),
        &ctx.config.tracker,
    );
    let executor = Executor::new(&ctx.store, &ctx.log, tracker);
    let report = executor.execute(&mut batch).await?;
    ctx.batches.update(&batch)?;

    match flags.format {
        OutputFormat::Json => output::json(&ApplyReport {
            batch_id: &batch.id,
            executed: report.executed,
            succeeded: report.succeeded,
            failed_with_fallback: report.failed_with_fallback,
            logged: report.logged,
            suggestions: &batch.suggestions,
        }),
        OutputFormat::Text => {
            if report.executed == 0 {
                println!("nothing to apply in batch {} (no approved suggestions)", batch.id);
                return Ok(());
            }
            println!(
                "applied {} suggestion(s) from batch {}: {} succeeded, {} logged",
                report.executed, batch.id, report.succeeded, report.logged
            );
            if report.failed_with_fallback > 0 {
                println!(
                    "{} external update(s) failed; do these by hand:",
                    report.failed_with_fallback
                );
                for suggestion in &batch.suggestions {
                    if let Some(fallback) = &suggestion.fallback {
                        println!("  - {fallback}");
                    }
                }
            }
            Ok(())
        }
    }
}
