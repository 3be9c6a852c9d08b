//! `lgb review`: record human decisions on the latest batch.

use anyhow::{Context as _, bail};
use serde::Serialize;
use serde_json::Value;

use lb_actions::gate;
use lb_core::entities::{Alert, Suggestion, SuggestionBatch};
use lb_core::enums::Decision;

use crate::cli::root_commands::ReviewArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::render;
use crate::context::AppContext;
use crate::output;

#[derive(Serialize)]
struct ReviewReport<'a> {
    batch_id: &'a str,
    auto_approved: usize,
    decided: usize,
    pending: usize,
    suggestions: &'a [Suggestion],
    alerts: &'a [Alert],
}

pub fn handle(args: &ReviewArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(mut batch) = ctx.batches.load_latest()? else {
        bail!("no suggestion batch found; run `lgb run <workflow>` first");
    };

    let mut auto_approved = 0;
    let mut decided = 0;

    if args.approve_all_auto {
        auto_approved = gate::approve_all_auto(&mut batch)?;
    }
    for (position, value) in parse_edits(&args.edit)? {
        let id = suggestion_id_at(&batch, position)?;
        gate::decide(&mut batch, &id, Decision::Edited, Some(value))?;
        decided += 1;
    }
    for &position in &args.approve {
        let id = suggestion_id_at(&batch, position)?;
        gate::decide(&mut batch, &id, Decision::Approved, None)?;
        decided += 1;
    }
    for &position in &args.reject {
        let id = suggestion_id_at(&batch, position)?;
        gate::decide(&mut batch, &id, Decision::Rejected, None)?;
        decided += 1;
    }

    if auto_approved > 0 || decided > 0 {
        ctx.batches.update(&batch)?;
    }

    let pending = batch
        .suggestions
        .iter()
        .filter(|s| s.decision == Decision::Pending)
        .count();

    match flags.format {
        OutputFormat::Json => output::json(&ReviewReport {
            batch_id: &batch.id,
            auto_approved,
            decided,
            pending,
            suggestions: &batch.suggestions,
            alerts: &batch.alerts,
        }),
        OutputFormat::Text => {
            if auto_approved > 0 {
                println!("auto-approved {auto_approved} high-confidence suggestion(s)");
            }
            render::print_batch(&batch);
            if pending > 0 {
                println!();
                println!("{pending} suggestion(s) still pending");
            } else if batch.suggestions.iter().any(|s| s.decision.is_executable()) {
                println!();
                println!("next: lgb apply");
            }
            Ok(())
        }
    }
}

/// Resolve a 1-based listing position to a suggestion ID.
fn suggestion_id_at(batch: &SuggestionBatch, position: usize) -> anyhow::Result<String> {
    position
        .checked_sub(1)
        .and_then(|index| batch.suggestions.get(index))
        .map(|s| s.id.clone())
        .with_context(|| {
            format!(
                "no suggestion at position {position} (batch has {})",
                batch.suggestions.len()
            )
        })
}

/// Parse `N=value` edit arguments. Values that parse as JSON are taken as-is;
/// anything else becomes a plain string, so `--edit 2=2026-02-10` works
/// without quoting.
fn parse_edits(edits: &[String]) -> anyhow::Result<Vec<(usize, Value)>> {
    edits
        .iter()
        .map(|edit| {
            let (position, raw) = edit
                .split_once('=')
                .with_context(|| format!("invalid edit {edit:?}, expected N=VALUE"))?;
            let position: usize = position
                .trim()
                .parse()
                .with_context(|| format!("invalid edit position in {edit:?}"))?;
            let value = serde_json::from_str(raw)
                .unwrap_or_else(|_| Value::String(raw.to_string()));
            Ok((position, value))
        })
        .collect()
}
