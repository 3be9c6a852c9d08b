//! `lgb run <workflow>`: gather context, evaluate checks, persist the batch.

use chrono::Utc;
use serde::Serialize;

use lb_context::Aggregator;
use lb_core::entities::{Alert, ContextSnapshot, Suggestion, SuggestionBatch};
use lb_core::enums::SourceKind;
use lb_core::window::Period;
use lb_engine::EngineParams;

use crate::cli::root_commands::{RunArgs, SourceArg, Workflow};
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::render;
use crate::context::AppContext;
use crate::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct SourceReport {
    source: String,
    status: String,
    events: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct RunReport<'a> {
    workflow: &'a str,
    batch_id: &'a str,
    period: Period,
    window: lb_core::window::TimeWindow,
    from_cache: bool,
    sources: Vec<SourceReport>,
    suggestions: &'a [Suggestion],
    alerts: &'a [Alert],
}

pub async fn handle(args: &RunArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let now = Utc::now();
    let period = period_for(args.workflow);
    let last_run_end = ctx.batches.load_latest()?.map(|batch| batch.window.end);
    let window = period.resolve(now, last_run_end);

    let records = ctx.store.list()?;

    // A filtered fetch is never served from or written to the cache: the
    // cache's superset check assumes full-source snapshots.
    let filtered = !args.source.is_empty();
    let cached = if args.no_cache || filtered {
        None
    } else {
        ctx.cache.get(period, &window, now)
    };
    let from_cache = cached.is_some();
    let snapshot = match cached {
        Some(snapshot) => snapshot,
        None => {
            let spinner = Progress::spinner("gathering context", flags);
            let aggregator = Aggregator::from_config(&ctx.config);
            let snapshot = if filtered {
                let selected: Vec<SourceKind> =
                    args.source.iter().copied().map(source_kind).collect();
                aggregator
                    .run_selected(period, window, &records, &selected)
                    .await
            } else {
                aggregator.run(period, window, &records).await
            };
            spinner.finish();
            if !filtered {
                ctx.cache.put(&snapshot, now)?;
            }
            snapshot
        }
    };

    let executed = ctx.log.load()?;
    let params = EngineParams {
        today: now.date_naive(),
        stale_threshold_days: ctx.config.general.stale_threshold_days,
    };
    let result = lb_engine::evaluate(&records, &snapshot, &executed, &params);

    let batch = SuggestionBatch::new(period, window, result.suggestions, result.alerts);
    ctx.batches.save(&batch)?;

    let sources = source_reports(&snapshot);
    match flags.format {
        OutputFormat::Json => output::json(&RunReport {
            workflow: workflow_name(args.workflow),
            batch_id: &batch.id,
            period,
            window,
            from_cache,
            sources,
            suggestions: &batch.suggestions,
            alerts: &batch.alerts,
        }),
        OutputFormat::Text => {
            print_text(args.workflow, &batch, &sources, from_cache);
            Ok(())
        }
    }
}

const fn period_for(workflow: Workflow) -> Period {
    match workflow {
        Workflow::Briefing => Period::Last24h,
        Workflow::Closing => Period::SinceLastRun,
        Workflow::Weekly => Period::Last7d,
    }
}

const fn source_kind(source: SourceArg) -> SourceKind {
    match source {
        SourceArg::Chat => SourceKind::Chat,
        SourceArg::Tracker => SourceKind::Tracker,
        SourceArg::Wiki => SourceKind::Wiki,
        SourceArg::Vcs => SourceKind::Vcs,
    }
}

const fn workflow_name(workflow: Workflow) -> &'static str {
    match workflow {
        Workflow::Briefing => "briefing",
        Workflow::Closing => "closing",
        Workflow::Weekly => "weekly",
    }
}

fn source_reports(snapshot: &ContextSnapshot) -> Vec<SourceReport> {
    snapshot
        .sources
        .iter()
        .map(|result| SourceReport {
            source: result.source.to_string(),
            status: result.status.to_string(),
            events: result.events.len(),
            error: result.error.clone(),
        })
        .collect()
}

fn print_text(workflow: Workflow, batch: &SuggestionBatch, sources: &[SourceReport], from_cache: bool) {
    let cache_note = if from_cache { " (cached)" } else { "" };
    println!(
        "{} over {} [{} -> {}]{cache_note}",
        workflow_name(workflow),
        batch.period,
        batch.window.start.format("%Y-%m-%d %H:%M"),
        batch.window.end.format("%Y-%m-%d %H:%M"),
    );

    let summary: Vec<String> = sources
        .iter()
        .map(|s| match &s.error {
            Some(error) => format!("{} {} ({error})", s.source, s.status),
            None => format!("{} {} ({})", s.source, s.status, s.events),
        })
        .collect();
    println!("sources: {}", summary.join(", "));
    println!();

    render::print_batch(batch);
    if batch.has_pending() {
        println!();
        println!("next: lgb review [--approve-all-auto | --approve N | --reject N | --edit N=VALUE]");
    }
}
