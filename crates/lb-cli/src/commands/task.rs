//! `lgb task`: task store inspection.

use anyhow::bail;

use lb_core::entities::TaskRecord;
use lb_core::enums::TaskStatus;

use crate::cli::subcommands::TaskCommands;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output;

pub fn handle(action: &TaskCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        TaskCommands::List { status } => list(status.as_deref(), ctx, flags),
        TaskCommands::Archive { id } => archive(id, ctx, flags),
    }
}

fn archive(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let completed = chrono::Utc::now().date_naive();
    ctx.store.archive(id, completed)?;

    match flags.format {
        OutputFormat::Json => {
            output::json(&serde_json::json!({ "id": id, "completed": completed }))
        }
        OutputFormat::Text => {
            println!("archived {id} (completed {completed})");
            Ok(())
        }
    }
}

fn list(status: Option<&str>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut records = ctx.store.list()?;

    if let Some(filter) = status {
        let status = parse_status(filter)?;
        records.retain(|record| record.status == status);
    }

    match flags.format {
        OutputFormat::Json => output::json(&records),
        OutputFormat::Text => {
            print_text(&records);
            Ok(())
        }
    }
}

/// Accepts the frontmatter code (`n`, `s`, `b`, `d`, legacy `ip`) or the full
/// status name.
fn parse_status(input: &str) -> anyhow::Result<TaskStatus> {
    if let Some(status) = TaskStatus::from_code(input) {
        return Ok(status);
    }
    match input.trim().to_lowercase().as_str() {
        "not_started" | "not-started" => Ok(TaskStatus::NotStarted),
        "started" => Ok(TaskStatus::Started),
        "blocked" => Ok(TaskStatus::Blocked),
        "done" => Ok(TaskStatus::Done),
        other => bail!("unknown status {other:?}; expected one of n, s, b, d or a status name"),
    }
}

fn print_text(records: &[TaskRecord]) {
    if records.is_empty() {
        println!("no tasks");
        return;
    }
    for record in records {
        let due = record
            .due_date
            .map_or_else(String::new, |d| format!(" due {d}"));
        println!(
            "{} [{}/{}] {} - {}{due}",
            record.id,
            record.status.code(),
            record.priority,
            record.title,
            record
                .next_action
                .as_deref()
                .unwrap_or("(no next action)"),
        );
        if let Some(block) = &record.block {
            println!("    blocked by: {}", block.blocked_by);
        }
    }
}
