//! The closed check table.
//!
//! Each check is a pure function over `(record, findings)` dispatched by
//! [`CheckKind`]. Checks are independent and not mutually exclusive; each
//! emits at most one suggestion (from its strongest supporting finding) or
//! one alert per record.

use chrono::NaiveDate;
use serde_json::{Value, json};

use lb_core::entities::{Alert, AlertKind, Finding, Suggestion, TaskRecord};
use lb_core::enums::{CheckKind, Confidence, FindingKind, TaskField, TaskStatus};

use crate::findings::revised_date_of;
use crate::signals;

/// Engine-wide evaluation parameters.
#[derive(Debug, Clone, Copy)]
pub struct EngineParams {
    pub today: NaiveDate,
    pub stale_threshold_days: u32,
}

/// What one check produced for one record.
#[derive(Debug, Default)]
pub struct CheckOutput {
    pub suggestions: Vec<Suggestion>,
    pub alerts: Vec<Alert>,
}

/// Run one check against one record and its linked findings.
#[must_use]
pub fn run(
    check: CheckKind,
    record: &TaskRecord,
    findings: &[Finding],
    params: &EngineParams,
) -> CheckOutput {
    match check {
        CheckKind::BlockerResolved => blocker_resolved(record, findings),
        CheckKind::NewBlocker => new_blocker(record, findings),
        CheckKind::DeadlinePassed => deadline_passed(record, findings, params),
        CheckKind::ImplicitDateChange => implicit_date_change(record, findings, params),
        CheckKind::ActionCompleted => action_completed(record, findings),
        CheckKind::StaleNoActivity => stale_no_activity(record, findings, params),
    }
}

fn blocker_resolved(record: &TaskRecord, findings: &[Finding]) -> CheckOutput {
    let mut out = CheckOutput::default();
    if record.status != TaskStatus::Blocked {
        return out;
    }
    let Some(evidence) = strongest(findings, FindingKind::BlockerResolved) else {
        return out;
    };
    let blocker = record
        .block
        .as_ref()
        .map_or_else(|| "blocker".to_string(), |b| b.blocked_by.clone());
    out.suggestions.push(Suggestion::new(
        &record.id,
        CheckKind::BlockerResolved,
        TaskField::Status,
        json!(TaskStatus::Blocked.as_str()),
        json!(TaskStatus::Started.as_str()),
        evidence.confidence,
        &evidence.signature,
        format!(
            "\"{blocker}\" reported resolved ({})",
            evidence.event.source
        ),
    ));
    out
}

fn new_blocker(record: &TaskRecord, findings: &[Finding]) -> CheckOutput {
    let mut out = CheckOutput::default();
    if record.status == TaskStatus::Blocked || record.status == TaskStatus::Done {
        return out;
    }
    let Some(evidence) = strongest(findings, FindingKind::BlockerReported) else {
        return out;
    };
    let Some(blocked_by) = signals::blocker_signal(&evidence.event.text()) else {
        return out;
    };
    out.suggestions.push(Suggestion::new(
        &record.id,
        CheckKind::NewBlocker,
        TaskField::Status,
        json!(record.status.as_str()),
        json!({"status": TaskStatus::Blocked.as_str(), "blocked_by": blocked_by}),
        evidence.confidence,
        &evidence.signature,
        format!("new blocker \"{blocked_by}\" ({})", evidence.event.source),
    ));
    out
}

fn deadline_passed(record: &TaskRecord, findings: &[Finding], params: &EngineParams) -> CheckOutput {
    let mut out = CheckOutput::default();
    let overdue = record.status == TaskStatus::Started
        && record.next_action_due.is_some_and(|due| due < params.today)
        && !findings
            .iter()
            .any(|f| f.kind == FindingKind::ActionCompleted);
    if overdue {
        let due = record.next_action_due.unwrap_or(params.today);
        out.alerts.push(Alert {
            record_id: record.id.clone(),
            kind: AlertKind::Overdue,
            message: format!(
                "next action \"{}\" was due {due}",
                record.next_action.as_deref().unwrap_or("(unset)")
            ),
        });
    }
    out
}

fn implicit_date_change(
    record: &TaskRecord,
    findings: &[Finding],
    params: &EngineParams,
) -> CheckOutput {
    let mut out = CheckOutput::default();
    let Some(evidence) = strongest(findings, FindingKind::DateRevised) else {
        return out;
    };
    let Some(date) = revised_date_of(evidence, params.today) else {
        return out;
    };
    if record.next_action_due == Some(date) {
        return out;
    }
    out.suggestions.push(Suggestion::new(
        &record.id,
        CheckKind::ImplicitDateChange,
        TaskField::NextActionDue,
        record
            .next_action_due
            .map_or(Value::Null, |d| json!(d.format("%Y-%m-%d").to_string())),
        json!(date.format("%Y-%m-%d").to_string()),
        evidence.confidence,
        &evidence.signature,
        format!("date revised to {date} ({})", evidence.event.source),
    ));
    out
}

fn action_completed(record: &TaskRecord, findings: &[Finding]) -> CheckOutput {
    let mut out = CheckOutput::default();
    let Some(current) = record.next_action.as_deref() else {
        return out;
    };
    let Some(evidence) = strongest(findings, FindingKind::ActionCompleted) else {
        return out;
    };
    let next = record.step_after_current();
    out.suggestions.push(Suggestion::new(
        &record.id,
        CheckKind::ActionCompleted,
        TaskField::NextAction,
        json!(current),
        next.map_or(Value::Null, |step| json!(step.text)),
        evidence.confidence,
        &evidence.signature,
        format!(
            "\"{current}\" reported complete ({})",
            evidence.event.source
        ),
    ));
    out
}

fn stale_no_activity(
    record: &TaskRecord,
    findings: &[Finding],
    params: &EngineParams,
) -> CheckOutput {
    let mut out = CheckOutput::default();
    if record.status == TaskStatus::Done || !findings.is_empty() {
        return out;
    }
    let idle_days = (params.today - record.updated_at.date_naive()).num_days();
    if idle_days >= i64::from(params.stale_threshold_days) {
        out.alerts.push(Alert {
            record_id: record.id.clone(),
            kind: AlertKind::Stale,
            message: format!("no linked activity for {idle_days} days"),
        });
    }
    out
}

/// Strongest surfaced finding of one kind. Low confidence never surfaces.
fn strongest(findings: &[Finding], kind: FindingKind) -> Option<&Finding> {
    findings
        .iter()
        .filter(|f| f.kind == kind && f.confidence.surfaces_suggestion())
        .max_by_key(|f| confidence_rank(f.confidence))
}

const fn confidence_rank(confidence: Confidence) -> u8 {
    match confidence {
        Confidence::High => 2,
        Confidence::Medium => 1,
        Confidence::Low => 0,
    }
}
