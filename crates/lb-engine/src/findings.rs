//! Finding extraction: classify each linked event as evidence about its
//! record.
//!
//! Confidence policy is fixed here, not per-check: a machine-structured field
//! change from the tracker is high; text inference is medium; an event that
//! matches no signal at all is a low-confidence topical mention, recorded but
//! never surfaced as a suggestion.

use chrono::NaiveDate;

use lb_core::entities::{Finding, SourceEvent, TaskRecord};
use lb_core::enums::{Confidence, FindingKind, TaskStatus};
use lb_core::ids;

use crate::signals;

/// Classify every linked event for one record.
#[must_use]
pub fn extract(record: &TaskRecord, events: &[SourceEvent], today: NaiveDate) -> Vec<Finding> {
    let mut findings = Vec::new();
    for event in events {
        let before = findings.len();
        classify(record, event, today, &mut findings);
        if findings.len() == before {
            findings.push(finding(
                record,
                FindingKind::TopicalMention,
                Confidence::Low,
                event,
            ));
        }
    }
    findings
}

fn classify(
    record: &TaskRecord,
    event: &SourceEvent,
    today: NaiveDate,
    findings: &mut Vec<Finding>,
) {
    let text = event.text();

    let structured_resolution = event
        .change
        .as_ref()
        .is_some_and(|c| c.field == "resolution" && c.to.is_some());
    let structured_due = event
        .change
        .as_ref()
        .filter(|c| c.field == "duedate")
        .and_then(|c| c.to.as_deref())
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

    if record.status == TaskStatus::Blocked
        && (structured_resolution || signals::resolution_signal(&text))
    {
        let confidence = if structured_resolution {
            Confidence::High
        } else {
            Confidence::Medium
        };
        findings.push(finding(record, FindingKind::BlockerResolved, confidence, event));
    }

    if record.status != TaskStatus::Blocked && signals::blocker_signal(&text).is_some() {
        findings.push(finding(
            record,
            FindingKind::BlockerReported,
            Confidence::Medium,
            event,
        ));
    }

    if structured_due.is_some() || signals::revised_date(&text, today).is_some() {
        let confidence = if structured_due.is_some() {
            Confidence::High
        } else {
            Confidence::Medium
        };
        findings.push(finding(record, FindingKind::DateRevised, confidence, event));
    }

    if let Some(action) = &record.next_action {
        if let Some(explicit) = signals::completion_signal(&text, action) {
            let confidence = if explicit {
                Confidence::High
            } else {
                Confidence::Medium
            };
            findings.push(finding(
                record,
                FindingKind::ActionCompleted,
                confidence,
                event,
            ));
        }
    }
}

fn finding(
    record: &TaskRecord,
    kind: FindingKind,
    confidence: Confidence,
    event: &SourceEvent,
) -> Finding {
    Finding {
        id: ids::new_id(ids::FINDING_PREFIX),
        record_id: record.id.clone(),
        kind,
        confidence,
        event: event.clone(),
        signature: Finding::signature_for(&record.id, kind, event),
    }
}

/// The revised date carried by one date-revision finding, structured change
/// first.
#[must_use]
pub fn revised_date_of(finding: &Finding, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(change) = &finding.event.change {
        if change.field == "duedate" {
            if let Some(date) = change
                .to
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            {
                return Some(date);
            }
        }
    }
    signals::revised_date(&finding.event.text(), today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lb_core::entities::{BlockInfo, StructuredChange};
    use lb_core::enums::{Category, Priority, SourceKind};

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn blocked_record() -> TaskRecord {
        TaskRecord {
            id: "vendor-contract".to_string(),
            title: "Renew vendor contract".to_string(),
            category: Category::Admin,
            priority: Priority::P2,
            status: TaskStatus::Blocked,
            due_date: None,
            next_action: None,
            next_action_due: None,
            block: Some(BlockInfo {
                block_type: Some("approval".to_string()),
                blocked_by: "legal review".to_string(),
                expected: Some(day("2026-01-10")),
            }),
            progress: vec![],
            pending_steps: vec![],
            refs: vec!["PROJ-77".to_string()],
            updated_at: Utc::now(),
        }
    }

    fn event(body: &str, change: Option<StructuredChange>) -> SourceEvent {
        SourceEvent {
            id: "evt-1".to_string(),
            source: if change.is_some() {
                SourceKind::Tracker
            } else {
                SourceKind::Chat
            },
            ts: Utc::now(),
            author: None,
            title: String::new(),
            body: body.to_string(),
            refs: vec![],
            paths: vec![],
            url: None,
            change,
        }
    }

    #[test]
    fn structured_resolution_is_high_confidence() {
        let record = blocked_record();
        let ev = event(
            "resolution: Fixed",
            Some(StructuredChange {
                field: "resolution".to_string(),
                from: None,
                to: Some("Fixed".to_string()),
            }),
        );
        let findings = extract(&record, &[ev], day("2026-01-15"));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::BlockerResolved);
        assert_eq!(findings[0].confidence, Confidence::High);
        assert_eq!(
            findings[0].signature,
            "vendor-contract:blocker_resolved:tracker:evt-1"
        );
    }

    #[test]
    fn text_resolution_is_medium_confidence() {
        let record = blocked_record();
        let ev = event("legal review resolved this morning", None);
        let findings = extract(&record, &[ev], day("2026-01-15"));
        assert_eq!(findings[0].kind, FindingKind::BlockerResolved);
        assert_eq!(findings[0].confidence, Confidence::Medium);
    }

    #[test]
    fn unmatched_event_is_low_topical_mention() {
        let record = blocked_record();
        let ev = event("let's discuss the vendor contract tomorrow", None);
        let findings = extract(&record, &[ev], day("2026-01-15"));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::TopicalMention);
        assert_eq!(findings[0].confidence, Confidence::Low);
        assert!(!findings[0].confidence.surfaces_suggestion());
    }

    #[test]
    fn new_blocker_only_when_not_already_blocked() {
        let mut record = blocked_record();
        record.status = TaskStatus::Started;
        record.block = None;
        record.next_action = Some("send signed copy".to_string());

        let ev = event("now blocked by procurement sign-off", None);
        let findings = extract(&record, &[ev.clone()], day("2026-01-15"));
        assert_eq!(findings[0].kind, FindingKind::BlockerReported);

        // The same text against a blocked record is not a new-blocker signal.
        let findings = extract(&blocked_record(), &[ev], day("2026-01-15"));
        assert_ne!(findings[0].kind, FindingKind::BlockerReported);
    }

    #[test]
    fn one_event_can_produce_multiple_findings() {
        let mut record = blocked_record();
        record.status = TaskStatus::Started;
        record.block = None;
        record.next_action = Some("draft migration plan".to_string());

        let ev = event(
            "draft migration plan is done, deadline moved to 2026-02-03",
            None,
        );
        let findings = extract(&record, &[ev], day("2026-01-15"));
        let kinds: Vec<_> = findings.iter().map(|f| f.kind).collect();
        assert!(kinds.contains(&FindingKind::ActionCompleted));
        assert!(kinds.contains(&FindingKind::DateRevised));
    }

    #[test]
    fn structured_due_date_wins_over_text() {
        let record = blocked_record();
        let ev = event(
            "due moved to 2026-02-10",
            Some(StructuredChange {
                field: "duedate".to_string(),
                from: Some("2026-01-20".to_string()),
                to: Some("2026-03-01".to_string()),
            }),
        );
        let findings = extract(&record, &[ev], day("2026-01-15"));
        let revised = findings
            .iter()
            .find(|f| f.kind == FindingKind::DateRevised)
            .unwrap();
        assert_eq!(revised.confidence, Confidence::High);
        assert_eq!(
            revised_date_of(revised, day("2026-01-15")),
            Some(day("2026-03-01"))
        );
    }
}
