//! Entity linking: map source events onto task records.
//!
//! Strategies are tried in order per (record, event) pair; the first match
//! wins and names the link's provenance:
//!
//! 1. explicit external-reference match (`event.refs` ∩ `record.refs`)
//! 2. changed-path match for vcs events (a title token or ref appears in a
//!    changed path)
//! 3. case-insensitive title-token substring match (tokens of 4+ chars)
//!
//! Matching is exact-substring only. Events matching no record stay unlinked
//! in the raw snapshot.

use std::collections::BTreeMap;

use lb_core::entities::{SourceEvent, TaskRecord};

/// Which strategy produced a link. Currently informational (logged at debug).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStrategy {
    ExternalRef,
    ChangedPath,
    TitleToken,
}

/// Link every event to every record it matches.
#[must_use]
pub fn link_events(
    records: &[TaskRecord],
    events: &[SourceEvent],
) -> BTreeMap<String, Vec<SourceEvent>> {
    let mut links: BTreeMap<String, Vec<SourceEvent>> = BTreeMap::new();
    for record in records {
        let tokens = title_tokens(&record.title);
        for event in events {
            if let Some(strategy) = match_event(record, &tokens, event) {
                tracing::debug!(
                    record = %record.id,
                    event = %event.id,
                    ?strategy,
                    "linked event"
                );
                links
                    .entry(record.id.clone())
                    .or_default()
                    .push(event.clone());
            }
        }
    }
    links
}

/// First matching strategy for one (record, event) pair.
#[must_use]
pub fn match_event(
    record: &TaskRecord,
    title_tokens: &[String],
    event: &SourceEvent,
) -> Option<LinkStrategy> {
    if event
        .refs
        .iter()
        .any(|r| record.refs.iter().any(|key| key.eq_ignore_ascii_case(r)))
    {
        return Some(LinkStrategy::ExternalRef);
    }

    if !event.paths.is_empty() {
        let matched = event.paths.iter().any(|path| {
            let path = path.to_lowercase();
            title_tokens.iter().any(|token| path.contains(token.as_str()))
                || record
                    .refs
                    .iter()
                    .any(|key| path.contains(&key.to_lowercase()))
        });
        if matched {
            return Some(LinkStrategy::ChangedPath);
        }
    }

    let text = event.text().to_lowercase();
    if title_tokens.iter().any(|token| text.contains(token.as_str())) {
        return Some(LinkStrategy::TitleToken);
    }
    None
}

/// Lowercased title tokens of 4+ characters, punctuation stripped.
#[must_use]
pub fn title_tokens(title: &str) -> Vec<String> {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 4)
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lb_core::enums::{Category, Priority, SourceKind, TaskStatus};

    fn record(id: &str, title: &str, refs: &[&str]) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            title: title.to_string(),
            category: Category::Project,
            priority: Priority::P2,
            status: TaskStatus::Started,
            due_date: None,
            next_action: None,
            next_action_due: None,
            block: None,
            progress: vec![],
            pending_steps: vec![],
            refs: refs.iter().map(|s| (*s).to_string()).collect(),
            updated_at: Utc::now(),
        }
    }

    fn event(id: &str, source: SourceKind, body: &str, refs: &[&str], paths: &[&str]) -> SourceEvent {
        SourceEvent {
            id: id.to_string(),
            source,
            ts: Utc::now(),
            author: None,
            title: String::new(),
            body: body.to_string(),
            refs: refs.iter().map(|s| (*s).to_string()).collect(),
            paths: paths.iter().map(|s| (*s).to_string()).collect(),
            url: None,
            change: None,
        }
    }

    #[test]
    fn explicit_ref_beats_everything() {
        let r = record("billing", "Billing migration", &["PROJ-42"]);
        let tokens = title_tokens(&r.title);
        let e = event("e1", SourceKind::Tracker, "unrelated text", &["proj-42"], &[]);
        assert_eq!(match_event(&r, &tokens, &e), Some(LinkStrategy::ExternalRef));
    }

    #[test]
    fn vcs_path_matches_title_token() {
        let r = record("billing", "Billing migration", &[]);
        let tokens = title_tokens(&r.title);
        let e = event("e1", SourceKind::Vcs, "refactor", &[], &["src/billing/mod.rs"]);
        assert_eq!(match_event(&r, &tokens, &e), Some(LinkStrategy::ChangedPath));
    }

    #[test]
    fn title_token_substring_match_is_case_insensitive() {
        let r = record("billing", "Billing migration", &[]);
        let tokens = title_tokens(&r.title);
        let e = event(
            "e1",
            SourceKind::Chat,
            "the MIGRATION is finally unblocked",
            &[],
            &[],
        );
        assert_eq!(match_event(&r, &tokens, &e), Some(LinkStrategy::TitleToken));
    }

    #[test]
    fn short_tokens_do_not_link() {
        let r = record("ab", "Fix DB", &[]);
        let tokens = title_tokens(&r.title);
        assert!(tokens.is_empty());
        let e = event("e1", SourceKind::Chat, "db fix discussed", &[], &[]);
        assert_eq!(match_event(&r, &tokens, &e), None);
    }

    #[test]
    fn unmatched_events_stay_unlinked() {
        let records = vec![record("billing", "Billing migration", &["PROJ-42"])];
        let events = vec![
            event("e1", SourceKind::Chat, "lunch plans", &[], &[]),
            event("e2", SourceKind::Tracker, "", &["PROJ-42"], &[]),
        ];
        let links = link_events(&records, &events);
        assert_eq!(links.len(), 1);
        assert_eq!(links["billing"].len(), 1);
        assert_eq!(links["billing"][0].id, "e2");
    }

    #[test]
    fn one_event_can_link_to_many_records() {
        let records = vec![
            record("billing", "Billing migration", &["PROJ-42"]),
            record("audit", "Audit PROJ-42 rollout", &["PROJ-42"]),
        ];
        let events = vec![event("e1", SourceKind::Tracker, "", &["PROJ-42"], &[])];
        let links = link_events(&records, &events);
        assert_eq!(links.len(), 2);
    }
}
