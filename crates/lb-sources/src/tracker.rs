//! Issue tracker adapter (Jira REST API).
//!
//! Queries recently-updated issues in the configured project, with the
//! changelog expanded. An issue whose resolution is set, or whose due date
//! was edited inside the window, carries a structured field change — which
//! is what lets the suggestion engine treat it as authoritative evidence
//! rather than text inference.

use chrono::{DateTime, Utc};
use tracing::warn;

use lb_config::tracker::TrackerConfig;
use lb_core::entities::{SourceEvent, SourceResult, StructuredChange};
use lb_core::enums::SourceKind;
use lb_core::window::TimeWindow;

use crate::SourceAdapter;
use crate::error::SourceError;
use crate::filter::drop_noise;
use crate::http::check_response;

pub struct TrackerAdapter {
    http: reqwest::Client,
    config: TrackerConfig,
}

#[derive(serde::Deserialize)]
struct SearchResponse {
    issues: Vec<Issue>,
}

#[derive(serde::Deserialize)]
struct Issue {
    key: String,
    fields: IssueFields,
    #[serde(default)]
    changelog: Option<Changelog>,
}

#[derive(serde::Deserialize)]
struct Changelog {
    #[serde(default)]
    histories: Vec<History>,
}

#[derive(serde::Deserialize)]
struct History {
    created: String,
    #[serde(default)]
    items: Vec<ChangeItem>,
}

#[derive(serde::Deserialize)]
struct ChangeItem {
    field: String,
    #[serde(rename = "fromString")]
    from: Option<String>,
    #[serde(rename = "toString")]
    to: Option<String>,
}

#[derive(serde::Deserialize)]
struct IssueFields {
    summary: String,
    status: Option<Named>,
    resolution: Option<Named>,
    duedate: Option<String>,
    updated: String,
    assignee: Option<DisplayNamed>,
}

#[derive(serde::Deserialize)]
struct Named {
    name: String,
}

#[derive(serde::Deserialize)]
struct DisplayNamed {
    #[serde(rename = "displayName")]
    display_name: String,
}

impl TrackerAdapter {
    #[must_use]
    pub fn new(http: reqwest::Client, config: TrackerConfig) -> Self {
        Self { http, config }
    }

    async fn search(&self, window: &TimeWindow) -> Result<Vec<SourceEvent>, SourceError> {
        let jql = format!(
            "project = {} AND updated >= \"{}\" ORDER BY updated DESC",
            self.config.project,
            window.start.format("%Y-%m-%d %H:%M")
        );
        let url = format!(
            "https://{}/rest/api/3/search?jql={}&maxResults={}&fields=key,summary,status,resolution,duedate,updated,assignee&expand=changelog",
            self.config.domain,
            urlencoding::encode(&jql),
            self.config.max_results
        );
        let resp = check_response(
            self.http
                .get(&url)
                .basic_auth(&self.config.email, Some(&self.config.api_token))
                .send()
                .await?,
        )
        .await?;

        let data: SearchResponse = resp.json().await?;
        let events = data
            .issues
            .into_iter()
            .filter_map(|issue| {
                let ts = parse_updated(&issue.fields.updated)?;
                window
                    .contains(ts)
                    .then(|| issue_event(&self.config.domain, issue, ts, window))
            })
            .collect();
        Ok(drop_noise(events))
    }
}

impl SourceAdapter for TrackerAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Tracker
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn fetch(&self, window: &TimeWindow) -> SourceResult {
        if !self.is_configured() {
            return SourceResult::disabled(SourceKind::Tracker);
        }
        match self.search(window).await {
            Ok(events) => SourceResult::success(SourceKind::Tracker, events),
            Err(e) => {
                warn!(source = "tracker", %e, "source fetch failed");
                SourceResult::failed(SourceKind::Tracker, e.to_string())
            }
        }
    }
}

fn issue_event(domain: &str, issue: Issue, ts: DateTime<Utc>, window: &TimeWindow) -> SourceEvent {
    let fields = issue.fields;
    let status = fields.status.map(|s| s.name);
    let resolution = fields.resolution.map(|r| r.name);

    let mut body_parts = Vec::new();
    if let Some(status) = &status {
        body_parts.push(format!("status: {status}"));
    }
    if let Some(resolution) = &resolution {
        body_parts.push(format!("resolution: {resolution}"));
    }
    if let Some(due) = &fields.duedate {
        body_parts.push(format!("due: {due}"));
    }

    // A set resolution is an explicit field change, not inferred text. A
    // due-date edit in the changelog inside the window is equally explicit.
    let change = resolution
        .as_ref()
        .map(|r| StructuredChange {
            field: "resolution".to_string(),
            from: None,
            to: Some(r.clone()),
        })
        .or_else(|| duedate_change(issue.changelog.as_ref(), window));

    SourceEvent {
        id: format!("jira-{}-{}", issue.key, ts.timestamp()),
        source: SourceKind::Tracker,
        ts,
        author: fields.assignee.map(|a| a.display_name),
        title: format!("{}: {}", issue.key, fields.summary),
        body: body_parts.join("\n"),
        refs: vec![issue.key.clone()],
        paths: vec![],
        url: Some(format!("https://{domain}/browse/{}", issue.key)),
        change,
    }
}

/// Newest in-window due-date edit from the issue's changelog, if any.
fn duedate_change(changelog: Option<&Changelog>, window: &TimeWindow) -> Option<StructuredChange> {
    changelog?.histories.iter().rev().find_map(|history| {
        let ts = parse_updated(&history.created)?;
        if !window.contains(ts) {
            return None;
        }
        history
            .items
            .iter()
            .find(|item| item.field == "duedate")
            .map(|item| StructuredChange {
                field: "duedate".to_string(),
                from: item.from.clone(),
                to: item.to.clone(),
            })
    })
}

/// Jira timestamps look like `2026-01-15T10:30:00.000+0000`.
fn parse_updated(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.3f%z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
