//! Wiki adapter (Confluence REST API).
//!
//! Lists recently-updated pages per configured space. The content listing is
//! not window-scoped server-side, so the adapter fetches the newest pages
//! (`page_limit` per space) and keeps those whose last update falls inside
//! the window. A space that fails while another succeeds yields a `partial`
//! result.

use chrono::{DateTime, Utc};
use tracing::warn;

use lb_config::wiki::WikiConfig;
use lb_core::entities::{SourceEvent, SourceResult};
use lb_core::enums::{SourceKind, SourceStatus};
use lb_core::window::TimeWindow;

use crate::SourceAdapter;
use crate::error::SourceError;
use crate::filter::drop_noise;
use crate::http::check_response;

pub struct WikiAdapter {
    http: reqwest::Client,
    config: WikiConfig,
}

#[derive(serde::Deserialize)]
struct ContentResponse {
    results: Vec<Page>,
}

#[derive(serde::Deserialize)]
struct Page {
    id: String,
    title: String,
    history: Option<History>,
    #[serde(rename = "_links")]
    links: Option<Links>,
}

#[derive(serde::Deserialize)]
struct History {
    #[serde(rename = "lastUpdated")]
    last_updated: Option<LastUpdated>,
}

#[derive(serde::Deserialize)]
struct LastUpdated {
    when: String,
    by: Option<By>,
}

#[derive(serde::Deserialize)]
struct By {
    #[serde(rename = "displayName")]
    display_name: String,
}

#[derive(serde::Deserialize)]
struct Links {
    webui: Option<String>,
}

impl WikiAdapter {
    #[must_use]
    pub fn new(http: reqwest::Client, config: WikiConfig) -> Self {
        Self { http, config }
    }

    async fn list_space(
        &self,
        space: &str,
        window: &TimeWindow,
    ) -> Result<Vec<SourceEvent>, SourceError> {
        let url = format!(
            "https://{}/wiki/rest/api/content?spaceKey={}&expand=history.lastUpdated&limit={}&orderby=history.lastUpdated.when desc",
            self.config.domain,
            urlencoding::encode(space),
            self.config.page_limit
        );
        let resp = check_response(
            self.http
                .get(&url)
                .basic_auth(&self.config.email, Some(&self.config.api_token))
                .send()
                .await?,
        )
        .await?;

        let data: ContentResponse = resp.json().await?;
        let domain = self.config.domain.clone();
        let events = data
            .results
            .into_iter()
            .filter_map(|page| page_event(&domain, space, page))
            .filter(|(ts, _)| window.contains(*ts))
            .map(|(_, event)| event)
            .collect();
        Ok(drop_noise(events))
    }
}

impl SourceAdapter for WikiAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Wiki
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn fetch(&self, window: &TimeWindow) -> SourceResult {
        if !self.is_configured() {
            return SourceResult::disabled(SourceKind::Wiki);
        }

        let mut events = Vec::new();
        let mut failures = Vec::new();
        for space in &self.config.spaces {
            match self.list_space(space, window).await {
                Ok(mut space_events) => events.append(&mut space_events),
                Err(e) => {
                    warn!(source = "wiki", space, %e, "space listing failed");
                    failures.push(format!("{space}: {e}"));
                }
            }
        }

        if failures.is_empty() {
            SourceResult::success(SourceKind::Wiki, events)
        } else if failures.len() == self.config.spaces.len() {
            SourceResult::failed(SourceKind::Wiki, failures.join("; "))
        } else {
            SourceResult {
                source: SourceKind::Wiki,
                status: SourceStatus::Partial,
                error: Some(failures.join("; ")),
                events,
            }
        }
    }
}

fn page_event(domain: &str, space: &str, page: Page) -> Option<(DateTime<Utc>, SourceEvent)> {
    let updated = page.history?.last_updated?;
    let ts = DateTime::parse_from_rfc3339(&updated.when)
        .ok()?
        .with_timezone(&Utc);
    let url = page
        .links
        .and_then(|l| l.webui)
        .map(|webui| format!("https://{domain}/wiki{webui}"));
    let event = SourceEvent {
        id: format!("wiki-{}-{}", page.id, ts.timestamp()),
        source: SourceKind::Wiki,
        ts,
        author: updated.by.map(|b| b.display_name),
        title: page.title,
        body: format!("page updated in space {space}"),
        refs: vec![],
        paths: vec![],
        url,
        change: None,
    };
    Some((ts, event))
}
