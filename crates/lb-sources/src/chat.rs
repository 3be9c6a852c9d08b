//! Chat adapter (Slack search API).
//!
//! Searches the operator's own messages via `search.messages`, which needs a
//! user token with the `search:read` scope. The `after:` filter is exclusive
//! of the named day, so the query uses the day before the window start and
//! the adapter filters exact timestamps afterwards.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use lb_config::chat::ChatConfig;
use lb_core::entities::{SourceEvent, SourceResult};
use lb_core::enums::SourceKind;
use lb_core::window::TimeWindow;

use crate::SourceAdapter;
use crate::error::SourceError;
use crate::filter::drop_noise;
use crate::http::check_response;

pub struct ChatAdapter {
    http: reqwest::Client,
    config: ChatConfig,
}

#[derive(serde::Deserialize)]
struct SearchResponse {
    ok: bool,
    error: Option<String>,
    messages: Option<Matches>,
}

#[derive(serde::Deserialize)]
struct Matches {
    matches: Vec<Match>,
}

#[derive(serde::Deserialize)]
struct Match {
    ts: String,
    text: String,
    username: Option<String>,
    permalink: Option<String>,
    channel: Option<Channel>,
    subtype: Option<String>,
}

#[derive(serde::Deserialize)]
struct Channel {
    name: String,
}

impl ChatAdapter {
    #[must_use]
    pub fn new(http: reqwest::Client, config: ChatConfig) -> Self {
        Self { http, config }
    }

    async fn search(&self, window: &TimeWindow) -> Result<Vec<SourceEvent>, SourceError> {
        let after = (window.start - Duration::days(1)).date_naive();
        let query = format!("from:{} after:{}", self.config.from_filter(), after);
        let url = format!(
            "https://slack.com/api/search.messages?query={}&count=100",
            urlencoding::encode(&query)
        );
        let resp = check_response(
            self.http
                .get(&url)
                .bearer_auth(&self.config.user_token)
                .send()
                .await?,
        )
        .await?;

        let data: SearchResponse = resp.json().await?;
        if !data.ok {
            return Err(SourceError::Rejected(
                data.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        let matches = data.messages.map(|m| m.matches).unwrap_or_default();
        let events = matches
            .into_iter()
            .filter(|m| m.subtype.as_deref() != Some("bot_message"))
            .filter_map(|m| {
                let ts = parse_slack_ts(&m.ts)?;
                window.contains(ts).then(|| SourceEvent {
                    id: format!("slack-{}", m.ts),
                    source: SourceKind::Chat,
                    ts,
                    author: m.username,
                    title: m
                        .channel
                        .map(|c| format!("#{}", c.name))
                        .unwrap_or_default(),
                    body: m.text,
                    refs: vec![],
                    paths: vec![],
                    url: m.permalink,
                    change: None,
                })
            })
            .collect();
        Ok(drop_noise(events))
    }
}

impl SourceAdapter for ChatAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Chat
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn fetch(&self, window: &TimeWindow) -> SourceResult {
        if !self.is_configured() {
            return SourceResult::disabled(SourceKind::Chat);
        }
        match self.search(window).await {
            Ok(events) => SourceResult::success(SourceKind::Chat, events),
            Err(e) => {
                warn!(source = "chat", %e, "source fetch failed");
                SourceResult::failed(SourceKind::Chat, e.to_string())
            }
        }
    }
}

/// Slack timestamps are `"{epoch_secs}.{suffix}"` strings.
fn parse_slack_ts(ts: &str) -> Option<DateTime<Utc>> {
    let secs: i64 = ts.split('.').next()?.parse().ok()?;
    DateTime::from_timestamp(secs, 0)
}
