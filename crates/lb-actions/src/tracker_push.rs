//! Outbound tracker mutation: due-date sync.
//!
//! The only external write the executor performs. Kept separate from the
//! read-only source adapters; a failure here never fails the run — the
//! executor converts it into a copy-pasteable fallback instruction.

use chrono::NaiveDate;
use serde_json::json;

use lb_config::tracker::TrackerConfig;

pub struct TrackerPush {
    http: reqwest::Client,
    config: TrackerConfig,
}

impl TrackerPush {
    /// Build a pusher if the tracker is configured at all.
    #[must_use]
    pub fn from_config(http: reqwest::Client, config: &TrackerConfig) -> Option<Self> {
        config.is_configured().then(|| Self {
            http,
            config: config.clone(),
        })
    }

    /// Update an issue's due date.
    ///
    /// # Errors
    ///
    /// Returns a display string for the executor's fallback path; the caller
    /// never branches on the error's structure.
    pub async fn update_due_date(&self, issue_key: &str, date: NaiveDate) -> Result<(), String> {
        let url = format!(
            "https://{}/rest/api/3/issue/{}",
            self.config.domain,
            urlencoding::encode(issue_key)
        );
        let body = json!({"fields": {"duedate": date.format("%Y-%m-%d").to_string()}});
        let resp = self
            .http
            .put(&url)
            .basic_auth(&self.config.email, Some(&self.config.api_token))
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(format!(
                "tracker returned {}: {}",
                resp.status().as_u16(),
                resp.text().await.unwrap_or_default()
            ))
        }
    }
}
