//! Issue tracker (Jira) configuration.

use serde::{Deserialize, Serialize};

/// Default page size for tracker activity queries.
const fn default_max_results() -> u32 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackerConfig {
    /// Atlassian site domain (e.g. `acme.atlassian.net`).
    #[serde(default)]
    pub domain: String,

    /// Account email for basic auth.
    #[serde(default)]
    pub email: String,

    /// API token paired with the email.
    #[serde(default)]
    pub api_token: String,

    /// Project key to scope activity queries (e.g. `PROJ`).
    #[serde(default)]
    pub project: String,

    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            email: String::new(),
            api_token: String::new(),
            project: String::new(),
            max_results: default_max_results(),
        }
    }
}

impl TrackerConfig {
    /// Minimum fields required to query the tracker at all.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.domain.is_empty()
            && !self.email.is_empty()
            && !self.api_token.is_empty()
            && !self.project.is_empty()
    }
}
