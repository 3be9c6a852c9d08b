//! Wiki (Confluence) configuration.

use serde::{Deserialize, Serialize};

/// Default per-space page listing limit.
const fn default_page_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WikiConfig {
    /// Atlassian site domain. Usually the same as the tracker's.
    #[serde(default)]
    pub domain: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub api_token: String,

    /// Space keys to watch.
    #[serde(default)]
    pub spaces: Vec<String>,

    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            email: String::new(),
            api_token: String::new(),
            spaces: Vec::new(),
            page_limit: default_page_limit(),
        }
    }
}

impl WikiConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.domain.is_empty()
            && !self.email.is_empty()
            && !self.api_token.is_empty()
            && !self.spaces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = WikiConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.page_limit, 20);
    }

    #[test]
    fn needs_at_least_one_space() {
        let config = WikiConfig {
            domain: "acme.atlassian.net".into(),
            email: "me@acme.dev".into(),
            api_token: "tok".into(),
            spaces: vec![],
            ..Default::default()
        };
        assert!(!config.is_configured());
    }
}
