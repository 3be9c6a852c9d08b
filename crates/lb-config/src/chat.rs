//! Chat (Slack) configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    /// User token with `search:read` scope. Required for the search API;
    /// without it the chat source reports itself disabled.
    #[serde(default)]
    pub user_token: String,

    /// Search query author filter. The original pipeline searched the
    /// operator's own messages.
    #[serde(default)]
    pub search_from: String,
}

impl ChatConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.user_token.is_empty()
    }

    /// Author filter for the search query, defaulting to `me`.
    #[must_use]
    pub fn from_filter(&self) -> &str {
        if self.search_from.is_empty() {
            "me"
        } else {
            &self.search_from
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = ChatConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.from_filter(), "me");
    }

    #[test]
    fn explicit_from_filter_wins() {
        let config = ChatConfig {
            user_token: "xoxp-1".into(),
            search_from: "jordan".into(),
        };
        assert!(config.is_configured());
        assert_eq!(config.from_filter(), "jordan");
    }
}
