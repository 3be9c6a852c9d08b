//! Version control (local git) configuration.

use serde::{Deserialize, Serialize};

const fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VcsConfig {
    /// Repository path. Empty means "discover from the project root".
    #[serde(default)]
    pub repo_path: String,

    /// The vcs source is on by default; it reads only the local repository.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self {
            repo_path: String::new(),
            enabled: default_enabled(),
        }
    }
}
