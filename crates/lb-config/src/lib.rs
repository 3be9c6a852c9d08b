//! # lb-config
//!
//! Layered configuration loading for Logbook using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LOGBOOK_*` prefix, `__` as separator)
//! 2. Project-level `.logbook/config.toml`
//! 3. User-level `~/.config/logbook/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LOGBOOK_TRACKER__API_TOKEN` -> `tracker.api_token`,
//! `LOGBOOK_GENERAL__CACHE_TTL_MINUTES` -> `general.cache_ttl_minutes`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use lb_config::LogbookConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = LogbookConfig::load_with_dotenv().expect("config");
//!
//! if config.tracker.is_configured() {
//!     println!("tracker project: {}", config.tracker.project);
//! }
//! ```

pub mod chat;
mod error;
mod general;
mod store;
pub mod tracker;
pub mod vcs;
pub mod wiki;

pub use chat::ChatConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use store::StoreConfig;
pub use tracker::TrackerConfig;
pub use vcs::VcsConfig;
pub use wiki::WikiConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LogbookConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub wiki: WikiConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub vcs: VcsConfig,
}

impl LogbookConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`LogbookConfig::load_with_dotenv`] if
    /// you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if extraction fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the workspace root before
    /// building the figment. This is the typical entry point for the CLI.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if extraction fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add additional
    /// providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".logbook/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("LOGBOOK_").split("__"));

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("logbook").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir
    /// looking for a `.env` file. Silently does nothing if none is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace root)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        // Fallback: try current directory
        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = LogbookConfig::default();
        assert!(!config.tracker.is_configured());
        assert!(!config.wiki.is_configured());
        assert!(!config.chat.is_configured());
        assert!(config.vcs.enabled);
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = LogbookConfig::figment();
        let config: LogbookConfig = figment.extract().expect("should extract defaults");
        assert_eq!(config.general.cache_ttl_minutes, 25);
        assert_eq!(config.store.tasks_dir, "Tasks");
    }
}
