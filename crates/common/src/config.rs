//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Backend the game talks to when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Cars shown per garage page
pub const GARAGE_LIMIT: u32 = 7;

/// Rows shown per winners page
pub const WINNERS_LIMIT: u32 = 10;

/// Cars created by one "generate" action
pub const GENERATE_CARS_AMOUNT: usize = 100;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the garage/engine/winners backend
    pub base_url: String,

    /// Page size of the garage view
    pub garage_limit: u32,

    /// Page size of the winners view
    pub winners_limit: u32,

    /// Number of random cars created by `generate`
    pub generate_count: usize,

    /// Per-request timeout; drive requests last as long as the race itself
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            garage_limit: GARAGE_LIMIT,
            winners_limit: WINNERS_LIMIT,
            generate_count: GENERATE_CARS_AMOUNT,
            request_timeout_secs: 60,
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults when it is missing
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            config.validate()?;
            tracing::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the client cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.garage_limit == 0 || self.winners_limit == 0 {
            return Err(Error::InvalidConfig("page limits must be at least 1".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::InvalidConfig("request_timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Default store directory (`~/.async-race`)
pub fn default_store_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".async-race")
}

/// Default config file path
pub fn default_config_path() -> PathBuf {
    default_store_path().join("config.toml")
}

/// Home directory helper
mod dirs {
    pub fn home_dir() -> Option<std::path::PathBuf> {
        std::env::var_os("HOME").map(std::path::PathBuf::from)
    }
}
