#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{FetchError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

pub fn default_user_agent() -> String {
    format!("gh-repos/{}", env!("CARGO_PKG_VERSION"))
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Settings for the default network transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: None,
        }
    }
}

impl FetchConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| FetchError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for FetchConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_non_empty_string("user_agent", &self.user_agent)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_range("timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }
        Ok(())
    }
}
