//! Client configuration (`~/.config/snooze/config.toml`).

use crate::paths::SnoozePaths;
use crate::storage::AtomicTomlFile;
use serde::{Deserialize, Serialize};
use snooze_core::error::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE_URL: &str = "https://hack-or-snooze-v3.herokuapp.com";
pub const API_BASE_URL_ENV: &str = "SNOOZE_API_BASE_URL";

/// Client settings. Every field has a default, so an empty or missing file
/// is a valid configuration.
///
/// ```toml
/// api_base_url = "https://hack-or-snooze-v3.herokuapp.com"
/// log_level = "debug"
/// request_timeout_secs = 10
/// session_file = "/tmp/snooze-session.toml"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the remote story service
    pub api_base_url: String,
    /// Overrides the default session file location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Transport-level timeout for each remote call
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_file: None,
            log_level: "info".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Loads the configuration at `path`, falling back to defaults when the
    /// file is missing or empty.
    pub fn load(path: &Path) -> Result<Self> {
        let file = AtomicTomlFile::<ClientConfig>::new(path.to_path_buf());
        Ok(file.load()?.unwrap_or_default())
    }

    /// Loads `~/.config/snooze/config.toml`.
    pub fn load_default() -> Result<Self> {
        Self::load(&SnoozePaths::config_file()?)
    }

    /// Writes the configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        AtomicTomlFile::<ClientConfig>::new(path.to_path_buf()).save(self)?;
        Ok(())
    }

    /// Applies `SNOOZE_API_BASE_URL` if it is set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        let url = std::env::var(API_BASE_URL_ENV).ok();
        self.with_api_base_url_override(url)
    }

    fn with_api_base_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        self
    }

    /// The session file to use: the configured override or the default
    /// location.
    pub fn session_file_path(&self) -> Result<PathBuf> {
        match &self.session_file {
            Some(path) => Ok(path.clone()),
            None => Ok(SnoozePaths::session_file()?),
        }
    }
}
