//! Composition root.

use crate::board::StoryBoard;
use crate::logging::init_tracing;
use anyhow::{Context, Result};
use snooze_infrastructure::{ClientConfig, HttpStoryApi, TomlKeyValueStore};
use std::sync::Arc;
use std::time::Duration;

/// Everything a front end needs, wired from one configuration.
pub struct AppBootstrap {
    pub config: ClientConfig,
    pub board: Arc<StoryBoard>,
}

impl AppBootstrap {
    /// Wires the HTTP service client and the file-backed session store into
    /// a fresh, logged-out board.
    ///
    /// Nothing is contacted yet; call [`StoryBoard::start`] to restore the
    /// previous session and load stories.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let api = HttpStoryApi::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
        .context("Failed to create story service client")?;

        let session_file = config
            .session_file_path()
            .context("Failed to resolve session file location")?;
        tracing::info!("[Bootstrap] Session file: {}", session_file.display());
        tracing::info!("[Bootstrap] Story service: {}", api.base_url());

        let board = StoryBoard::new(
            Arc::new(api),
            Arc::new(TomlKeyValueStore::new(session_file)),
        );

        Ok(Self {
            config,
            board: Arc::new(board),
        })
    }

    /// Loads the user configuration, applies environment overrides,
    /// installs logging and wires the board.
    pub fn from_default_config() -> Result<Self> {
        let config = ClientConfig::load_default()
            .context("Failed to load configuration")?
            .with_env_overrides();
        init_tracing(&config.log_level)?;
        Self::from_config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_from_config_starts_logged_out() {
        let temp_dir = TempDir::new().unwrap();
        let config = ClientConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            session_file: Some(temp_dir.path().join("session.toml")),
            ..ClientConfig::default()
        };

        let app = AppBootstrap::from_config(config).unwrap();

        assert!(!app.board.is_logged_in().await);
        assert!(app.board.stories().await.is_empty());
    }

    #[test]
    fn test_from_config_rejects_bad_url() {
        let config = ClientConfig {
            api_base_url: "::not a url::".to_string(),
            ..ClientConfig::default()
        };
        let err = AppBootstrap::from_config(config).err().unwrap();
        assert!(err.to_string().contains("story service client"));
    }
}
