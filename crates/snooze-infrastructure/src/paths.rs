//! Unified path management for snooze files.
//!
//! ```text
//! ~/.config/snooze/            # Config directory (platform specific)
//! ├── config.toml              # Client configuration
//! └── session.toml             # Persisted session record (mode 600 on Unix)
//! ```

use std::path::PathBuf;
use thiserror::Error;

const APP_DIR_NAME: &str = "snooze";
const CONFIG_FILE_NAME: &str = "config.toml";
const SESSION_FILE_NAME: &str = "session.toml";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Config directory could not be determined.
    #[error("Cannot find config directory")]
    ConfigDirNotFound,
}

impl From<PathError> for snooze_core::SnoozeError {
    fn from(err: PathError) -> Self {
        snooze_core::SnoozeError::config(err.to_string())
    }
}

/// Path resolution for snooze.
///
/// Uses the platform config directory (`$XDG_CONFIG_HOME` on Linux,
/// `~/Library/Application Support` on macOS, `%APPDATA%` on Windows).
pub struct SnoozePaths;

impl SnoozePaths {
    /// Returns the snooze configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/snooze/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Returns the default path of the persisted session record.
    pub fn session_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(SESSION_FILE_NAME))
    }
}
