//! File-backed `KeyValueStore`.

use super::atomic_toml::AtomicTomlFile;
use crate::paths::{PathError, SnoozePaths};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use snooze_core::error::{Result, SnoozeError};
use snooze_core::session::KeyValueStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// A `KeyValueStore` persisted as a single owner-only TOML file.
///
/// Blocking file I/O runs on the blocking thread pool.
///
/// # Example
///
/// ```ignore
/// use snooze_infrastructure::storage::TomlKeyValueStore;
///
/// let store = TomlKeyValueStore::default_location()?;
/// store.set("username", "alice").await?;
/// ```
#[derive(Clone)]
pub struct TomlKeyValueStore {
    file: Arc<AtomicTomlFile<StoreFile>>,
}

impl TomlKeyValueStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path).private()),
        }
    }

    /// Opens the store at `~/.config/snooze/session.toml`.
    pub fn default_location() -> std::result::Result<Self, PathError> {
        Ok(Self::new(SnoozePaths::session_file()?))
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    async fn run<R, F>(&self, op: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&AtomicTomlFile<StoreFile>) -> Result<R> + Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || op(file.as_ref()))
            .await
            .map_err(|e| SnoozeError::internal(format!("Failed to join storage task: {}", e)))?
    }
}

#[async_trait]
impl KeyValueStore for TomlKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.run(move |file| {
            let contents = file.load()?.unwrap_or_default();
            Ok(contents.entries.get(&key).cloned())
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.run(move |file| {
            file.update(StoreFile::default(), |contents| {
                contents.entries.insert(key, value);
            })?;
            Ok(())
        })
        .await
    }

    async fn clear(&self) -> Result<()> {
        self.run(|file| {
            file.replace(&StoreFile::default())?;
            Ok(())
        })
        .await?;
        tracing::debug!("[Storage] Cleared {}", self.path().display());
        Ok(())
    }
}
