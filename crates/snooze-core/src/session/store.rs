//! Session persistence.
//!
//! `KeyValueStore` is the storage medium contract (local storage in a
//! browser, a file on a desktop). `SessionStore` is the adapter that reads
//! and writes a [`SessionRecord`] through it.

use super::record::SessionRecord;
use crate::error::{Result, SnoozeError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";

/// A string key-value medium that survives process restarts.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: Key present
    /// - `Ok(None)`: Key absent
    /// - `Err(_)`: The medium could not be read
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes every key.
    async fn clear(&self) -> Result<()>;
}

/// A process-local `KeyValueStore`.
///
/// Nothing survives a restart; useful for ephemeral sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| SnoozeError::storage("memory store lock poisoned"))
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.entries()?.clear();
        Ok(())
    }
}

/// Saves, loads and clears the session credential pair.
#[derive(Clone)]
pub struct SessionStore {
    medium: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(medium: Arc<dyn KeyValueStore>) -> Self {
        Self { medium }
    }

    /// Loads the persisted record.
    ///
    /// A half-written record (token without username or the reverse) is
    /// reported as absent.
    pub async fn load(&self) -> Result<Option<SessionRecord>> {
        let token = self.medium.get(TOKEN_KEY).await?;
        let username = self.medium.get(USERNAME_KEY).await?;

        match (token, username) {
            (Some(token), Some(username)) if !token.is_empty() && !username.is_empty() => {
                Ok(Some(SessionRecord { token, username }))
            }
            (None, None) => Ok(None),
            (Some(token), _) if token.is_empty() => {
                tracing::debug!("[SessionStore] Persisted session was logged out");
                Ok(None)
            }
            _ => {
                tracing::warn!("[SessionStore] Ignoring incomplete session record");
                Ok(None)
            }
        }
    }

    /// Persists the record.
    ///
    /// If the second write fails the medium is cleared so no half record is
    /// left behind.
    pub async fn save(&self, record: &SessionRecord) -> Result<()> {
        self.medium.set(TOKEN_KEY, &record.token).await?;
        if let Err(e) = self.medium.set(USERNAME_KEY, &record.username).await {
            if let Err(clear_err) = self.medium.clear().await {
                tracing::warn!(
                    "[SessionStore] Failed to clear partial session record: {}",
                    clear_err
                );
            }
            return Err(e);
        }
        Ok(())
    }

    /// Removes the persisted record.
    ///
    /// If the medium cannot be cleared, the token is overwritten with an
    /// empty value so the record no longer loads.
    ///
    /// # Errors
    ///
    /// Returns the clear error only when the fallback write fails too, i.e.
    /// the record may still be restored on the next start.
    pub async fn clear(&self) -> Result<()> {
        let Err(clear_err) = self.medium.clear().await else {
            return Ok(());
        };
        tracing::warn!(
            "[SessionStore] Failed to clear session record, blanking token: {}",
            clear_err
        );
        match self.medium.set(TOKEN_KEY, "").await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!("[SessionStore] Failed to blank session token: {}", e);
                Err(clear_err)
            }
        }
    }
}
