use super::store::SessionStore;
use crate::error::{Result, SnoozeError};
use crate::remote::StoryApi;
use crate::user::Identity;
use std::sync::Arc;

/// Owns the single current identity and its lifecycle.
///
/// `SessionManager` is responsible for:
/// - Restoring the identity from persisted credentials on startup
/// - Logging in and creating accounts
/// - Persisting the credential pair before an identity becomes current
/// - Logging out
pub struct SessionManager {
    /// Remote identity service
    api: Arc<dyn StoryApi>,
    /// Persistence adapter for the credential pair
    store: SessionStore,
    /// The current identity, if any
    current: Option<Identity>,
}

impl SessionManager {
    /// Creates a logged-out `SessionManager`.
    ///
    /// # Arguments
    ///
    /// * `api` - The remote identity service
    /// * `store` - The persistence adapter for the credential pair
    pub fn new(api: Arc<dyn StoryApi>, store: SessionStore) -> Self {
        Self {
            api,
            store,
            current: None,
        }
    }

    /// Attempts to restore the identity saved by a previous run.
    ///
    /// Never fails: a missing record, an unreadable store, or a token the
    /// service rejects all yield `None`. The remote service is only
    /// contacted when a complete record exists.
    pub async fn restore(&mut self) -> Option<&Identity> {
        let record = match self.store.load().await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::debug!("[Session] No persisted session to restore");
                self.current = None;
                return None;
            }
            Err(e) => {
                tracing::warn!("[Session] Failed to read persisted session: {}", e);
                self.current = None;
                return None;
            }
        };

        match self.api.resolve_identity(&record).await {
            Ok(identity) if identity.username == record.username => {
                tracing::info!("[Session] Restored session for {}", identity.username);
                self.current = Some(identity);
                self.current.as_ref()
            }
            Ok(identity) => {
                tracing::warn!(
                    "[Session] Restored identity {} does not match persisted username {}",
                    identity.username,
                    record.username
                );
                self.current = None;
                None
            }
            Err(e) => {
                if e.is_authentication() {
                    tracing::info!("[Session] Persisted session for {} is stale", record.username);
                } else {
                    tracing::warn!("[Session] Could not restore session: {}", e);
                }
                self.current = None;
                None
            }
        }
    }

    /// Logs in and makes the resulting identity current.
    ///
    /// # Errors
    ///
    /// - `Authentication` on bad credentials
    /// - `Network` on transport failure
    /// - `Storage` if the credential pair could not be persisted
    ///
    /// On error the previous identity, if any, stays current.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<&Identity> {
        let identity = self.api.authenticate(username, password).await?;
        tracing::info!("[Session] Logged in as {}", identity.username);
        self.establish(identity).await
    }

    /// Registers a new account and makes it current.
    ///
    /// # Errors
    ///
    /// - `Validation` on rejected input (e.g. duplicate username)
    /// - `Network` on transport failure
    /// - `Storage` if the credential pair could not be persisted
    pub async fn create_account(
        &mut self,
        username: &str,
        password: &str,
        name: &str,
    ) -> Result<&Identity> {
        let identity = self.api.register(username, password, name).await?;
        tracing::info!("[Session] Created account {}", identity.username);
        self.establish(identity).await
    }

    /// Clears persisted credentials and discards the current identity.
    ///
    /// Purely local. The identity is always dropped.
    ///
    /// # Errors
    ///
    /// `Storage` when the persisted record could not be removed, so the next
    /// [`restore`](Self::restore) may still bring the identity back.
    pub async fn logout(&mut self) -> Result<()> {
        if let Some(identity) = self.current.take() {
            tracing::info!("[Session] Logged out {}", identity.username);
        }
        self.store.clear().await.inspect_err(|e| {
            tracing::warn!("[Session] Persisted session survives logout: {}", e);
        })
    }

    /// Drops the current identity without touching the persisted record.
    pub fn discard(&mut self) -> Option<Identity> {
        self.current.take()
    }

    /// Returns the current identity.
    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    /// Returns the current identity for mutation by story operations.
    pub fn current_mut(&mut self) -> Option<&mut Identity> {
        self.current.as_mut()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// Persists the credential pair, then makes `identity` current.
    async fn establish(&mut self, identity: Identity) -> Result<&Identity> {
        if identity.login_token().is_empty() {
            return Err(SnoozeError::authentication(
                "service returned an identity without a token",
            ));
        }

        self.store.save(&identity.session_record()).await?;
        Ok(&*self.current.insert(identity))
    }
}
