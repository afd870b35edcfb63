//! Remote collaborator contract.
//!
//! Defines the interface of the story/identity service, decoupling the
//! client's state management from the wire protocol.

use crate::error::Result;
use crate::session::SessionRecord;
use crate::story::{NewStory, Story};
use crate::user::Identity;
use async_trait::async_trait;

/// An abstract client for the remote story and identity service.
///
/// Authenticated operations take the persisted [`SessionRecord`] (token plus
/// username) as their credential.
///
/// # Implementation Notes
///
/// Implementations map their failures into the shared taxonomy:
/// - bad credentials or rejected tokens → `SnoozeError::Authentication`
/// - rejected input → `SnoozeError::Validation`
/// - unknown story ids → `SnoozeError::NotFound`
/// - non-owner deletion → `SnoozeError::Permission`
/// - transport failures → `SnoozeError::Network`
#[async_trait]
pub trait StoryApi: Send + Sync {
    /// Logs in with a username and password.
    ///
    /// # Returns
    ///
    /// - `Ok(Identity)`: Fully populated identity, favorites and own stories included
    /// - `Err(_)`: `Authentication` on bad credentials, `Network` on transport failure
    async fn authenticate(&self, username: &str, password: &str) -> Result<Identity>;

    /// Creates a new account and logs it in.
    ///
    /// # Returns
    ///
    /// - `Ok(Identity)`: The new, empty identity
    /// - `Err(_)`: `Validation` (e.g. duplicate username) or `Network`
    async fn register(&self, username: &str, password: &str, name: &str) -> Result<Identity>;

    /// Resolves a persisted credential pair back into an identity.
    ///
    /// # Returns
    ///
    /// - `Ok(Identity)`: Token still valid
    /// - `Err(_)`: `Authentication` when the token is invalid or expired
    async fn resolve_identity(&self, record: &SessionRecord) -> Result<Identity>;

    /// Fetches every story, newest first.
    async fn list_stories(&self) -> Result<Vec<Story>>;

    /// Submits a story on behalf of `record.username`.
    ///
    /// # Returns
    ///
    /// - `Ok(Story)`: The canonical story with its assigned `story_id`
    /// - `Err(_)`: `Validation` or `Network`
    async fn create_story(&self, record: &SessionRecord, story: &NewStory) -> Result<Story>;

    /// Deletes a story owned by `record.username`.
    async fn delete_story(&self, record: &SessionRecord, story_id: &str) -> Result<()>;

    /// Marks a story as a favorite of `record.username`.
    async fn add_favorite(&self, record: &SessionRecord, story_id: &str) -> Result<()>;

    /// Unmarks a favorite of `record.username`.
    async fn remove_favorite(&self, record: &SessionRecord, story_id: &str) -> Result<()>;
}
