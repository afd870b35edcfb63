//! The session context object.
//!
//! `StoryBoard` owns the current identity and the story collection for the
//! lifetime of the client and is the single entry point for every
//! user-triggered operation.

use snooze_core::error::{Result, SnoozeError};
use snooze_core::remote::StoryApi;
use snooze_core::session::{KeyValueStore, SessionManager, SessionStore};
use snooze_core::story::{NewStory, Story, StoryCollection, StoryListService};
use snooze_core::user::{Identity, UserStoryService};
use std::sync::Arc;
use tokio::sync::Mutex;

struct BoardState {
    session: SessionManager,
    stories: StoryCollection,
}

impl BoardState {
    /// Splits the state into the logged-in identity and the collection.
    fn identity_and_stories(
        &mut self,
        action: &str,
    ) -> Result<(&mut Identity, &mut StoryCollection)> {
        let identity = self
            .session
            .current_mut()
            .ok_or_else(|| SnoozeError::permission(format!("log in to {action}")))?;
        Ok((identity, &mut self.stories))
    }
}

/// Holds the current identity and story collection.
///
/// Every operation locks the whole board for its full duration, remote call
/// included, so overlapping operations run one after another and each sees
/// the state left by the previous one.
///
/// # Example
///
/// ```ignore
/// let board = StoryBoard::new(api, medium);
/// board.start().await?;
/// board.login("alice", "pw1").await?;
/// let story = board.submit_story(NewStory::new("Alice", "Rust", "https://rust-lang.org")).await?;
/// board.add_favorite(&story.story_id).await?;
/// ```
pub struct StoryBoard {
    state: Mutex<BoardState>,
    story_service: StoryListService,
    user_story_service: UserStoryService,
}

impl StoryBoard {
    /// Creates a logged-out board with an empty collection.
    ///
    /// # Arguments
    ///
    /// * `api` - The remote story and identity service
    /// * `medium` - Where the session record is persisted
    pub fn new(api: Arc<dyn StoryApi>, medium: Arc<dyn KeyValueStore>) -> Self {
        let session = SessionManager::new(api.clone(), SessionStore::new(medium));
        Self {
            state: Mutex::new(BoardState {
                session,
                stories: StoryCollection::new(),
            }),
            story_service: StoryListService::new(api.clone()),
            user_story_service: UserStoryService::new(api),
        }
    }

    /// Restores the persisted identity, then loads the collection.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(identity))`: A previous session was restored
    /// - `Ok(None)`: Nothing to restore, or the persisted token was rejected
    /// - `Err(_)`: The collection could not be loaded; the board stays
    ///   logged out and the persisted record is kept, so calling `start`
    ///   again retries the restore
    pub async fn start(&self) -> Result<Option<Identity>> {
        let mut state = self.state.lock().await;
        let restored = state.session.restore().await.cloned();

        if let Err(e) = self.story_service.load_all(&mut state.stories).await {
            tracing::warn!("[Board] Initial story load failed: {}", e);
            if state.session.discard().is_some() {
                tracing::info!("[Board] Restored identity held back until stories load");
            }
            return Err(e);
        }
        Ok(restored)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Identity> {
        let mut state = self.state.lock().await;
        let identity = state.session.login(username, password).await?;
        Ok(identity.clone())
    }

    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
        name: &str,
    ) -> Result<Identity> {
        let mut state = self.state.lock().await;
        let identity = state.session.create_account(username, password, name).await?;
        Ok(identity.clone())
    }

    /// Logs out. The identity is dropped even when an error is returned;
    /// see [`SessionManager::logout`].
    pub async fn logout(&self) -> Result<()> {
        self.state.lock().await.session.logout().await
    }

    /// Replaces the collection with the service's full story list.
    ///
    /// On failure the previous collection is kept.
    pub async fn load_stories(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.story_service.load_all(&mut state.stories).await
    }

    /// Reloads the collection and drops favorites and own stories that no
    /// longer exist in it.
    ///
    /// Returns how many stale entries were dropped.
    pub async fn refresh(&self) -> Result<usize> {
        let mut state = self.state.lock().await;
        let BoardState { session, stories } = &mut *state;

        self.story_service.load_all(stories).await?;

        let pruned = match session.current_mut() {
            Some(identity) => self.user_story_service.prune_missing(identity, stories),
            None => 0,
        };
        Ok(pruned)
    }

    /// Submits a story as the current identity.
    ///
    /// # Errors
    ///
    /// `Permission` when logged out, otherwise as
    /// [`StoryListService::submit`].
    pub async fn submit_story(&self, new_story: NewStory) -> Result<Story> {
        let mut state = self.state.lock().await;
        let BoardState { session, stories } = &mut *state;
        self.story_service
            .submit(session.current_mut(), stories, new_story)
            .await
    }

    pub async fn add_favorite(&self, story_id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        let (identity, stories) = state.identity_and_stories("manage favorites")?;
        self.user_story_service
            .add_favorite(identity, stories, story_id)
            .await
    }

    pub async fn remove_favorite(&self, story_id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        let (identity, _) = state.identity_and_stories("manage favorites")?;
        self.user_story_service
            .remove_favorite(identity, story_id)
            .await
    }

    /// Drives a story to the requested favorite state.
    pub async fn set_favorite(&self, story_id: &str, favorite: bool) -> Result<()> {
        if favorite {
            self.add_favorite(story_id).await
        } else {
            self.remove_favorite(story_id).await
        }
    }

    pub async fn delete_own_story(&self, story_id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        let (identity, stories) = state.identity_and_stories("delete stories")?;
        self.user_story_service
            .delete_own_story(identity, stories, story_id)
            .await
    }

    // ============================================================================
    // Views
    // ============================================================================

    /// The collection, newest first.
    pub async fn stories(&self) -> Vec<Story> {
        self.state.lock().await.stories.to_vec()
    }

    /// The current identity's favorites that are in the collection; empty
    /// when logged out.
    pub async fn favorites(&self) -> Vec<Story> {
        let state = self.state.lock().await;
        state
            .session
            .current()
            .map(|identity| in_collection(identity.favorites(), &state.stories))
            .unwrap_or_default()
    }

    /// The current identity's own stories that are in the collection; empty
    /// when logged out.
    pub async fn own_stories(&self) -> Vec<Story> {
        let state = self.state.lock().await;
        state
            .session
            .current()
            .map(|identity| in_collection(identity.own_stories(), &state.stories))
            .unwrap_or_default()
    }

    pub async fn current_identity(&self) -> Option<Identity> {
        self.state.lock().await.session.current().cloned()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.state.lock().await.session.is_logged_in()
    }

    pub async fn is_favorite(&self, story_id: &str) -> bool {
        let state = self.state.lock().await;
        state
            .session
            .current()
            .is_some_and(|identity| identity.is_favorite(story_id))
            && state.stories.contains(story_id)
    }
}

// Logging in before the first successful load yields sets the collection
// does not hold yet; they stay hidden until it does.
fn in_collection(stories: &[Story], collection: &StoryCollection) -> Vec<Story> {
    stories
        .iter()
        .filter(|story| collection.contains(&story.story_id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use snooze_core::session::MemoryKeyValueStore;
    use snooze_core::testing::FakeStoryApi;

    fn board_with(api: &Arc<FakeStoryApi>) -> (StoryBoard, Arc<MemoryKeyValueStore>) {
        let medium = Arc::new(MemoryKeyValueStore::new());
        let board = StoryBoard::new(api.clone(), medium.clone());
        (board, medium)
    }

    async fn logged_in_board() -> (StoryBoard, Arc<FakeStoryApi>) {
        let api = Arc::new(FakeStoryApi::new());
        api.add_user("alice", "pw1", "Alice");
        let (board, _) = board_with(&api);
        board.login("alice", "pw1").await.unwrap();
        (board, api)
    }

    fn rust_story() -> NewStory {
        NewStory::new("Alice", "Rust", "https://www.rust-lang.org/learn")
    }

    #[tokio::test]
    async fn test_start_without_session_loads_stories() {
        let api = Arc::new(FakeStoryApi::new());
        api.add_user("bob", "pw2", "Bob");
        api.seed_story("bob", "Tokio", "https://tokio.rs");
        let (board, _) = board_with(&api);

        let restored = board.start().await.unwrap();

        assert!(restored.is_none());
        assert_eq!(board.stories().await.len(), 1);
        assert_eq!(api.calls().resolve_identity, 0);
    }

    #[tokio::test]
    async fn test_start_restores_previous_session() {
        let api = Arc::new(FakeStoryApi::new());
        api.add_user("alice", "pw1", "Alice");
        let medium = Arc::new(MemoryKeyValueStore::new());

        let first = StoryBoard::new(api.clone(), medium.clone());
        first.login("alice", "pw1").await.unwrap();

        let second = StoryBoard::new(api.clone(), medium);
        let restored = second.start().await.unwrap();

        assert_eq!(restored.map(|i| i.username), Some("alice".to_string()));
        assert!(second.is_logged_in().await);
    }

    #[tokio::test]
    async fn test_failed_start_holds_back_restored_identity() {
        let api = Arc::new(FakeStoryApi::new());
        api.add_user("alice", "pw1", "Alice");
        let medium = Arc::new(MemoryKeyValueStore::new());
        let first = StoryBoard::new(api.clone(), medium.clone());
        first.login("alice", "pw1").await.unwrap();
        let story = first.submit_story(rust_story()).await.unwrap();
        first.add_favorite(&story.story_id).await.unwrap();

        api.set_stories_unavailable(true);
        let board = StoryBoard::new(api.clone(), medium);
        let err = board.start().await.unwrap_err();

        assert!(err.is_network());
        assert!(board.stories().await.is_empty());
        assert!(board.current_identity().await.is_none());
        assert!(board.favorites().await.is_empty());
        assert!(board.own_stories().await.is_empty());

        // the record survived, so a later start restores everything
        api.set_stories_unavailable(false);
        let restored = board.start().await.unwrap().unwrap();
        assert_eq!(restored.username, "alice");
        assert_eq!(board.favorites().await[0].story_id, story.story_id);
        assert_eq!(board.own_stories().await[0].story_id, story.story_id);
    }

    #[tokio::test]
    async fn test_login_before_load_shows_only_loaded_stories() {
        let api = Arc::new(FakeStoryApi::new());
        api.add_user("alice", "pw1", "Alice");
        let first = StoryBoard::new(api.clone(), Arc::new(MemoryKeyValueStore::new()));
        first.login("alice", "pw1").await.unwrap();
        let story = first.submit_story(rust_story()).await.unwrap();
        first.add_favorite(&story.story_id).await.unwrap();

        let (board, _) = board_with(&api);
        let alice = board.login("alice", "pw1").await.unwrap();
        assert!(alice.is_favorite(&story.story_id));
        assert!(board.favorites().await.is_empty());
        assert!(board.own_stories().await.is_empty());
        assert!(!board.is_favorite(&story.story_id).await);

        board.refresh().await.unwrap();
        assert_eq!(board.favorites().await.len(), 1);
        assert_eq!(board.own_stories().await.len(), 1);
        assert!(board.is_favorite(&story.story_id).await);
    }

    #[tokio::test]
    async fn test_start_reports_load_failure() {
        let api = Arc::new(FakeStoryApi::new());
        let (board, _) = board_with(&api);
        api.set_offline(true);

        let err = board.start().await.unwrap_err();

        assert!(err.is_network());
        assert!(board.stories().await.is_empty());
        assert!(!board.is_logged_in().await);
    }

    #[tokio::test]
    async fn test_logged_out_mutations_are_rejected() {
        let api = Arc::new(FakeStoryApi::new());
        let story = {
            api.add_user("bob", "pw2", "Bob");
            api.seed_story("bob", "Tokio", "https://tokio.rs")
        };
        let (board, _) = board_with(&api);
        board.load_stories().await.unwrap();

        assert!(board.submit_story(rust_story()).await.unwrap_err().is_permission());
        assert!(board.add_favorite(&story.story_id).await.unwrap_err().is_permission());
        assert!(board.remove_favorite(&story.story_id).await.unwrap_err().is_permission());
        assert!(board.delete_own_story(&story.story_id).await.unwrap_err().is_permission());
        assert_eq!(api.calls().add_favorite, 0);
        assert_eq!(api.calls().create_story, 0);
    }

    #[tokio::test]
    async fn test_set_favorite_converges() {
        let (board, api) = logged_in_board().await;
        let story = board.submit_story(rust_story()).await.unwrap();

        board.set_favorite(&story.story_id, true).await.unwrap();
        board.set_favorite(&story.story_id, true).await.unwrap();
        assert!(board.is_favorite(&story.story_id).await);
        assert_eq!(board.favorites().await.len(), 1);

        board.set_favorite(&story.story_id, false).await.unwrap();
        board.set_favorite(&story.story_id, false).await.unwrap();
        assert!(!board.is_favorite(&story.story_id).await);

        let calls = api.calls();
        assert_eq!(calls.add_favorite, 1);
        assert_eq!(calls.remove_favorite, 1);
    }

    #[tokio::test]
    async fn test_concurrent_add_favorite_is_serialized() {
        let (board, api) = logged_in_board().await;
        let story = board.submit_story(rust_story()).await.unwrap();

        let (first, second) = tokio::join!(
            board.add_favorite(&story.story_id),
            board.add_favorite(&story.story_id)
        );

        first.unwrap();
        second.unwrap();
        assert_eq!(api.calls().add_favorite, 1);
        assert_eq!(board.favorites().await.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_add_and_remove_last_wins() {
        let (board, _) = logged_in_board().await;
        let story = board.submit_story(rust_story()).await.unwrap();

        let (added, removed) = tokio::join!(
            board.add_favorite(&story.story_id),
            board.remove_favorite(&story.story_id)
        );

        added.unwrap();
        removed.unwrap();
        assert!(!board.is_favorite(&story.story_id).await);
    }

    #[tokio::test]
    async fn test_refresh_prunes_stories_deleted_elsewhere() {
        let (board, api) = logged_in_board().await;
        api.add_user("bob", "pw2", "Bob");
        let bobs = api.seed_story("bob", "Tokio", "https://tokio.rs");
        board.load_stories().await.unwrap();
        board.add_favorite(&bobs.story_id).await.unwrap();

        // bob deletes his story from another client
        let bob = api.authenticate("bob", "pw2").await.unwrap();
        api.delete_story(&bob.session_record(), &bobs.story_id)
            .await
            .unwrap();

        let pruned = board.refresh().await.unwrap();

        assert_eq!(pruned, 1);
        assert!(board.favorites().await.is_empty());
        assert!(board.stories().await.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_state() {
        let (board, api) = logged_in_board().await;
        let story = board.submit_story(rust_story()).await.unwrap();
        board.add_favorite(&story.story_id).await.unwrap();

        api.set_offline(true);
        assert!(board.refresh().await.unwrap_err().is_network());

        assert_eq!(board.stories().await.len(), 1);
        assert_eq!(board.favorites().await.len(), 1);
    }

    #[tokio::test]
    async fn test_logout_clears_views() {
        let (board, _) = logged_in_board().await;
        let story = board.submit_story(rust_story()).await.unwrap();
        board.add_favorite(&story.story_id).await.unwrap();

        board.logout().await.unwrap();

        assert!(board.current_identity().await.is_none());
        assert!(board.favorites().await.is_empty());
        assert!(board.own_stories().await.is_empty());
        // the collection is public and survives logout
        assert_eq!(board.stories().await.len(), 1);
    }
}
