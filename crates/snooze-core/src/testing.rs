//! Testing utilities.
//!
//! This module provides in-memory collaborators for deterministic tests:
//! - `FakeStoryApi`, a remote service with call counters and failure injection
//! - `FailingKeyValueStore`, a storage medium that rejects every write

use crate::error::{Result, SnoozeError};
use crate::remote::StoryApi;
use crate::session::{KeyValueStore, SessionRecord};
use crate::story::{NewStory, Story};
use crate::user::Identity;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Number of calls issued against each remote operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub authenticate: usize,
    pub register: usize,
    pub resolve_identity: usize,
    pub list_stories: usize,
    pub create_story: usize,
    pub delete_story: usize,
    pub add_favorite: usize,
    pub remove_favorite: usize,
}

#[derive(Debug, Clone)]
struct FakeUser {
    password: String,
    name: String,
    token: String,
    favorites: Vec<String>,
}

#[derive(Debug, Default)]
struct FakeState {
    users: HashMap<String, FakeUser>,
    /// Newest first
    stories: Vec<Story>,
    next_story: u64,
    next_token: u64,
    offline: bool,
    stories_unavailable: bool,
    fail_next: Option<SnoozeError>,
    calls: CallCounts,
}

impl FakeState {
    fn issue_token(&mut self) -> String {
        self.next_token += 1;
        format!("T{}", self.next_token)
    }

    fn authorize(&self, record: &SessionRecord) -> Result<&FakeUser> {
        self.users
            .get(&record.username)
            .filter(|user| user.token == record.token)
            .ok_or_else(|| SnoozeError::authentication("invalid token"))
    }

    fn identity(&self, username: &str) -> Result<Identity> {
        let user = self
            .users
            .get(username)
            .ok_or_else(|| SnoozeError::not_found("user", username))?;
        let favorites = user
            .favorites
            .iter()
            .filter_map(|id| self.stories.iter().find(|s| &s.story_id == id).cloned())
            .collect();
        let own_stories = self
            .stories
            .iter()
            .filter(|s| s.username == username)
            .cloned()
            .collect();
        Ok(Identity::new(username, user.name.clone(), user.token.clone())
            .with_stories(favorites, own_stories))
    }

    fn story_exists(&self, story_id: &str) -> Result<()> {
        if self.stories.iter().any(|s| s.story_id == story_id) {
            Ok(())
        } else {
            Err(SnoozeError::not_found("story", story_id))
        }
    }
}

/// An in-memory stand-in for the remote story service.
///
/// Story ids are issued as `S1`, `S2`, ... and tokens as `T1`, `T2`, ... in
/// creation order. Every call yields to the scheduler once before touching
/// state, so concurrently issued calls interleave.
#[derive(Debug, Default)]
pub struct FakeStoryApi {
    state: Mutex<FakeState>,
}

impl FakeStoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a user directly, bypassing the call counters.
    pub fn add_user(&self, username: &str, password: &str, name: &str) {
        let mut state = self.state();
        let token = state.issue_token();
        state.users.insert(
            username.to_string(),
            FakeUser {
                password: password.to_string(),
                name: name.to_string(),
                token,
                favorites: Vec::new(),
            },
        );
    }

    /// Adds a story as if `username` had submitted it earlier.
    pub fn seed_story(&self, username: &str, title: &str, url: &str) -> Story {
        let mut state = self.state();
        state.next_story += 1;
        let story = Story {
            story_id: format!("S{}", state.next_story),
            title: title.to_string(),
            author: username.to_string(),
            url: url.to_string(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        state.stories.insert(0, story.clone());
        story
    }

    /// Makes every subsequent call fail with a network error.
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    /// Makes `list_stories` fail with a network error while other calls
    /// keep working.
    pub fn set_stories_unavailable(&self, unavailable: bool) {
        self.state().stories_unavailable = unavailable;
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next(&self, error: SnoozeError) {
        self.state().fail_next = Some(error);
    }

    /// Invalidates a user's token, as if it had expired.
    pub fn expire_token(&self, username: &str) {
        let mut state = self.state();
        let token = state.issue_token();
        if let Some(user) = state.users.get_mut(username) {
            user.token = token;
        }
    }

    pub fn calls(&self) -> CallCounts {
        self.state().calls.clone()
    }

    pub fn is_remote_favorite(&self, username: &str, story_id: &str) -> bool {
        self.state()
            .users
            .get(username)
            .is_some_and(|user| user.favorites.iter().any(|id| id == story_id))
    }

    pub fn remote_story_count(&self) -> usize {
        self.state().stories.len()
    }

    /// Counts the call, then applies offline mode and injected failures.
    async fn begin(&self, count: impl FnOnce(&mut CallCounts)) -> Result<()> {
        {
            let mut state = self.state();
            count(&mut state.calls);
            if state.offline {
                return Err(SnoozeError::network("service unreachable"));
            }
            if let Some(error) = state.fail_next.take() {
                return Err(error);
            }
        }
        tokio::task::yield_now().await;
        Ok(())
    }
}

#[async_trait]
impl StoryApi for FakeStoryApi {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Identity> {
        self.begin(|c| c.authenticate += 1).await?;
        let state = self.state();
        match state.users.get(username) {
            Some(user) if user.password == password => state.identity(username),
            _ => Err(SnoozeError::authentication("invalid username or password")),
        }
    }

    async fn register(&self, username: &str, password: &str, name: &str) -> Result<Identity> {
        self.begin(|c| c.register += 1).await?;
        if username.is_empty() || password.is_empty() || name.is_empty() {
            return Err(SnoozeError::validation("username, password and name are required"));
        }
        let mut state = self.state();
        if state.users.contains_key(username) {
            return Err(SnoozeError::validation(format!(
                "username '{username}' is already taken"
            )));
        }
        let token = state.issue_token();
        state.users.insert(
            username.to_string(),
            FakeUser {
                password: password.to_string(),
                name: name.to_string(),
                token,
                favorites: Vec::new(),
            },
        );
        state.identity(username)
    }

    async fn resolve_identity(&self, record: &SessionRecord) -> Result<Identity> {
        self.begin(|c| c.resolve_identity += 1).await?;
        let state = self.state();
        state.authorize(record)?;
        state.identity(&record.username)
    }

    async fn list_stories(&self) -> Result<Vec<Story>> {
        self.begin(|c| c.list_stories += 1).await?;
        let state = self.state();
        if state.stories_unavailable {
            return Err(SnoozeError::network("story list unavailable"));
        }
        Ok(state.stories.clone())
    }

    async fn create_story(&self, record: &SessionRecord, story: &NewStory) -> Result<Story> {
        self.begin(|c| c.create_story += 1).await?;
        let mut state = self.state();
        state.authorize(record)?;
        if story.title.is_empty() || story.author.is_empty() || story.url.is_empty() {
            return Err(SnoozeError::validation("author, title and url are required"));
        }
        state.next_story += 1;
        let created = Story {
            story_id: format!("S{}", state.next_story),
            title: story.title.clone(),
            author: story.author.clone(),
            url: story.url.clone(),
            username: record.username.clone(),
            created_at: Utc::now(),
        };
        state.stories.insert(0, created.clone());
        Ok(created)
    }

    async fn delete_story(&self, record: &SessionRecord, story_id: &str) -> Result<()> {
        self.begin(|c| c.delete_story += 1).await?;
        let mut state = self.state();
        state.authorize(record)?;
        let story = state
            .stories
            .iter()
            .find(|s| s.story_id == story_id)
            .ok_or_else(|| SnoozeError::not_found("story", story_id))?;
        if story.username != record.username {
            return Err(SnoozeError::permission("only the owner may delete a story"));
        }
        state.stories.retain(|s| s.story_id != story_id);
        for user in state.users.values_mut() {
            user.favorites.retain(|id| id != story_id);
        }
        Ok(())
    }

    async fn add_favorite(&self, record: &SessionRecord, story_id: &str) -> Result<()> {
        self.begin(|c| c.add_favorite += 1).await?;
        let mut state = self.state();
        state.authorize(record)?;
        state.story_exists(story_id)?;
        if let Some(user) = state.users.get_mut(&record.username) {
            if !user.favorites.iter().any(|id| id == story_id) {
                user.favorites.push(story_id.to_string());
            }
        }
        Ok(())
    }

    async fn remove_favorite(&self, record: &SessionRecord, story_id: &str) -> Result<()> {
        self.begin(|c| c.remove_favorite += 1).await?;
        let mut state = self.state();
        state.authorize(record)?;
        state.story_exists(story_id)?;
        if let Some(user) = state.users.get_mut(&record.username) {
            user.favorites.retain(|id| id != story_id);
        }
        Ok(())
    }
}

/// A storage medium that reads as empty and rejects every write.
#[derive(Debug, Default)]
pub struct FailingKeyValueStore;

#[async_trait]
impl KeyValueStore for FailingKeyValueStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(SnoozeError::storage("storage is read-only"))
    }

    async fn clear(&self) -> Result<()> {
        Err(SnoozeError::storage("storage is read-only"))
    }
}
