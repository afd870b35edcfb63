//! Identity domain model.
//!
//! Represents the logged-in principal together with its favorite and
//! own-story sets.

use crate::session::SessionRecord;
use crate::story::Story;

/// The authenticated principal.
///
/// `favorites` and `own_stories` are ordered sets keyed by `story_id`; the
/// mutators below never insert a second copy of the same story.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    /// Unique, case-sensitive account name
    pub username: String,
    /// Display name
    pub name: String,
    /// Opaque credential, only meaningful to the remote service
    login_token: String,
    favorites: Vec<Story>,
    own_stories: Vec<Story>,
}

impl Identity {
    pub fn new(
        username: impl Into<String>,
        name: impl Into<String>,
        login_token: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
            login_token: login_token.into(),
            favorites: Vec::new(),
            own_stories: Vec::new(),
        }
    }

    /// Attaches the favorite and own-story sets reported by the service.
    ///
    /// Own stories submitted by someone else are dropped, and repeated ids
    /// are collapsed.
    pub fn with_stories(mut self, favorites: Vec<Story>, own_stories: Vec<Story>) -> Self {
        self.favorites.clear();
        self.own_stories.clear();
        for story in favorites {
            self.insert_favorite(story);
        }
        // insert_own_story prepends, so feed oldest first to keep the order
        for story in own_stories.into_iter().rev() {
            self.insert_own_story(story);
        }
        self
    }

    pub fn login_token(&self) -> &str {
        &self.login_token
    }

    /// The credential pair persisted for silent re-authentication.
    pub fn session_record(&self) -> SessionRecord {
        SessionRecord::new(self.login_token.clone(), self.username.clone())
    }

    pub fn favorites(&self) -> &[Story] {
        &self.favorites
    }

    pub fn own_stories(&self) -> &[Story] {
        &self.own_stories
    }

    /// The star state of a story, derived from membership.
    pub fn is_favorite(&self, story_id: &str) -> bool {
        self.favorites.iter().any(|s| s.story_id == story_id)
    }

    pub fn owns(&self, story_id: &str) -> bool {
        self.own_stories.iter().any(|s| s.story_id == story_id)
    }

    /// Returns `false` if the story was already a favorite.
    pub(crate) fn insert_favorite(&mut self, story: Story) -> bool {
        if self.is_favorite(&story.story_id) {
            return false;
        }
        self.favorites.push(story);
        true
    }

    /// Returns `false` if the story was not a favorite.
    pub(crate) fn remove_favorite(&mut self, story_id: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|s| s.story_id != story_id);
        before != self.favorites.len()
    }

    /// Newest own stories come first, matching the collection order.
    pub(crate) fn insert_own_story(&mut self, story: Story) -> bool {
        if !story.is_owned_by(&self.username) || self.owns(&story.story_id) {
            return false;
        }
        self.own_stories.insert(0, story);
        true
    }

    /// Drops a story from both sets.
    pub(crate) fn forget_story(&mut self, story_id: &str) {
        self.own_stories.retain(|s| s.story_id != story_id);
        self.favorites.retain(|s| s.story_id != story_id);
    }

    /// Drops every favorite or own story for which `keep` returns `false`.
    pub(crate) fn retain_stories(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.own_stories.retain(|s| keep(&s.story_id));
        self.favorites.retain(|s| keep(&s.story_id));
    }
}

// The token stays out of debug output.
impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .field("name", &self.name)
            .field("favorites", &self.favorites.len())
            .field("own_stories", &self.own_stories.len())
            .finish_non_exhaustive()
    }
}
