//! Favorite and own-story operations for the current identity.
//!
//! Each operation is membership-based: it converges to the requested state
//! and is safe to retry. The identity and collection are only touched after
//! the remote service confirms the change.

use super::model::Identity;
use crate::error::{Result, SnoozeError};
use crate::remote::StoryApi;
use crate::story::StoryCollection;
use std::sync::Arc;

/// Keeps an identity's favorites and own stories consistent with the
/// collection and the remote service.
#[derive(Clone)]
pub struct UserStoryService {
    api: Arc<dyn StoryApi>,
}

impl UserStoryService {
    pub fn new(api: Arc<dyn StoryApi>) -> Self {
        Self { api }
    }

    /// Makes `story_id` a favorite.
    ///
    /// Succeeds without contacting the service if it already is one.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the story is not in `collection`
    /// - any error from the service; the identity is unchanged
    pub async fn add_favorite(
        &self,
        identity: &mut Identity,
        collection: &StoryCollection,
        story_id: &str,
    ) -> Result<()> {
        if identity.is_favorite(story_id) {
            tracing::debug!("[Favorites] {} already a favorite", story_id);
            return Ok(());
        }

        let story = collection
            .get(story_id)
            .ok_or_else(|| SnoozeError::not_found("story", story_id))?
            .clone();

        self.api
            .add_favorite(&identity.session_record(), story_id)
            .await?;

        tracing::info!("[Favorites] {} favorited {}", identity.username, story_id);
        identity.insert_favorite(story);
        Ok(())
    }

    /// Removes `story_id` from the favorites.
    ///
    /// Succeeds without contacting the service if it is not a favorite.
    pub async fn remove_favorite(&self, identity: &mut Identity, story_id: &str) -> Result<()> {
        if !identity.is_favorite(story_id) {
            tracing::debug!("[Favorites] {} is not a favorite", story_id);
            return Ok(());
        }

        self.api
            .remove_favorite(&identity.session_record(), story_id)
            .await?;

        tracing::info!("[Favorites] {} unfavorited {}", identity.username, story_id);
        identity.remove_favorite(story_id);
        Ok(())
    }

    /// Deletes a story the identity submitted.
    ///
    /// On success the story disappears from `collection`, the own stories
    /// and the favorites together.
    ///
    /// # Errors
    ///
    /// - `Permission` if the identity does not own the story; the service
    ///   is not contacted
    /// - any error from the service; nothing is changed
    pub async fn delete_own_story(
        &self,
        identity: &mut Identity,
        collection: &mut StoryCollection,
        story_id: &str,
    ) -> Result<()> {
        if !identity.owns(story_id) {
            return Err(SnoozeError::permission(format!(
                "{} does not own story {}",
                identity.username, story_id
            )));
        }

        self.api
            .delete_story(&identity.session_record(), story_id)
            .await?;

        tracing::info!("[Stories] {} deleted story {}", identity.username, story_id);
        collection.remove(story_id);
        identity.forget_story(story_id);
        Ok(())
    }

    /// Drops favorites and own stories the collection no longer contains.
    ///
    /// Returns how many entries were dropped.
    pub fn prune_missing(&self, identity: &mut Identity, collection: &StoryCollection) -> usize {
        let before = identity.favorites().len() + identity.own_stories().len();
        identity.retain_stories(|id| collection.contains(id));
        let dropped = before - (identity.favorites().len() + identity.own_stories().len());
        if dropped > 0 {
            tracing::debug!("[Stories] Pruned {} stale entries for {}", dropped, identity.username);
        }
        dropped
    }
}
