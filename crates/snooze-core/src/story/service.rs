//! Loading and submitting stories.

use super::collection::StoryCollection;
use super::model::{NewStory, Story};
use crate::error::{Result, SnoozeError};
use crate::remote::StoryApi;
use crate::user::Identity;
use std::sync::Arc;

/// Keeps a [`StoryCollection`] in step with the remote service.
///
/// Local state only changes after the service confirms an operation.
#[derive(Clone)]
pub struct StoryListService {
    api: Arc<dyn StoryApi>,
}

impl StoryListService {
    pub fn new(api: Arc<dyn StoryApi>) -> Self {
        Self { api }
    }

    /// Replaces the collection with the service's full story list.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; `collection` is left exactly as it was.
    pub async fn load_all(&self, collection: &mut StoryCollection) -> Result<()> {
        let stories = self.api.list_stories().await?;
        let fresh = StoryCollection::from_stories(stories);
        tracing::debug!("[Stories] Loaded {} stories", fresh.len());
        collection.replace_all(fresh);
        Ok(())
    }

    /// Submits a story as `identity`.
    ///
    /// On success the confirmed story is placed at the front of
    /// `collection` and added to the identity's own stories.
    ///
    /// # Errors
    ///
    /// - `Permission` when no identity is logged in
    /// - `Validation` when the submission is rejected locally or remotely
    /// - `Network` on transport failure
    pub async fn submit(
        &self,
        identity: Option<&mut Identity>,
        collection: &mut StoryCollection,
        new_story: NewStory,
    ) -> Result<Story> {
        let identity =
            identity.ok_or_else(|| SnoozeError::permission("log in to submit a story"))?;
        new_story.validate()?;

        let story = self
            .api
            .create_story(&identity.session_record(), &new_story)
            .await?;

        if !story.is_owned_by(&identity.username) {
            return Err(SnoozeError::internal(format!(
                "service attributed story {} to {} instead of {}",
                story.story_id, story.username, identity.username
            )));
        }

        tracing::info!(
            "[Stories] {} submitted story {}",
            identity.username,
            story.story_id
        );
        collection.prepend(story.clone());
        identity.insert_own_story(story.clone());
        Ok(story)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeStoryApi;

    async fn logged_in(api: &FakeStoryApi) -> Identity {
        api.add_user("alice", "pw1", "Alice");
        api.authenticate("alice", "pw1").await.unwrap()
    }

    #[tokio::test]
    async fn test_load_all_replaces_collection() {
        let api = Arc::new(FakeStoryApi::new());
        api.seed_story("bob", "First", "http://example.com/1");
        api.seed_story("bob", "Second", "http://example.com/2");
        let service = StoryListService::new(api.clone());

        let mut collection = StoryCollection::new();
        service.load_all(&mut collection).await.unwrap();

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.first().unwrap().title, "Second");
    }

    #[tokio::test]
    async fn test_load_all_failure_keeps_previous_collection() {
        let api = Arc::new(FakeStoryApi::new());
        api.seed_story("bob", "First", "http://example.com/1");
        let service = StoryListService::new(api.clone());

        let mut collection = StoryCollection::new();
        service.load_all(&mut collection).await.unwrap();

        api.seed_story("bob", "Second", "http://example.com/2");
        api.set_offline(true);
        let err = service.load_all(&mut collection).await.unwrap_err();

        assert!(err.is_network());
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.first().unwrap().title, "First");
    }

    #[tokio::test]
    async fn test_submit_requires_identity() {
        let api = Arc::new(FakeStoryApi::new());
        let service = StoryListService::new(api.clone());
        let mut collection = StoryCollection::new();

        let err = service
            .submit(None, &mut collection, NewStory::new("A", "Hi", "http://example.com/x"))
            .await
            .unwrap_err();

        assert!(err.is_permission());
        assert!(collection.is_empty());
        assert_eq!(api.calls().create_story, 0);
    }

    #[tokio::test]
    async fn test_submit_prepends_and_records_ownership() {
        let api = Arc::new(FakeStoryApi::new());
        api.seed_story("bob", "Older", "http://example.com/1");
        let service = StoryListService::new(api.clone());
        let mut identity = logged_in(&api).await;
        let mut collection = StoryCollection::new();
        service.load_all(&mut collection).await.unwrap();

        let story = service
            .submit(
                Some(&mut identity),
                &mut collection,
                NewStory::new("A", "Hi", "http://example.com/x"),
            )
            .await
            .unwrap();

        assert_eq!(story.username, "alice");
        assert_eq!(collection.first().unwrap().story_id, story.story_id);
        assert!(identity.owns(&story.story_id));
        assert_eq!(collection.len(), 2);
    }

    #[tokio::test]
    async fn test_submit_invalid_story_is_not_sent() {
        let api = Arc::new(FakeStoryApi::new());
        let service = StoryListService::new(api.clone());
        let mut identity = logged_in(&api).await;
        let mut collection = StoryCollection::new();

        let err = service
            .submit(
                Some(&mut identity),
                &mut collection,
                NewStory::new("A", "Hi", "not a url at all://"),
            )
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(api.calls().create_story, 0);
        assert!(identity.own_stories().is_empty());
    }

    #[tokio::test]
    async fn test_submit_network_failure_changes_nothing() {
        let api = Arc::new(FakeStoryApi::new());
        let service = StoryListService::new(api.clone());
        let mut identity = logged_in(&api).await;
        let mut collection = StoryCollection::new();
        api.set_offline(true);

        let err = service
            .submit(
                Some(&mut identity),
                &mut collection,
                NewStory::new("A", "Hi", "http://example.com/x"),
            )
            .await
            .unwrap_err();

        assert!(err.is_network());
        assert!(collection.is_empty());
        assert!(identity.own_stories().is_empty());
    }

    #[tokio::test]
    async fn test_submit_rejected_remotely_changes_nothing() {
        let api = Arc::new(FakeStoryApi::new());
        api.seed_story("bob", "Older", "http://example.com/1");
        let service = StoryListService::new(api.clone());
        let mut identity = logged_in(&api).await;
        let mut collection = StoryCollection::new();
        service.load_all(&mut collection).await.unwrap();
        let before = collection.clone();
        api.fail_next(SnoozeError::validation("title is too long"));

        let err = service
            .submit(
                Some(&mut identity),
                &mut collection,
                NewStory::new("A", "Hi", "http://example.com/x"),
            )
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(api.calls().create_story, 1);
        assert_eq!(collection, before);
        assert!(identity.own_stories().is_empty());
        assert_eq!(api.remote_story_count(), 1);
    }
}
