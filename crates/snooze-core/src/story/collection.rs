use super::model::Story;
use std::collections::HashSet;

/// The ordered set of stories known to the client, newest first.
///
/// `story_id` is unique across the sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryCollection {
    stories: Vec<Story>,
}

impl StoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from a fetched list, keeping the first occurrence
    /// of any repeated `story_id`.
    pub fn from_stories(stories: impl IntoIterator<Item = Story>) -> Self {
        let mut seen = HashSet::new();
        let stories = stories
            .into_iter()
            .filter(|story| seen.insert(story.story_id.clone()))
            .collect();
        Self { stories }
    }

    /// Replaces every story at once.
    pub fn replace_all(&mut self, other: StoryCollection) {
        *self = other;
    }

    /// Puts a story at the front, replacing any older copy with the same id.
    pub fn prepend(&mut self, story: Story) {
        self.stories.retain(|s| s.story_id != story.story_id);
        self.stories.insert(0, story);
    }

    /// Removes a story by id, returning it if it was present.
    pub fn remove(&mut self, story_id: &str) -> Option<Story> {
        let index = self.stories.iter().position(|s| s.story_id == story_id)?;
        Some(self.stories.remove(index))
    }

    pub fn get(&self, story_id: &str) -> Option<&Story> {
        self.stories.iter().find(|s| s.story_id == story_id)
    }

    pub fn contains(&self, story_id: &str) -> bool {
        self.get(story_id).is_some()
    }

    pub fn first(&self) -> Option<&Story> {
        self.stories.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Story> {
        self.stories.iter()
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Story> {
        self.stories.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn story(id: &str) -> Story {
        Story {
            story_id: id.to_string(),
            title: format!("title {id}"),
            author: "A".to_string(),
            url: "http://example.com".to_string(),
            username: "alice".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_from_stories_drops_duplicate_ids() {
        let collection = StoryCollection::from_stories(vec![story("S1"), story("S2"), story("S1")]);
        assert_eq!(collection.len(), 2);
        let ids: Vec<_> = collection.iter().map(|s| s.story_id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S2"]);
    }

    #[test]
    fn test_prepend_puts_story_first() {
        let mut collection = StoryCollection::from_stories(vec![story("S1"), story("S2")]);
        collection.prepend(story("S3"));
        assert_eq!(collection.first().unwrap().story_id, "S3");
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn test_prepend_existing_id_keeps_ids_unique() {
        let mut collection = StoryCollection::from_stories(vec![story("S1"), story("S2")]);
        collection.prepend(story("S2"));
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.first().unwrap().story_id, "S2");
    }

    #[test]
    fn test_remove() {
        let mut collection = StoryCollection::from_stories(vec![story("S1"), story("S2")]);
        assert!(collection.remove("S1").is_some());
        assert!(collection.remove("S1").is_none());
        assert!(!collection.contains("S1"));
        assert_eq!(collection.len(), 1);
    }
}
