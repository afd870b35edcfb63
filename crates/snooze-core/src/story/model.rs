//! Story domain model.
//!
//! A story is a single shared link. Stories are created by the remote service
//! and never edited by the client.

use crate::error::{Result, SnoozeError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A single shared link as confirmed by the remote service.
///
/// Every field is assigned or echoed back by the service; the client only
/// reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Opaque identifier assigned by the remote service
    pub story_id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    /// Username of the identity that submitted the story
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl Story {
    /// Returns the host the story links to, without a leading `www.`.
    pub fn host_name(&self) -> Option<String> {
        host_name(&self.url)
    }

    /// Whether `username` submitted this story.
    pub fn is_owned_by(&self, username: &str) -> bool {
        self.username == username
    }
}

/// The fields a user supplies when submitting a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStory {
    pub author: String,
    pub title: String,
    pub url: String,
}

impl NewStory {
    pub fn new(
        author: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            title: title.into(),
            url: url.into(),
        }
    }

    /// Checks the submission before it is sent anywhere.
    ///
    /// # Errors
    ///
    /// Returns `SnoozeError::Validation` if the author or title is blank, or
    /// the URL has no host component.
    pub fn validate(&self) -> Result<()> {
        if self.author.trim().is_empty() {
            return Err(SnoozeError::validation("author must not be empty"));
        }
        if self.title.trim().is_empty() {
            return Err(SnoozeError::validation("title must not be empty"));
        }
        if host_name(&self.url).is_none() {
            return Err(SnoozeError::validation(format!(
                "url '{}' has no host",
                self.url
            )));
        }
        Ok(())
    }
}

/// Extracts the host component of a link, stripping a leading `www.`.
///
/// Links without a scheme (`example.com/x`) are read as `http://` links.
pub fn host_name(link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }

    let parsed = if link.contains("://") {
        Url::parse(link)
    } else {
        Url::parse(&format!("http://{link}"))
    }
    .ok()?;

    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}
