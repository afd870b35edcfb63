//! Wire shapes of the Hack or Snooze v3 API.

use serde::{Deserialize, Serialize};
use snooze_core::story::{NewStory, Story};
use snooze_core::user::Identity;

#[derive(Serialize)]
pub(crate) struct CredentialsRequest<'a> {
    pub user: Credentials<'a>,
}

#[derive(Serialize)]
pub(crate) struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

#[derive(Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub token: &'a str,
}

#[derive(Serialize)]
pub(crate) struct CreateStoryRequest<'a> {
    pub token: &'a str,
    pub story: &'a NewStory,
}

/// Response of `/login` and `/signup`.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: UserDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserDto {
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub favorites: Vec<Story>,
    #[serde(default)]
    pub stories: Vec<Story>,
}

impl UserDto {
    /// The user endpoints never echo the token back, so it is supplied by
    /// the caller.
    pub fn into_identity(self, token: impl Into<String>) -> Identity {
        Identity::new(self.username, self.name, token).with_stories(self.favorites, self.stories)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StoriesResponse {
    pub stories: Vec<Story>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StoryEnvelope {
    pub story: Story,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_JSON: &str = r#"{
        "token": "eyJhbGciOi",
        "user": {
            "createdAt": "2023-01-02T03:04:05.678Z",
            "favorites": [{
                "storyId": "abc",
                "title": "Rust 2024",
                "author": "Ferris",
                "url": "https://www.rust-lang.org/",
                "username": "bob",
                "createdAt": "2023-01-01T00:00:00.000Z",
                "updatedAt": "2023-01-01T00:00:00.000Z"
            }],
            "name": "Alice",
            "stories": [],
            "updatedAt": "2023-01-02T03:04:05.678Z",
            "username": "alice"
        }
    }"#;

    #[test]
    fn test_auth_response_into_identity() {
        let response: AuthResponse = serde_json::from_str(USER_JSON).unwrap();
        let identity = response.user.into_identity(response.token);

        assert_eq!(identity.username, "alice");
        assert_eq!(identity.login_token(), "eyJhbGciOi");
        assert!(identity.is_favorite("abc"));
        assert!(identity.own_stories().is_empty());
        assert_eq!(
            identity.favorites()[0].host_name().as_deref(),
            Some("rust-lang.org")
        );
    }

    #[test]
    fn test_user_without_story_lists() {
        let envelope: UserEnvelope =
            serde_json::from_str(r#"{"user": {"username": "alice", "name": "Alice"}}"#).unwrap();
        assert!(envelope.user.favorites.is_empty());
        assert!(envelope.user.stories.is_empty());
    }

    #[test]
    fn test_create_story_request_shape() {
        let story = NewStory::new("Ferris", "Rust", "https://rust-lang.org");
        let body = serde_json::to_value(CreateStoryRequest {
            token: "T1",
            story: &story,
        })
        .unwrap();
        assert_eq!(body["token"], "T1");
        assert_eq!(body["story"]["title"], "Rust");
        assert_eq!(body["story"]["url"], "https://rust-lang.org");
    }

    #[test]
    fn test_login_request_omits_name() {
        let body = serde_json::to_value(CredentialsRequest {
            user: Credentials {
                username: "alice",
                password: "pw1",
                name: None,
            },
        })
        .unwrap();
        assert!(body["user"].get("name").is_none());
        assert_eq!(body["user"]["username"], "alice");
    }
}
