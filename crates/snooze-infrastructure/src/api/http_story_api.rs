use super::dto::{
    AuthResponse, CreateStoryRequest, Credentials, CredentialsRequest, ErrorEnvelope,
    StoriesResponse, StoryEnvelope, TokenRequest, UserEnvelope,
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use snooze_core::error::{Result, SnoozeError};
use snooze_core::remote::StoryApi;
use snooze_core::session::SessionRecord;
use snooze_core::story::{NewStory, Story};
use snooze_core::user::Identity;
use std::time::Duration;
use url::Url;

/// What a request was about, used to translate a 404 into the right error.
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    Credentials,
    Stories,
    Story(&'a str),
    User(&'a str),
}

/// `StoryApi` over the Hack or Snooze v3 REST API.
#[derive(Debug, Clone)]
pub struct HttpStoryApi {
    client: Client,
    base_url: Url,
}

impl HttpStoryApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SnoozeError::config(format!("Invalid API base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SnoozeError::config(format!(
                "API base URL '{base_url}' cannot carry a path"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SnoozeError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                SnoozeError::config(format!("API base URL '{}' cannot carry a path", self.base_url))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        tracing::debug!("[Api] {} {}", method, url.path());
        Ok(self.client.request(method, url))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        target: Target<'_>,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|err| SnoozeError::network(format!("Request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| SnoozeError::network(format!("Failed to read response: {err}")))?;

        if !status.is_success() {
            tracing::debug!("[Api] Request failed with status {}", status);
            return Err(map_http_error(status, &body, target));
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn send_authenticated(
        &self,
        method: Method,
        segments: &[&str],
        token: &str,
        target: Target<'_>,
    ) -> Result<()> {
        let request = self
            .request(method, segments)?
            .json(&TokenRequest { token });
        self.send::<serde_json::Value>(request, target).await?;
        Ok(())
    }
}

#[async_trait]
impl StoryApi for HttpStoryApi {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Identity> {
        let request = self.request(Method::POST, &["login"])?.json(&CredentialsRequest {
            user: Credentials {
                username,
                password,
                name: None,
            },
        });
        let response: AuthResponse = self.send(request, Target::Credentials).await?;
        Ok(response.user.into_identity(response.token))
    }

    async fn register(&self, username: &str, password: &str, name: &str) -> Result<Identity> {
        let request = self.request(Method::POST, &["signup"])?.json(&CredentialsRequest {
            user: Credentials {
                username,
                password,
                name: Some(name),
            },
        });
        let response: AuthResponse = self.send(request, Target::Credentials).await?;
        Ok(response.user.into_identity(response.token))
    }

    async fn resolve_identity(&self, record: &SessionRecord) -> Result<Identity> {
        let request = self
            .request(Method::GET, &["users", record.username.as_str()])?
            .query(&[("token", record.token.as_str())]);
        let envelope: UserEnvelope = self.send(request, Target::User(&record.username)).await?;
        Ok(envelope.user.into_identity(record.token.clone()))
    }

    async fn list_stories(&self) -> Result<Vec<Story>> {
        let request = self.request(Method::GET, &["stories"])?;
        let response: StoriesResponse = self.send(request, Target::Stories).await?;
        Ok(response.stories)
    }

    async fn create_story(&self, record: &SessionRecord, story: &NewStory) -> Result<Story> {
        let request = self
            .request(Method::POST, &["stories"])?
            .json(&CreateStoryRequest {
                token: &record.token,
                story,
            });
        let envelope: StoryEnvelope = self.send(request, Target::Stories).await?;
        Ok(envelope.story)
    }

    async fn delete_story(&self, record: &SessionRecord, story_id: &str) -> Result<()> {
        self.send_authenticated(
            Method::DELETE,
            &["stories", story_id],
            &record.token,
            Target::Story(story_id),
        )
        .await
    }

    async fn add_favorite(&self, record: &SessionRecord, story_id: &str) -> Result<()> {
        self.send_authenticated(
            Method::POST,
            &["users", record.username.as_str(), "favorites", story_id],
            &record.token,
            Target::Story(story_id),
        )
        .await
    }

    async fn remove_favorite(&self, record: &SessionRecord, story_id: &str) -> Result<()> {
        self.send_authenticated(
            Method::DELETE,
            &["users", record.username.as_str(), "favorites", story_id],
            &record.token,
            Target::Story(story_id),
        )
        .await
    }
}

fn map_http_error(status: StatusCode, body: &str, target: Target<'_>) -> SnoozeError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED => SnoozeError::authentication(message),
        StatusCode::FORBIDDEN => SnoozeError::permission(message),
        StatusCode::NOT_FOUND => match target {
            // An unknown username during login is a credential failure
            Target::Credentials => SnoozeError::authentication(message),
            Target::Story(id) => SnoozeError::not_found("story", id),
            Target::User(username) => SnoozeError::not_found("user", username),
            Target::Stories => SnoozeError::network(message),
        },
        s if s.is_client_error() => SnoozeError::validation(message),
        s => SnoozeError::network(format!("{} {}", s.as_u16(), message)),
    }
}
