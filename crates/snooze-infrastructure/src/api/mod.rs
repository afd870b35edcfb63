//! HTTP client for the remote story service.

mod dto;
mod http_story_api;

pub use http_story_api::HttpStoryApi;
