//! Infrastructure layer for the Snooze client.
//!
//! Provides the concrete collaborators behind the core contracts: the HTTP
//! story service client, the file-backed session storage, configuration
//! loading and path resolution.

pub mod api;
pub mod config;
pub mod paths;
pub mod storage;

pub use api::HttpStoryApi;
pub use config::ClientConfig;
pub use paths::SnoozePaths;
pub use storage::TomlKeyValueStore;
