//! Client-side session and story collection state for Hack or Snooze.
//!
//! This crate holds the domain models, the remote and storage contracts and
//! the operations that keep an identity's favorites and own stories
//! consistent with the story collection.

pub mod error;
pub mod remote;
pub mod session;
pub mod story;
pub mod user;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export common error type
pub use error::SnoozeError;
pub use remote::StoryApi;
