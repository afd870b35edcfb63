//! Story domain module.
//!
//! # Module Structure
//!
//! - `model`: `Story`, `NewStory` and the host name helper
//! - `collection`: the ordered, id-unique `StoryCollection`
//! - `service`: `StoryListService` (full load and submission)

mod collection;
mod model;
mod service;

// Re-export public API
pub use collection::StoryCollection;
pub use model::{NewStory, Story, host_name};
pub use service::StoryListService;
