//! User domain module.
//!
//! This module contains the `Identity` model and the operations that keep its
//! favorites and own stories consistent.
//!
//! # Module Structure
//!
//! - `model`: Identity domain model
//! - `service`: Favorite and own-story operations (`UserStoryService`)

mod model;
mod service;

// Re-export public API
pub use model::Identity;
pub use service::UserStoryService;
