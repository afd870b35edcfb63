//! Application layer for the Snooze client.
//!
//! Ties the core operations and the infrastructure adapters together behind
//! a single session context, [`StoryBoard`].

pub mod board;
pub mod bootstrap;
pub mod logging;

pub use board::StoryBoard;
pub use bootstrap::AppBootstrap;
