//! Session domain module.
//!
//! This module contains the persisted credential pair, the storage contracts
//! and the identity lifecycle.
//!
//! # Module Structure
//!
//! - `record`: The persisted `SessionRecord`
//! - `store`: Storage medium contract (`KeyValueStore`) and the `SessionStore` adapter
//! - `manager`: Identity lifecycle management (`SessionManager`)
//!
//! # Usage
//!
//! ```ignore
//! use snooze_core::session::{SessionManager, SessionStore, MemoryKeyValueStore};
//! ```

mod manager;
mod record;
mod store;

// Re-export public API
pub use manager::SessionManager;
pub use record::SessionRecord;
pub use store::{KeyValueStore, MemoryKeyValueStore, SessionStore, TOKEN_KEY, USERNAME_KEY};
