//! File storage for the session record and configuration.

pub mod atomic_toml;
mod toml_key_value_store;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
pub use toml_key_value_store::TomlKeyValueStore;
