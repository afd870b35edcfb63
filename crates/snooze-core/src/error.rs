//! Error types for the Snooze client.

use serde::Serialize;
use thiserror::Error;

/// A shared error type for the entire Snooze client.
///
/// The first five variants form the failure taxonomy of every
/// collaborator-facing operation. The remaining variants describe local
/// failures (storage, configuration, serialization).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SnoozeError {
    /// Bad credentials or an expired/invalid token.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Bad input to create-account or create-story.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation attempted by a non-owning or unauthenticated identity.
    #[error("Permission denied: {0}")]
    Permission(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Transport failure talking to the remote service
    #[error("Network error: {0}")]
    Network(String),

    /// Session storage medium failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SnoozeError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Permission error
    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an Authentication error
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a Permission error
    pub fn is_permission(&self) -> bool {
        matches!(self, Self::Permission(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a Network error
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Whether the caller may recover from this error without a code change.
    ///
    /// Permission errors are client logic faults and internal errors are bugs;
    /// everything else is either retryable or resolved by refreshing state.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Permission(_) | Self::Internal(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for SnoozeError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for SnoozeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SnoozeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for SnoozeError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, SnoozeError>`.
pub type Result<T> = std::result::Result<T, SnoozeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = SnoozeError::not_found("story", "S1");
        assert_eq!(err.to_string(), "Entity not found: story 'S1'");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(SnoozeError::network("offline").is_recoverable());
        assert!(SnoozeError::authentication("expired").is_recoverable());
        assert!(!SnoozeError::permission("not owner").is_recoverable());
        assert!(!SnoozeError::internal("bug").is_recoverable());
    }

    #[test]
    fn test_io_error_becomes_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked");
        let err: SnoozeError = io.into();
        assert!(matches!(err, SnoozeError::Storage(_)));
    }
}
