//! Unified error handling for the session layer.
//!
//! Each subsystem defines its own error enum (`ApiError` for the remote
//! clients, `StorageError` for the blob store, `ConfigError` for loading).
//! [`SessionError`] unifies them at the facade boundary.
//!
//! State containers never let errors escape to the UI as `Result`s: each
//! operation converts its failure into a [`StateError`] stored in the
//! container's error slot, logs the full detail via `tracing`, and returns a
//! `bool`/`Option` to the caller.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Top-level error type for the session layer.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Remote store API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Local blob store operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for `SessionError`.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Coarse failure classification surfaced to UI collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request failed or the server returned a non-success status.
    Network,
    /// The requested entity does not exist.
    NotFound,
    /// Local read/write failure.
    Storage,
}

/// Clonable error value held in a container's error slot.
///
/// UI collaborators read this to gate inline error text and retry
/// affordances; the full source error goes to the log, not the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateError {
    /// Failure classification.
    pub kind: ErrorKind,
    /// User-presentable message.
    pub message: String,
}

impl StateError {
    /// Build a slot value with an operation-specific message, classifying
    /// the underlying API failure.
    #[must_use]
    pub fn api(message: &str, source: &ApiError) -> Self {
        let kind = match source {
            ApiError::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Network,
        };
        Self {
            kind,
            message: message.to_string(),
        }
    }

    /// Build a slot value for a local storage failure.
    #[must_use]
    pub fn storage(message: &str) -> Self {
        Self {
            kind: ErrorKind::Storage,
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_classification() {
        let not_found = ApiError::NotFound("product 9".to_string());
        let err = StateError::api("Failed to fetch product details", &not_found);
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Failed to fetch product details");

        let status = ApiError::UnexpectedStatus {
            status: 500,
            body: "boom".to_string(),
        };
        let err = StateError::api("Failed to fetch cart", &status);
        assert_eq!(err.kind, ErrorKind::Network);
    }

    #[test]
    fn test_session_error_display() {
        let err = SessionError::Api(ApiError::NotFound("cart".to_string()));
        assert_eq!(err.to_string(), "API error: Not found: cart");
    }
}
