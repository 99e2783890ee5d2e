//! Error types for the Inkstone editor session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the whole editor session stack.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. Nothing here is fatal to a
/// session: validation errors are rejected before any network call, and
/// transport/application errors leave the session state untouched so the
/// next save tick or user retry can succeed.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum EditorError {
    /// An AI suggestion was requested with an empty or whitespace selection
    #[error("No text selected")]
    EmptySelection,

    /// Apply was invoked while no suggestion is pending
    #[error("No suggestion is pending")]
    NoPendingSuggestion,

    /// The selected span no longer exists in the buffer at apply time
    #[error("Selected text no longer present in the document")]
    StaleSuggestion { original: String },

    /// Network-level failure (connect, timeout, malformed response body)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Server responded with `{success: false}` or a non-2xx status
    #[error("Server error: {message}")]
    Api { message: String },

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

impl EditorError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an Api error
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
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

    /// Check if this is a local validation error (no network call happened)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptySelection | Self::NoPendingSuggestion | Self::StaleSuggestion { .. }
        )
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is an application-level error reported by the server
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// The message to surface to the user for this error.
    ///
    /// Server-provided messages are forwarded verbatim; everything else
    /// falls back to the `Display` rendering.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for EditorError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, EditorError>`.
pub type Result<T> = std::result::Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_classified_locally() {
        assert!(EditorError::EmptySelection.is_validation());
        assert!(
            EditorError::StaleSuggestion {
                original: "gone".to_string()
            }
            .is_validation()
        );
        assert!(!EditorError::transport("timed out").is_validation());
    }

    #[test]
    fn api_errors_surface_the_server_message() {
        let err = EditorError::api("Project not found");
        assert_eq!(err.user_message(), "Project not found");

        let err = EditorError::transport("connection refused");
        assert_eq!(err.user_message(), "Transport error: connection refused");
    }
}
