//! Error types for chatter-relay
//!
//! The text pipeline and payload assembly never fail. Errors only surface at the
//! edges: dispatching actions to the host and validating server-side posts.

use thiserror::Error;

/// Result type alias for chatter-relay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for chatter-relay
#[derive(Debug, Error)]
pub enum Error {
    // ==========================================================================
    // Validation Errors
    // ==========================================================================
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    // ==========================================================================
    // Host Collaborator Errors
    // ==========================================================================
    /// The host action bus refused or failed to acknowledge a request.
    #[error("Action dispatch failed for '{event}': {reason}")]
    Dispatch { event: String, reason: String },

    // ==========================================================================
    // Serialization
    // ==========================================================================
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error type string (for JSON responses)
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::Dispatch { .. } => "DISPATCH_ERROR",
            Self::Serialization(_) => "TYPE_ERROR",
        }
    }
}
