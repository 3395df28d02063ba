//! Access gate error types.
//!
//! None of these reach the client: the gate maps every marker failure to a
//! redirect. They exist for startup validation and for debug logging.

use crate::config::ConfigError;

/// Errors that can occur while building the gate or checking a marker.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The gate configuration failed validation.
    #[error("Invalid gate configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The marker value is not a valid signed token.
    #[error("Invalid marker: {message}")]
    InvalidMarker {
        /// Description of why the marker was rejected.
        message: String,
    },

    /// The marker token's `exp` claim is in the past.
    #[error("Marker expired")]
    MarkerExpired,

    /// Failed to sign a new marker.
    #[error("Failed to sign marker: {message}")]
    Signing {
        /// Description of the signing failure.
        message: String,
    },
}

impl GateError {
    /// Creates a new `InvalidMarker` error.
    #[must_use]
    pub fn invalid_marker(message: impl Into<String>) -> Self {
        Self::InvalidMarker {
            message: message.into(),
        }
    }

    /// Creates a new `Signing` error.
    #[must_use]
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for GateError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::MarkerExpired,
            _ => Self::invalid_marker(err.to_string()),
        }
    }
}
