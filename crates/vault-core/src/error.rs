//! Error types for the SecureVault core.

use thiserror::Error;

/// A shared error type for the SecureVault crates.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. Expected authentication
/// failures (bad credentials, stale sessions) are carried as the `Auth`
/// variant so callers can classify them instead of crashing on them.
#[derive(Error, Debug, Clone)]
pub enum VaultError {
    /// Authentication error reported by the backend's auth surface
    #[error("Authentication error: {message}")]
    Auth {
        /// Machine-readable error code from the backend, when present
        code: Option<String>,
        message: String,
    },

    /// Network-level failure (connect, timeout, transport)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-auth API failure with the HTTP status the backend returned
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (repository layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VaultError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Auth error with an error code.
    pub fn auth(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Auth {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Creates an Auth error carrying only a message.
    pub fn auth_message(message: impl Into<String>) -> Self {
        Self::Auth {
            code: None,
            message: message.into(),
        }
    }

    /// Creates a Network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an Api error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a DataAccess error.
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an Auth error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Check if this is a Network error
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Check if this is a Config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this error indicates a session the backend no longer
    /// recognizes (expired, revoked, or garbage-collected server-side).
    ///
    /// Returns true for `Auth` errors carrying the stale-session error code
    /// or the backend's stale-session message. This helper centralizes the
    /// logic for detecting "already signed out" conditions so callers can
    /// suppress them instead of surfacing them.
    pub fn is_stale_session(&self) -> bool {
        match self {
            Self::Auth { code, message } => {
                code.as_deref() == Some(crate::auth::STALE_SESSION_CODE)
                    || message.contains(crate::auth::STALE_SESSION_MESSAGE)
            }
            _ => false,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for VaultError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (repository boundary)
impl From<anyhow::Error> for VaultError {
    fn from(err: anyhow::Error) -> Self {
        Self::DataAccess(err.to_string())
    }
}

/// A type alias for `Result<T, VaultError>`.
pub type Result<T> = std::result::Result<T, VaultError>;
