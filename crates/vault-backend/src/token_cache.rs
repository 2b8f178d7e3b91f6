//! Session token cache file storage.
//!
//! Persists the current session's token bundle as JSON under the config
//! directory, standing in for the browser-local storage the backend SDK
//! would normally own. The artifact is disposable: a missing or corrupt
//! file simply means no cached session.

use crate::paths::VaultPaths;
use std::fs;
use std::path::PathBuf;
use vault_core::auth::{AuthSession, TokenCacheStore};

/// Errors that can occur during token cache operations.
#[derive(Debug)]
pub enum TokenCacheError {
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing error.
    ParseError(serde_json::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for TokenCacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenCacheError::IoError(e) => write!(f, "I/O error: {}", e),
            TokenCacheError::ParseError(e) => write!(f, "JSON parse error: {}", e),
            TokenCacheError::ConfigDirNotFound => {
                write!(f, "Could not determine home directory")
            }
        }
    }
}

impl std::error::Error for TokenCacheError {}

impl From<std::io::Error> for TokenCacheError {
    fn from(e: std::io::Error) -> Self {
        TokenCacheError::IoError(e)
    }
}

impl From<serde_json::Error> for TokenCacheError {
    fn from(e: serde_json::Error) -> Self {
        TokenCacheError::ParseError(e)
    }
}

/// File-backed storage for the cached session artifact (session.json).
///
/// Responsibilities:
/// - Persist the current session's token bundle between runs
/// - Remove the artifact on sign-out or stale-session recovery
///
/// Does NOT:
/// - Validate or refresh tokens (the auth client's concern)
/// - Encrypt the artifact (plaintext JSON storage)
///
/// # Security Note
///
/// The session file should have appropriate permissions (e.g. 600) to
/// prevent unauthorized access; tokens are never logged.
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    /// Creates a TokenCache at the default path
    /// (`~/.config/securevault/session.json`).
    pub fn new() -> Result<Self, TokenCacheError> {
        let path = VaultPaths::session_file().map_err(|_| TokenCacheError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a TokenCache with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the cached session, if the artifact exists.
    pub fn load_session(&self) -> Result<Option<AuthSession>, TokenCacheError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let session = serde_json::from_str(&content)?;

        Ok(Some(session))
    }

    /// Persists the given session, replacing any previous artifact.
    pub fn save_session(&self, session: &AuthSession) -> Result<(), TokenCacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;

        Ok(())
    }

    /// Removes the artifact. Removing a missing artifact is not an error.
    pub fn clear_session(&self) -> Result<(), TokenCacheError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Returns the path to the session file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl TokenCacheStore for TokenCache {
    fn load(&self) -> anyhow::Result<Option<AuthSession>> {
        Ok(self.load_session()?)
    }

    fn save(&self, session: &AuthSession) -> anyhow::Result<()> {
        Ok(self.save_session(session)?)
    }

    fn clear(&self) -> anyhow::Result<()> {
        Ok(self.clear_session()?)
    }
}
