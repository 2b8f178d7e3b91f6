//! Unified path management for SecureVault configuration files.
//!
//! All configuration and the cached session artifact live under the
//! platform config directory (e.g. `~/.config/securevault/` on Linux).

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for SecureVault.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/securevault/       # Config directory
/// ├── config.toml              # Backend connection settings
/// └── session.json             # Cached session token artifact
/// ```
pub struct VaultPaths;

impl VaultPaths {
    /// Returns the SecureVault configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("securevault"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the cached session artifact.
    pub fn session_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("session.json"))
    }
}
