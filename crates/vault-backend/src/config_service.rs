//! Backend configuration loading.
//!
//! Configuration priority: `~/.config/securevault/config.toml`, then the
//! `SUPABASE_URL` / `SUPABASE_ANON_KEY` environment variables. Missing
//! configuration is a hard error; the client never starts half-configured.

use crate::paths::VaultPaths;
use serde::Deserialize;
use std::env;
use std::path::Path;
use vault_core::config::VaultConfig;
use vault_core::error::{Result, VaultError};

/// Environment variable holding the backend project URL.
pub const ENV_BACKEND_URL: &str = "SUPABASE_URL";

/// Environment variable holding the publishable anon key.
pub const ENV_ANON_KEY: &str = "SUPABASE_ANON_KEY";

#[derive(Debug, Deserialize)]
struct ConfigFile {
    backend: BackendSection,
}

#[derive(Debug, Deserialize)]
struct BackendSection {
    url: String,
    anon_key: String,
}

/// Loads the backend configuration.
///
/// Priority:
/// 1. `~/.config/securevault/config.toml`
/// 2. Environment variables (`SUPABASE_URL`, `SUPABASE_ANON_KEY`)
///
/// # Errors
///
/// Returns a `Config` error if neither source provides both values, or a
/// `Serialization` error for an unparseable config file.
pub fn load_config() -> Result<VaultConfig> {
    if let Ok(path) = VaultPaths::config_file() {
        if path.exists() {
            return load_config_from(&path);
        }
    }

    match (env::var(ENV_BACKEND_URL), env::var(ENV_ANON_KEY)) {
        (Ok(url), Ok(anon_key)) => Ok(VaultConfig::new(url, anon_key)),
        _ => Err(VaultError::config(format!(
            "Missing backend configuration: set {ENV_BACKEND_URL} and {ENV_ANON_KEY} \
             or create config.toml"
        ))),
    }
}

/// Loads the backend configuration from a specific TOML file.
pub fn load_config_from(path: &Path) -> Result<VaultConfig> {
    let content = std::fs::read_to_string(path)?;
    let file: ConfigFile = toml::from_str(&content)?;
    Ok(VaultConfig::new(file.backend.url, file.backend.anon_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[backend]
url = "https://db.example.co"
anon_key = "anon-123"
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.backend_url, "https://db.example.co");
        assert_eq!(config.anon_key, "anon-123");
    }

    #[test]
    fn test_invalid_file_is_a_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "backend = 1").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, VaultError::Serialization { .. }));
    }
}
