//! Backend configuration model.

use serde::{Deserialize, Serialize};

/// Connection settings for the hosted backend.
///
/// Both values are required: the client fails fast on missing configuration
/// rather than starting half-wired. The anon key is a publishable key, not a
/// secret, but it is still kept out of logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Base URL of the backend project (e.g. `https://xyz.supabase.co`)
    pub backend_url: String,
    /// Publishable anon key sent with every request
    pub anon_key: String,
}

impl VaultConfig {
    pub fn new(backend_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            anon_key: anon_key.into(),
        }
    }

    /// Base URL of the authentication surface.
    pub fn auth_base(&self) -> String {
        format!("{}/auth/v1", self.backend_url.trim_end_matches('/'))
    }

    /// Base URL of the table query surface.
    pub fn rest_base(&self) -> String {
        format!("{}/rest/v1", self.backend_url.trim_end_matches('/'))
    }
}
