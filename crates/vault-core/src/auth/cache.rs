//! Token cache trait.
//!
//! Defines the interface for the locally persisted session artifact (the
//! browser-storage analogue). The cache is best-effort: session recovery
//! must work when it is missing, and clearing it must never be fatal.

use super::model::AuthSession;
use anyhow::Result;

/// Local persistence for the current session's token bundle.
///
/// Implementations should treat the cached artifact as disposable: it can be
/// removed at any time (by a stale-session recovery, another process, or the
/// user) without breaking the client beyond requiring a fresh sign-in.
pub trait TokenCacheStore: Send + Sync {
    /// Loads the cached session, if one is stored.
    fn load(&self) -> Result<Option<AuthSession>>;

    /// Persists the given session, replacing any previous artifact.
    fn save(&self, session: &AuthSession) -> Result<()>;

    /// Removes the cached artifact. Removing a missing artifact is not an
    /// error.
    fn clear(&self) -> Result<()>;
}
