//! Auth provider trait.
//!
//! Defines the interface to the hosted backend's authentication surface.
//! The backend is treated as an opaque capability: it owns all token
//! material, persistence, and revocation; this crate only consumes the
//! operations below.

use super::model::{AuthSession, AuthStateChange, AuthUser};
use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Scope of a sign-out request.
///
/// `Global` revokes the session server-side for every client; `Local` only
/// discards this client's copy of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutScope {
    Global,
    Local,
}

impl SignOutScope {
    /// The wire representation used by the backend's logout endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignOutScope::Global => "global",
            SignOutScope::Local => "local",
        }
    }
}

/// An abstract provider for the backend's authentication operations.
///
/// This trait decouples the session stores from the concrete transport
/// (REST client in production, mocks in tests).
///
/// # Error contract
///
/// Expected authentication failures (bad credentials, stale sessions) are
/// returned as `VaultError::Auth`; implementations must never panic on them.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns the current session, if one exists.
    ///
    /// Implementations restore the session from their local token cache and
    /// transparently refresh an expired access token. A session the backend
    /// no longer recognizes resolves to `Ok(None)`, not an error.
    async fn get_session(&self) -> Result<Option<AuthSession>>;

    /// Exchanges credentials for a session.
    ///
    /// # Returns
    ///
    /// - `Ok(session)`: the backend accepted the credentials
    /// - `Err(VaultError::Auth { .. })`: the backend rejected them
    /// - `Err(_)`: transport failure
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Registers a new user and signs them in.
    ///
    /// Same contract as [`sign_in_with_password`](Self::sign_in_with_password).
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Ends the current session.
    ///
    /// # Arguments
    ///
    /// * `scope` - `Global` to revoke server-side, `Local` to only discard
    ///   this client's session
    async fn sign_out(&self, scope: SignOutScope) -> Result<()>;

    /// Returns the current user identity, if a session exists.
    async fn get_user(&self) -> Result<Option<AuthUser>>;

    /// Subscribes to the push-based auth-state-change stream.
    ///
    /// Notifications are delivered in the order the provider emits them.
    fn subscribe(&self) -> broadcast::Receiver<AuthStateChange>;
}
