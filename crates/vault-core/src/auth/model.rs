//! Authentication domain models.
//!
//! This module contains the identity types owned by the backend's auth
//! surface: the authenticated user, the session (token bundle), and the
//! auth-state-change notifications the backend pushes to subscribers.

use serde::{Deserialize, Serialize};

/// The authenticated user as known to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Unique user identifier (UUID format)
    pub id: String,
    /// The user's email address
    pub email: String,
    /// Timestamp when the user was created (ISO 8601 format)
    #[serde(default)]
    pub created_at: Option<String>,
}

/// The authenticated-identity record for the current client.
///
/// Token fields are opaque strings owned by the backend; this crate only
/// inspects `expires_at` to decide when a refresh is due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Bearer token for authenticated requests
    pub access_token: String,
    /// Token used to obtain a new access token after expiry
    pub refresh_token: String,
    /// Token type reported by the backend (always "bearer" in practice)
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Unix timestamp at which the access token expires, when known
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// The user this session belongs to
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl AuthSession {
    /// Returns true if the access token is expired (or expires within the
    /// given margin). Sessions without a known expiry are treated as live.
    pub fn is_expired_within(&self, margin_secs: i64) -> bool {
        match self.expires_at {
            Some(at) => chrono::Utc::now().timestamp() + margin_secs >= at,
            None => false,
        }
    }
}

/// The kind of auth-state change the backend notified us about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthChangeEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// A single auth-state-change notification.
///
/// Notifications are delivered in the order the backend emits them; the
/// session payload is `None` for sign-out notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthStateChange {
    pub event: AuthChangeEvent,
    pub session: Option<AuthSession>,
}

impl AuthStateChange {
    /// Notification for a completed sign-in.
    pub fn signed_in(session: AuthSession) -> Self {
        Self {
            event: AuthChangeEvent::SignedIn,
            session: Some(session),
        }
    }

    /// Notification for a completed sign-out.
    pub fn signed_out() -> Self {
        Self {
            event: AuthChangeEvent::SignedOut,
            session: None,
        }
    }

    /// Notification for a silent token refresh.
    pub fn token_refreshed(session: AuthSession) -> Self {
        Self {
            event: AuthChangeEvent::TokenRefreshed,
            session: Some(session),
        }
    }
}
