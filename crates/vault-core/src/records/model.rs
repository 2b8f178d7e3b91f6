//! Stored record models.
//!
//! Platforms group related accounts (one per external service); accounts are
//! the stored credential sets. Both are persisted by the backend and mirrored
//! into in-memory lists client-side; row shapes match the backend's tables.

use serde::{Deserialize, Serialize};

/// A user-defined category grouping related accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Unique platform identifier (UUID format)
    pub id: String,
    /// Owning user (row-level security key)
    pub user_id: String,
    /// Display name, unique per user in practice
    pub name: String,
    /// Icon slug rendered by the view layer
    pub icon: String,
    /// Accent color as a hex string
    pub color: String,
    /// Timestamp when the row was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the row was last updated (ISO 8601 format)
    pub updated_at: String,
}

/// A stored credential set belonging to exactly one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account identifier (UUID format)
    pub id: String,
    /// The platform this account belongs to
    pub platform_id: String,
    /// Display name for the account
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub notes: String,
    /// Timestamp when the row was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the row was last updated (ISO 8601 format)
    pub updated_at: String,
}

/// Insert payload for a platform. The backend assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlatform {
    pub user_id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
}

/// Partial update for a platform; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Insert payload for an account. The backend assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    pub platform_id: String,
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub notes: String,
}

/// Partial update for an account; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
