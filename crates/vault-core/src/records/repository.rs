//! Record repository traits.
//!
//! These traits define the contract for persisting platforms and accounts,
//! decoupling the stores from the specific transport (REST in production,
//! in-memory mocks in tests). All rows are scoped server-side to the
//! authenticated user; repositories never see other users' data.

use super::model::{Account, AccountChanges, NewAccount, NewPlatform, Platform, PlatformChanges};
use anyhow::Result;
use async_trait::async_trait;

/// An abstract repository for platform rows.
#[async_trait]
pub trait PlatformRepository: Send + Sync {
    /// Lists the user's platforms, ordered by name.
    async fn list(&self) -> Result<Vec<Platform>>;

    /// Inserts a platform and returns the stored row.
    async fn insert(&self, platform: NewPlatform) -> Result<Platform>;

    /// Applies a partial update and returns the updated row.
    async fn update(&self, id: &str, changes: PlatformChanges) -> Result<Platform>;

    /// Deletes a platform by id.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// An abstract repository for account rows.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Lists accounts ordered by name, optionally scoped to one platform.
    async fn list(&self, platform_id: Option<&str>) -> Result<Vec<Account>>;

    /// Inserts an account and returns the stored row.
    async fn insert(&self, account: NewAccount) -> Result<Account>;

    /// Applies a partial update and returns the updated row.
    async fn update(&self, id: &str, changes: AccountChanges) -> Result<Account>;

    /// Deletes an account by id.
    async fn delete(&self, id: &str) -> Result<()>;
}
