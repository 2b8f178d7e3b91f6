//! REST-backed platform repository.

use crate::table_client::TableClient;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use vault_core::records::{NewPlatform, Platform, PlatformChanges, PlatformRepository};

const TABLE: &str = "platforms";

/// Platform repository over the backend's table surface.
///
/// Rows are scoped to the authenticated user by row-level security; the
/// repository itself never filters on `user_id`.
pub struct RestPlatformRepository {
    client: Arc<TableClient>,
}

impl RestPlatformRepository {
    pub fn new(client: Arc<TableClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PlatformRepository for RestPlatformRepository {
    async fn list(&self) -> Result<Vec<Platform>> {
        let query = vec![
            ("select".to_string(), "*".to_string()),
            ("order".to_string(), "name.asc".to_string()),
        ];
        Ok(self.client.select(TABLE, &query).await?)
    }

    async fn insert(&self, platform: NewPlatform) -> Result<Platform> {
        Ok(self.client.insert(TABLE, &platform).await?)
    }

    async fn update(&self, id: &str, changes: PlatformChanges) -> Result<Platform> {
        Ok(self.client.update(TABLE, id, &changes).await?)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        Ok(self.client.delete(TABLE, id).await?)
    }
}
