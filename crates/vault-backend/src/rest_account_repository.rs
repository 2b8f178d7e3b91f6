//! REST-backed account repository.

use crate::table_client::TableClient;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use vault_core::records::{Account, AccountChanges, AccountRepository, NewAccount};

const TABLE: &str = "accounts";

/// Account repository over the backend's table surface.
pub struct RestAccountRepository {
    client: Arc<TableClient>,
}

impl RestAccountRepository {
    pub fn new(client: Arc<TableClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AccountRepository for RestAccountRepository {
    async fn list(&self, platform_id: Option<&str>) -> Result<Vec<Account>> {
        let mut query = vec![
            ("select".to_string(), "*".to_string()),
            ("order".to_string(), "name.asc".to_string()),
        ];
        if let Some(platform_id) = platform_id {
            query.push(("platform_id".to_string(), format!("eq.{platform_id}")));
        }
        Ok(self.client.select(TABLE, &query).await?)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account> {
        Ok(self.client.insert(TABLE, &account).await?)
    }

    async fn update(&self, id: &str, changes: AccountChanges) -> Result<Account> {
        Ok(self.client.update(TABLE, id, &changes).await?)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        Ok(self.client.delete(TABLE, id).await?)
    }
}
