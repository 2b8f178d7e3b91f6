//! Low-level table query client.
//!
//! Thin wrapper over the backend's row-filtered table surface
//! (`/rest/v1/{table}`): select with filters and ordering, insert/update
//! returning the affected row, and delete. Row-level security is enforced
//! server-side from the bearer token; this client only attaches it.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use vault_core::auth::TokenCacheStore;
use vault_core::config::VaultConfig;
use vault_core::error::{Result, VaultError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Accept header asking the backend for a single object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Client for the backend's table query/mutation surface.
pub struct TableClient {
    http: Client,
    config: VaultConfig,
    cache: Arc<dyn TokenCacheStore>,
}

impl TableClient {
    pub fn new(config: VaultConfig, cache: Arc<dyn TokenCacheStore>) -> Self {
        Self {
            http: Client::new(),
            config,
            cache,
        }
    }

    /// Bearer token for the current request: the cached session's access
    /// token when present, the anon key otherwise (row-level security then
    /// yields no rows rather than an auth failure).
    fn bearer(&self) -> String {
        self.cache
            .load()
            .ok()
            .flatten()
            .map(|session| session.access_token)
            .unwrap_or_else(|| self.config.anon_key.clone())
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.config.rest_base(), table)
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<(StatusCode, String)> {
        let response = request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(self.bearer())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|err| VaultError::network(format!("Table request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| VaultError::network(format!("Failed to read table response: {err}")))?;

        Ok((status, body))
    }

    /// Fetches rows matching the query parameters.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(String, String)],
    ) -> Result<Vec<T>> {
        let request = self.http.get(self.table_url(table)).query(query);
        let (status, body) = self.execute(request).await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Inserts one row and returns the stored representation.
    pub async fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        row: &impl Serialize,
    ) -> Result<T> {
        let request = self
            .http
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .header("Accept", SINGLE_OBJECT)
            .json(row);

        let (status, body) = self.execute(request).await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Applies a partial update to the row with the given id and returns the
    /// updated representation.
    pub async fn update<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
        changes: &impl Serialize,
    ) -> Result<T> {
        let request = self
            .http
            .patch(self.table_url(table))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .header("Accept", SINGLE_OBJECT)
            .json(changes);

        let (status, body) = self.execute(request).await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Deletes the row with the given id.
    pub async fn delete(&self, table: &str, id: &str) -> Result<()> {
        let request = self
            .http
            .delete(self.table_url(table))
            .query(&[("id", format!("eq.{id}"))]);

        let (status, body) = self.execute(request).await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(())
    }
}

fn api_error(status: StatusCode, body: &str) -> VaultError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body.to_string()
            }
        });

    VaultError::api(status.as_u16(), message)
}
