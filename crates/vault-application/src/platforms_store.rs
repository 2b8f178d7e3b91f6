//! Platforms store.
//!
//! Mirrors the user's platforms into an in-memory list ordered by name and
//! keeps it consistent with the backend: explicit refetch, optimistic patch
//! after each successful mutation, untouched on failure.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use vault_core::auth::AuthProvider;
use vault_core::error::{Result, VaultError};
use vault_core::records::{NewPlatform, Platform, PlatformChanges, PlatformRepository};

/// Cached list of the user's platforms plus create/update/delete operations.
///
/// List membership reflects only successful server operations: a failed
/// mutation leaves the cached list exactly as it was.
pub struct PlatformsStore {
    repository: Arc<dyn PlatformRepository>,
    provider: Arc<dyn AuthProvider>,
    platforms: RwLock<Vec<Platform>>,
    loading: AtomicBool,
}

impl PlatformsStore {
    pub fn new(repository: Arc<dyn PlatformRepository>, provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            repository,
            provider,
            platforms: RwLock::new(Vec::new()),
            loading: AtomicBool::new(true),
        }
    }

    /// Fetches the list from the backend, replacing the cache on success.
    pub async fn refetch(&self) -> Result<Vec<Platform>> {
        let result = self.repository.list().await;
        self.loading.store(false, Ordering::SeqCst);

        match result {
            Ok(rows) => {
                *self.platforms.write().await = rows.clone();
                Ok(rows)
            }
            Err(err) => {
                tracing::error!("[PlatformsStore] Failed to fetch platforms: {}", err);
                Err(err.into())
            }
        }
    }

    /// Returns a snapshot of the cached list.
    pub async fn platforms(&self) -> Vec<Platform> {
        self.platforms.read().await.clone()
    }

    /// Returns true until the first fetch has completed.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Creates a platform owned by the current user and appends the stored
    /// row to the cached list.
    ///
    /// # Errors
    ///
    /// Fails with an auth error when no user is signed in; the cached list
    /// is left untouched on any failure.
    pub async fn create(
        &self,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<Platform> {
        let user = self
            .provider
            .get_user()
            .await?
            .ok_or_else(|| VaultError::auth_message("No authenticated user"))?;

        let row = self
            .repository
            .insert(NewPlatform {
                user_id: user.id,
                name: name.into(),
                icon: icon.into(),
                color: color.into(),
            })
            .await
            .map_err(VaultError::from)?;

        self.platforms.write().await.push(row.clone());
        Ok(row)
    }

    /// Applies a partial update and patches the cached row in place.
    pub async fn update(&self, id: &str, changes: PlatformChanges) -> Result<Platform> {
        let row = self
            .repository
            .update(id, changes)
            .await
            .map_err(VaultError::from)?;

        let mut platforms = self.platforms.write().await;
        if let Some(slot) = platforms.iter_mut().find(|p| p.id == id) {
            *slot = row.clone();
        }
        Ok(row)
    }

    /// Deletes a platform and drops it from the cached list.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repository.delete(id).await.map_err(VaultError::from)?;

        self.platforms.write().await.retain(|p| p.id != id);
        Ok(())
    }
}
