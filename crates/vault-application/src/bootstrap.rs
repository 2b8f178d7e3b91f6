//! Application wiring.
//!
//! Composes configuration, the backend clients, the session store, and the
//! inactivity monitor into one handle a view layer can drive. Session-state
//! changes arm and disarm the monitor automatically.

use crate::accounts_store::AccountsStore;
use crate::platforms_store::PlatformsStore;
use crate::session_store::SessionStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use vault_backend::{
    RestAccountRepository, RestAuthClient, RestPlatformRepository, TableClient, TokenCache,
    load_config,
};
use vault_core::auth::{AuthProvider, InterceptorRegistry, TokenCacheStore};
use vault_core::config::VaultConfig;
use vault_core::error::{Result, VaultError};
use vault_core::idle::{ActivityKind, InactivityMonitor, SuppressionPolicy};

/// Fully wired application core.
///
/// Owns the session store, the inactivity monitor, and the shared backend
/// clients; hands out per-view data stores on demand.
pub struct VaultApp {
    provider: Arc<dyn AuthProvider>,
    tables: Arc<TableClient>,
    pub session: Arc<SessionStore>,
    pub monitor: Arc<InactivityMonitor>,
    monitor_link: Mutex<Option<JoinHandle<()>>>,
}

impl VaultApp {
    /// Bootstraps from the default configuration sources and token cache
    /// location.
    pub async fn bootstrap() -> Result<Self> {
        let config = load_config()?;
        let cache = TokenCache::new().map_err(|err| VaultError::config(err.to_string()))?;
        Ok(Self::assemble(config, Arc::new(cache), SuppressionPolicy::default()).await)
    }

    /// Assembles the application core from explicit parts.
    pub async fn assemble(
        config: VaultConfig,
        cache: Arc<dyn TokenCacheStore>,
        policy: SuppressionPolicy,
    ) -> Self {
        let interceptors = Arc::new(InterceptorRegistry::new());
        let provider: Arc<dyn AuthProvider> = Arc::new(RestAuthClient::new(
            config.clone(),
            cache.clone(),
            interceptors.clone(),
        ));
        let tables = Arc::new(TableClient::new(config, cache.clone()));

        let session = SessionStore::initialize(provider.clone(), cache, interceptors).await;

        let monitor = Arc::new(InactivityMonitor::new(provider.clone(), policy));
        monitor.set_authenticated(session.is_authenticated().await);

        // Keep the monitor in lockstep with the session: armed while a
        // session is live, disarmed the moment it ends.
        let mut authenticated = session.watch_authenticated();
        let linked_monitor = monitor.clone();
        let monitor_link = tokio::spawn(async move {
            while authenticated.changed().await.is_ok() {
                let is_authenticated = *authenticated.borrow();
                linked_monitor.set_authenticated(is_authenticated);
            }
        });

        Self {
            provider,
            tables,
            session,
            monitor,
            monitor_link: Mutex::new(Some(monitor_link)),
        }
    }

    /// Builds a platforms store over the shared backend client.
    pub fn platforms(&self) -> PlatformsStore {
        PlatformsStore::new(
            Arc::new(RestPlatformRepository::new(self.tables.clone())),
            self.provider.clone(),
        )
    }

    /// Builds an accounts store, optionally scoped to one platform.
    pub fn accounts(&self, platform_id: Option<String>) -> AccountsStore {
        AccountsStore::new(
            Arc::new(RestAccountRepository::new(self.tables.clone())),
            platform_id,
        )
    }

    /// Feeds a user interaction into the inactivity monitor.
    pub fn record_activity(&self, kind: ActivityKind) {
        self.monitor.record_activity(kind);
    }

    /// Tears the application core down. Safe to call multiple times.
    pub async fn shutdown(&self) {
        self.session.shutdown().await;
        self.monitor.shutdown();
        if let Some(link) = self.monitor_link.lock().await.take() {
            link.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;
    use vault_core::auth::{AuthSession, AuthUser};

    fn offline_config() -> VaultConfig {
        // Unreachable on purpose: assembly must not require the network.
        VaultConfig::new("http://127.0.0.1:1", "anon-key")
    }

    fn cached_session() -> AuthSession {
        AuthSession {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            token_type: "bearer".to_string(),
            expires_at: Some(chrono::Utc::now().timestamp() + 3600),
            user: AuthUser {
                id: "user-1".to_string(),
                email: "user@example.com".to_string(),
                created_at: None,
            },
        }
    }

    #[tokio::test]
    async fn test_assemble_without_cached_session() {
        let temp_dir = TempDir::new().unwrap();
        let cache = Arc::new(TokenCache::with_path(temp_dir.path().join("session.json")));

        let app = VaultApp::assemble(offline_config(), cache, SuppressionPolicy::default()).await;

        assert!(!app.session.is_loading().await);
        assert!(!app.session.is_authenticated().await);
        assert!(!app.monitor.is_armed());

        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_assemble_restores_cached_session_and_arms_monitor() {
        let temp_dir = TempDir::new().unwrap();
        let cache = TokenCache::with_path(temp_dir.path().join("session.json"));
        cache.save_session(&cached_session()).unwrap();

        let app = VaultApp::assemble(
            offline_config(),
            Arc::new(cache),
            SuppressionPolicy::default(),
        )
        .await;

        assert!(app.session.is_authenticated().await);
        assert_eq!(app.session.user().await.unwrap().id, "user-1");
        assert!(app.monitor.is_armed());

        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_sign_out_disarms_monitor() {
        let temp_dir = TempDir::new().unwrap();
        let cache = TokenCache::with_path(temp_dir.path().join("session.json"));
        cache.save_session(&cached_session()).unwrap();

        let app = VaultApp::assemble(
            offline_config(),
            Arc::new(cache),
            SuppressionPolicy::default(),
        )
        .await;
        assert!(app.monitor.is_armed());

        // The backend is unreachable, but local state still clears and the
        // monitor follows it down.
        app.session.sign_out().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(!app.session.is_authenticated().await);
        assert!(!app.monitor.is_armed());

        app.shutdown().await;
    }
}
