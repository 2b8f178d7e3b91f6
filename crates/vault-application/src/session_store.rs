//! Session store.
//!
//! Owns the in-memory session state for the client: resolves the initial
//! session check, applies the backend's push notifications in order, exposes
//! sign-in/sign-up/sign-out, and installs the stale-session interceptor for
//! its lifetime. The session value is the single piece of mutable shared
//! state in the lifecycle core and is mutated only here.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, broadcast, watch};
use tokio::task::JoinHandle;
use vault_core::auth::{
    AuthProvider, AuthSession, AuthUser, InterceptedResponse, InterceptorHandle,
    InterceptorRegistry, NetworkInterceptor, SessionState, SessionTransition, SignOutScope,
    TokenCacheStore, is_auth_request, is_stale_session_body,
};
use vault_core::error::Result;

/// Shared state cell: the session state plus a watch channel mirroring the
/// authenticated flag for consumers that arm on it (inactivity monitor).
struct SessionCell {
    state: RwLock<SessionState>,
    authenticated_tx: watch::Sender<bool>,
}

impl SessionCell {
    fn new() -> Self {
        let (authenticated_tx, _) = watch::channel(false);
        Self {
            state: RwLock::new(SessionState::Initializing),
            authenticated_tx,
        }
    }

    async fn apply(&self, transition: SessionTransition) {
        let mut state = self.state.write().await;
        let next = state.clone().apply(transition);
        let authenticated = next.is_authenticated();
        *state = next;
        drop(state);

        self.authenticated_tx.send_replace(authenticated);
    }

    async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }
}

/// Interceptor that recovers from stale-session responses.
///
/// When the backend answers an auth-surface request with "the referenced
/// session no longer exists", the local identity is cleared immediately;
/// the local-scope sign-out and artifact removal afterwards are best-effort
/// and their failures are swallowed.
struct StaleSessionInterceptor {
    cell: Arc<SessionCell>,
    provider: Arc<dyn AuthProvider>,
    cache: Arc<dyn TokenCacheStore>,
}

#[async_trait]
impl NetworkInterceptor for StaleSessionInterceptor {
    async fn inspect(&self, response: &InterceptedResponse) {
        if response.is_success() || !is_auth_request(&response.url) {
            return;
        }
        if !is_stale_session_body(&response.body) {
            return;
        }

        tracing::warn!("[SessionStore] Session not found, clearing user state");
        self.cell.apply(SessionTransition::SignedOut).await;

        if let Err(err) = self.provider.sign_out(SignOutScope::Local).await {
            tracing::warn!(
                "[SessionStore] Sign out failed (expected for invalid session): {}",
                err
            );
        }
        if let Err(err) = self.cache.clear() {
            tracing::warn!("[SessionStore] Failed to remove session artifact: {}", err);
        }
    }
}

/// The session store.
///
/// # Lifecycle
///
/// [`initialize`](Self::initialize) installs the interceptor, subscribes to
/// the auth-change stream, and resolves the initial session check exactly
/// once regardless of its outcome. [`shutdown`](Self::shutdown) uninstalls
/// the interceptor (restoring whatever was installed before) and stops the
/// listener; it is safe to call repeatedly.
pub struct SessionStore {
    cell: Arc<SessionCell>,
    provider: Arc<dyn AuthProvider>,
    cache: Arc<dyn TokenCacheStore>,
    interceptors: Arc<InterceptorRegistry>,
    interceptor_handle: Mutex<Option<InterceptorHandle>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SessionStore {
    /// Builds the store, wires it to the provider, and resolves the initial
    /// session check.
    pub async fn initialize(
        provider: Arc<dyn AuthProvider>,
        cache: Arc<dyn TokenCacheStore>,
        interceptors: Arc<InterceptorRegistry>,
    ) -> Arc<Self> {
        let cell = Arc::new(SessionCell::new());

        let store = Arc::new(Self {
            cell: cell.clone(),
            provider: provider.clone(),
            cache: cache.clone(),
            interceptors: interceptors.clone(),
            interceptor_handle: Mutex::new(None),
            listener: Mutex::new(None),
        });

        let handle = interceptors
            .install(Arc::new(StaleSessionInterceptor {
                cell: cell.clone(),
                provider: provider.clone(),
                cache,
            }))
            .await;
        *store.interceptor_handle.lock().await = Some(handle);

        let mut changes = provider.subscribe();
        let listener_cell = cell.clone();
        let listener = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) => {
                        listener_cell
                            .apply(SessionTransition::Notified(change.session))
                            .await;
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(
                            "[SessionStore] Missed {} auth change notifications",
                            missed
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        *store.listener.lock().await = Some(listener);

        // Initial session check. The loading flag resolves exactly once,
        // whether or not the check succeeds.
        match provider.get_session().await {
            Ok(session) => cell.apply(SessionTransition::Resolved(session)).await,
            Err(err) => {
                tracing::warn!("[SessionStore] Initial session check failed: {}", err);
                cell.apply(SessionTransition::Resolved(None)).await;
            }
        }

        tracing::info!("[SessionStore] Initialized");
        store
    }

    /// Returns the current session state.
    pub async fn state(&self) -> SessionState {
        self.cell.snapshot().await
    }

    /// Returns the current user, if a session is live.
    pub async fn user(&self) -> Option<AuthUser> {
        self.cell.snapshot().await.session().map(|s| s.user.clone())
    }

    /// Returns true while the initial session check is unresolved.
    pub async fn is_loading(&self) -> bool {
        self.cell.snapshot().await.is_loading()
    }

    /// Returns true if a session is live.
    pub async fn is_authenticated(&self) -> bool {
        self.cell.snapshot().await.is_authenticated()
    }

    /// Subscribes to the authenticated flag. The receiver sees the current
    /// value immediately and every change afterwards.
    pub fn watch_authenticated(&self) -> watch::Receiver<bool> {
        self.cell.authenticated_tx.subscribe()
    }

    /// Signs in with email and password.
    ///
    /// Expected auth failures come back as `Err(VaultError::Auth { .. })`
    /// and leave the state untouched.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        let session = self.provider.sign_in_with_password(email, password).await?;
        self.cell
            .apply(SessionTransition::SignedIn(session.clone()))
            .await;
        Ok(session)
    }

    /// Registers a new user and signs them in. Same contract as
    /// [`sign_in`](Self::sign_in). Password length requirements are enforced
    /// by the input layer, not here.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession> {
        let session = self.provider.sign_up(email, password).await?;
        self.cell
            .apply(SessionTransition::SignedIn(session.clone()))
            .await;
        Ok(session)
    }

    /// Signs out.
    ///
    /// Checks whether a session still exists server-side first: with none,
    /// local state is cleared and the call succeeds (idempotent sign-out).
    /// If the backend call itself fails, local state is cleared anyway so
    /// the UI never stays authenticated against a dead session; the failure
    /// is logged, not returned.
    pub async fn sign_out(&self) -> Result<()> {
        let existing = match self.provider.get_session().await {
            Ok(existing) => existing,
            Err(err) => {
                tracing::warn!(
                    "[SessionStore] Session check before sign out failed, treating as absent: {}",
                    err
                );
                None
            }
        };

        if existing.is_some() {
            if let Err(err) = self.provider.sign_out(SignOutScope::Global).await {
                tracing::warn!("[SessionStore] Sign out failed, clearing local state: {}", err);
            }
        }

        self.cell.apply(SessionTransition::SignedOut).await;
        if let Err(err) = self.cache.clear() {
            tracing::warn!("[SessionStore] Failed to remove session artifact: {}", err);
        }
        Ok(())
    }

    /// Tears the store down. Safe to call multiple times.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.interceptor_handle.lock().await.take() {
            self.interceptors.uninstall(handle).await;
        }
        if let Some(listener) = self.listener.lock().await.take() {
            listener.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use vault_core::auth::AuthStateChange;
    use vault_core::error::VaultError;

    struct MockAuthProvider {
        session: StdMutex<Option<AuthSession>>,
        sign_in_error: StdMutex<Option<VaultError>>,
        sign_out_error: StdMutex<Option<VaultError>>,
        sign_out_calls: AtomicUsize,
        changes: broadcast::Sender<AuthStateChange>,
    }

    impl MockAuthProvider {
        fn new(session: Option<AuthSession>) -> Arc<Self> {
            let (changes, _) = broadcast::channel(16);
            Arc::new(Self {
                session: StdMutex::new(session),
                sign_in_error: StdMutex::new(None),
                sign_out_error: StdMutex::new(None),
                sign_out_calls: AtomicUsize::new(0),
                changes,
            })
        }

        fn set_sign_in_error(&self, err: VaultError) {
            *self.sign_in_error.lock().unwrap() = Some(err);
        }

        fn set_sign_out_error(&self, err: VaultError) {
            *self.sign_out_error.lock().unwrap() = Some(err);
        }

        fn emit(&self, change: AuthStateChange) {
            let _ = self.changes.send(change);
        }

        fn sign_outs(&self) -> usize {
            self.sign_out_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AuthProvider for MockAuthProvider {
        async fn get_session(&self) -> Result<Option<AuthSession>> {
            Ok(self.session.lock().unwrap().clone())
        }

        async fn sign_in_with_password(&self, _: &str, _: &str) -> Result<AuthSession> {
            if let Some(err) = self.sign_in_error.lock().unwrap().clone() {
                return Err(err);
            }
            let session = test_session("signed-in");
            *self.session.lock().unwrap() = Some(session.clone());
            Ok(session)
        }

        async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession> {
            self.sign_in_with_password(email, password).await
        }

        async fn sign_out(&self, _scope: SignOutScope) -> Result<()> {
            self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.sign_out_error.lock().unwrap().clone() {
                return Err(err);
            }
            *self.session.lock().unwrap() = None;
            Ok(())
        }

        async fn get_user(&self) -> Result<Option<AuthUser>> {
            Ok(self.get_session().await?.map(|s| s.user))
        }

        fn subscribe(&self) -> broadcast::Receiver<AuthStateChange> {
            self.changes.subscribe()
        }
    }

    struct MockTokenCache {
        session: StdMutex<Option<AuthSession>>,
        clear_calls: AtomicUsize,
    }

    impl MockTokenCache {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                session: StdMutex::new(None),
                clear_calls: AtomicUsize::new(0),
            })
        }

        fn clears(&self) -> usize {
            self.clear_calls.load(Ordering::SeqCst)
        }
    }

    impl TokenCacheStore for MockTokenCache {
        fn load(&self) -> anyhow::Result<Option<AuthSession>> {
            Ok(self.session.lock().unwrap().clone())
        }

        fn save(&self, session: &AuthSession) -> anyhow::Result<()> {
            *self.session.lock().unwrap() = Some(session.clone());
            Ok(())
        }

        fn clear(&self) -> anyhow::Result<()> {
            self.clear_calls.fetch_add(1, Ordering::SeqCst);
            *self.session.lock().unwrap() = None;
            Ok(())
        }
    }

    fn test_session(id: &str) -> AuthSession {
        AuthSession {
            access_token: format!("access-{id}"),
            refresh_token: format!("refresh-{id}"),
            token_type: "bearer".to_string(),
            expires_at: None,
            user: AuthUser {
                id: id.to_string(),
                email: format!("{id}@example.com"),
                created_at: None,
            },
        }
    }

    fn stale_response() -> InterceptedResponse {
        InterceptedResponse {
            url: "https://db.example.co/auth/v1/user".to_string(),
            status: 403,
            body: r#"{"code":"session_not_found","message":"Session not found"}"#.to_string(),
        }
    }

    async fn init_store(
        provider: Arc<MockAuthProvider>,
        cache: Arc<MockTokenCache>,
    ) -> (Arc<SessionStore>, Arc<InterceptorRegistry>) {
        let registry = Arc::new(InterceptorRegistry::new());
        let store = SessionStore::initialize(provider, cache, registry.clone()).await;
        (store, registry)
    }

    #[tokio::test]
    async fn test_initialize_resolves_loading_without_session() {
        let (store, _) = init_store(MockAuthProvider::new(None), MockTokenCache::new()).await;

        assert!(!store.is_loading().await);
        assert_eq!(store.state().await, SessionState::Unauthenticated);
        assert!(!*store.watch_authenticated().borrow());
    }

    #[tokio::test]
    async fn test_initialize_restores_existing_session() {
        let provider = MockAuthProvider::new(Some(test_session("restored")));
        let (store, _) = init_store(provider, MockTokenCache::new()).await;

        assert!(store.is_authenticated().await);
        assert_eq!(store.user().await.unwrap().id, "restored");
        assert!(*store.watch_authenticated().borrow());
    }

    #[tokio::test]
    async fn test_sign_in_success_and_failure() {
        let provider = MockAuthProvider::new(None);
        let (store, _) = init_store(provider.clone(), MockTokenCache::new()).await;

        let session = store.sign_in("user@example.com", "password").await.unwrap();
        assert_eq!(session.user.id, "signed-in");
        assert!(store.is_authenticated().await);

        store.sign_out().await.unwrap();
        provider.set_sign_in_error(VaultError::auth(
            "invalid_credentials",
            "Invalid login credentials",
        ));

        let err = store.sign_in("user@example.com", "wrong").await.unwrap_err();
        assert!(err.is_auth());
        // A rejected sign-in leaves the state untouched.
        assert_eq!(store.state().await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_sign_out_without_session_is_idempotent() {
        let provider = MockAuthProvider::new(None);
        let cache = MockTokenCache::new();
        let (store, _) = init_store(provider.clone(), cache.clone()).await;

        store.sign_out().await.unwrap();

        assert_eq!(store.state().await, SessionState::Unauthenticated);
        // No server-side session existed, so no sign-out call was made.
        assert_eq!(provider.sign_outs(), 0);
        assert!(cache.clears() > 0);
    }

    #[tokio::test]
    async fn test_two_rapid_sign_outs_settle_unauthenticated() {
        let provider = MockAuthProvider::new(Some(test_session("a")));
        let (store, _) = init_store(provider.clone(), MockTokenCache::new()).await;

        store.sign_out().await.unwrap();
        store.sign_out().await.unwrap();

        assert_eq!(store.state().await, SessionState::Unauthenticated);
        // The second call found no session and skipped the backend.
        assert_eq!(provider.sign_outs(), 1);
    }

    #[tokio::test]
    async fn test_failed_sign_out_still_clears_local_state() {
        let provider = MockAuthProvider::new(Some(test_session("a")));
        provider.set_sign_out_error(VaultError::network("connection reset"));
        let cache = MockTokenCache::new();
        let (store, _) = init_store(provider.clone(), cache.clone()).await;

        store.sign_out().await.unwrap();

        assert_eq!(store.state().await, SessionState::Unauthenticated);
        assert!(cache.clears() > 0);
    }

    #[tokio::test]
    async fn test_notifications_applied_in_order() {
        let provider = MockAuthProvider::new(None);
        let (store, _) = init_store(provider.clone(), MockTokenCache::new()).await;

        provider.emit(AuthStateChange::signed_in(test_session("pushed")));
        provider.emit(AuthStateChange::signed_out());
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(store.state().await, SessionState::Unauthenticated);

        provider.emit(AuthStateChange::signed_in(test_session("pushed-2")));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(store.user().await.unwrap().id, "pushed-2");
    }

    #[tokio::test]
    async fn test_stale_session_response_forces_unauthenticated() {
        let provider = MockAuthProvider::new(Some(test_session("a")));
        let cache = MockTokenCache::new();
        let (store, registry) = init_store(provider.clone(), cache.clone()).await;
        assert!(store.is_authenticated().await);

        registry.notify(&stale_response()).await;

        assert_eq!(store.state().await, SessionState::Unauthenticated);
        assert_eq!(provider.sign_outs(), 1);
        assert!(cache.clears() > 0);
    }

    #[tokio::test]
    async fn test_stale_session_recovery_survives_failing_cleanup() {
        let provider = MockAuthProvider::new(Some(test_session("a")));
        provider.set_sign_out_error(VaultError::auth(
            "session_not_found",
            "Session not found",
        ));
        let cache = MockTokenCache::new();
        let (store, registry) = init_store(provider.clone(), cache.clone()).await;

        registry.notify(&stale_response()).await;

        // The identity is cleared no matter what the best-effort cleanup did.
        assert_eq!(store.state().await, SessionState::Unauthenticated);
        assert!(cache.clears() > 0);
    }

    #[tokio::test]
    async fn test_non_stale_auth_errors_pass_through() {
        let provider = MockAuthProvider::new(Some(test_session("a")));
        let (store, registry) = init_store(provider.clone(), MockTokenCache::new()).await;

        registry
            .notify(&InterceptedResponse {
                url: "https://db.example.co/auth/v1/token".to_string(),
                status: 400,
                body: r#"{"code":"invalid_credentials","message":"Invalid login credentials"}"#
                    .to_string(),
            })
            .await;

        assert!(store.is_authenticated().await);
        assert_eq!(provider.sign_outs(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_uninstalls_interceptor_and_is_idempotent() {
        let provider = MockAuthProvider::new(Some(test_session("a")));
        let (store, registry) = init_store(provider.clone(), MockTokenCache::new()).await;

        store.shutdown().await;
        store.shutdown().await;

        assert!(!registry.is_installed().await);

        // Responses observed after teardown no longer affect the store.
        registry.notify(&stale_response()).await;
        assert!(store.is_authenticated().await);
    }
}
