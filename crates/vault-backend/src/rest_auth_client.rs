//! RestAuthClient - REST implementation of the backend auth surface.
//!
//! Talks to the hosted backend's auth endpoints (`/auth/v1/*`) directly:
//! password grant, signup, logout, user lookup, and refresh-token exchange.
//! The client owns the local token artifact and the auth-state-change
//! broadcast, and offers every failed auth-surface response to the
//! interceptor registry before mapping it to an error.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use vault_core::auth::{
    AuthProvider, AuthSession, AuthStateChange, AuthUser, InterceptedResponse,
    InterceptorRegistry, SignOutScope, TokenCacheStore, is_auth_request,
};
use vault_core::config::VaultConfig;
use vault_core::error::{Result, VaultError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Access tokens expiring within this margin are refreshed eagerly.
const EXPIRY_MARGIN_SECS: i64 = 30;

/// Capacity of the auth-state-change broadcast channel.
const CHANGE_CHANNEL_CAPACITY: usize = 32;

/// Auth client that talks to the hosted backend over REST.
pub struct RestAuthClient {
    http: Client,
    config: VaultConfig,
    cache: Arc<dyn TokenCacheStore>,
    interceptors: Arc<InterceptorRegistry>,
    changes: broadcast::Sender<AuthStateChange>,
}

impl RestAuthClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `config` - backend URL and anon key
    /// * `cache` - local persistence for the session artifact
    /// * `interceptors` - registry observing failed auth-surface responses
    pub fn new(
        config: VaultConfig,
        cache: Arc<dyn TokenCacheStore>,
        interceptors: Arc<InterceptorRegistry>,
    ) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            http: Client::new(),
            config,
            cache,
            interceptors,
            changes,
        }
    }

    fn emit(&self, change: AuthStateChange) {
        // Nobody subscribed yet is fine; the send just drops.
        let _ = self.changes.send(change);
    }

    fn persist(&self, session: &AuthSession) {
        if let Err(err) = self.cache.save(session) {
            tracing::warn!("[RestAuthClient] Failed to persist session artifact: {}", err);
        }
    }

    fn discard_artifact(&self) {
        if let Err(err) = self.cache.clear() {
            tracing::warn!("[RestAuthClient] Failed to clear session artifact: {}", err);
        }
    }

    /// Sends an auth-surface request and returns the raw status and body.
    ///
    /// Failed responses are offered to the interceptor registry before being
    /// handed back; the response itself is never altered by interception.
    async fn execute_auth(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<(StatusCode, String)> {
        let response = request
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|err| VaultError::network(format!("Auth request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| VaultError::network(format!("Failed to read auth response: {err}")))?;

        if is_auth_request(url) && !status.is_success() {
            self.interceptors
                .notify(&InterceptedResponse {
                    url: url.to_string(),
                    status: status.as_u16(),
                    body: body.clone(),
                })
                .await;
        }

        Ok((status, body))
    }

    async fn token_request(&self, grant_type: &str, payload: &serde_json::Value) -> Result<AuthSession> {
        let url = format!("{}/token?grant_type={}", self.config.auth_base(), grant_type);
        let request = self
            .http
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .json(payload);

        let (status, body) = self.execute_auth(request, &url).await?;
        if !status.is_success() {
            return Err(parse_auth_error(status, &body));
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        Ok(token.into_session())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession> {
        let session = self
            .token_request("refresh_token", &json!({ "refresh_token": refresh_token }))
            .await?;

        self.persist(&session);
        self.emit(AuthStateChange::token_refreshed(session.clone()));
        Ok(session)
    }
}

#[async_trait]
impl AuthProvider for RestAuthClient {
    async fn get_session(&self) -> Result<Option<AuthSession>> {
        let cached = match self.cache.load() {
            Ok(cached) => cached,
            Err(err) => {
                tracing::warn!("[RestAuthClient] Unreadable session artifact, ignoring: {}", err);
                None
            }
        };

        let Some(session) = cached else {
            return Ok(None);
        };

        if !session.is_expired_within(EXPIRY_MARGIN_SECS) {
            return Ok(Some(session));
        }

        match self.refresh(&session.refresh_token).await {
            Ok(fresh) => Ok(Some(fresh)),
            Err(err) if err.is_auth() => {
                // The backend no longer accepts the refresh token; the
                // session is gone, which is an absence, not a failure.
                tracing::warn!(
                    "[RestAuthClient] Session refresh rejected, discarding cached session: {}",
                    err
                );
                self.discard_artifact();
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let session = self
            .token_request("password", &json!({ "email": email, "password": password }))
            .await?;

        self.persist(&session);
        self.emit(AuthStateChange::signed_in(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession> {
        let url = format!("{}/signup", self.config.auth_base());
        let request = self
            .http
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email, "password": password }));

        let (status, body) = self.execute_auth(request, &url).await?;
        if !status.is_success() {
            return Err(parse_auth_error(status, &body));
        }

        // With email autoconfirmation the signup response is a full token
        // bundle; otherwise it is a bare user record awaiting confirmation.
        match serde_json::from_str::<TokenResponse>(&body) {
            Ok(token) => {
                let session = token.into_session();
                self.persist(&session);
                self.emit(AuthStateChange::signed_in(session.clone()));
                Ok(session)
            }
            Err(_) => Err(VaultError::auth_message(
                "Email confirmation required before signing in",
            )),
        }
    }

    async fn sign_out(&self, scope: SignOutScope) -> Result<()> {
        let cached = self.cache.load().ok().flatten();

        let Some(session) = cached else {
            // Nothing to end server-side; signing out of nothing succeeds.
            self.discard_artifact();
            self.emit(AuthStateChange::signed_out());
            return Ok(());
        };

        let url = format!("{}/logout?scope={}", self.config.auth_base(), scope.as_str());
        let request = self
            .http
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&session.access_token);

        let outcome = self.execute_auth(request, &url).await;

        // This client's copy of the session is gone either way; drop the
        // artifact and notify subscribers before reporting the outcome.
        self.discard_artifact();
        self.emit(AuthStateChange::signed_out());

        let (status, body) = outcome?;
        if !status.is_success() {
            return Err(parse_auth_error(status, &body));
        }
        Ok(())
    }

    async fn get_user(&self) -> Result<Option<AuthUser>> {
        let Some(session) = self.get_session().await? else {
            return Ok(None);
        };

        let url = format!("{}/user", self.config.auth_base());
        let request = self
            .http
            .get(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&session.access_token);

        let (status, body) = self.execute_auth(request, &url).await?;
        if status == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(parse_auth_error(status, &body));
        }

        let user: AuthUser = serde_json::from_str(&body)?;
        Ok(Some(user))
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthStateChange> {
        self.changes.subscribe()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self) -> AuthSession {
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|secs| chrono::Utc::now().timestamp() + secs));

        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: self.token_type.unwrap_or_else(|| "bearer".to_string()),
            expires_at,
            user: self.user,
        }
    }
}

/// Maps a failed auth-surface response to an error.
///
/// Client errors become typed `Auth` failures carrying the backend's error
/// code (when present); server errors become `Api` failures.
fn parse_auth_error(status: StatusCode, body: &str) -> VaultError {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();

    let code = parsed
        .as_ref()
        .and_then(|v| v.get("code").and_then(|c| c.as_str()))
        .or_else(|| {
            parsed
                .as_ref()
                .and_then(|v| v.get("error_code").and_then(|c| c.as_str()))
        })
        .map(str::to_string);

    let message = parsed
        .as_ref()
        .and_then(|v| {
            ["message", "msg", "error_description"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()))
        })
        .map(str::to_string)
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body.to_string()
            }
        });

    if status.is_client_error() {
        VaultError::Auth { code, message }
    } else {
        VaultError::api(status.as_u16(), message)
    }
}
