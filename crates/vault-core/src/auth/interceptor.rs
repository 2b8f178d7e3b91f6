//! Auth response interception.
//!
//! The backend occasionally answers an auth-surface request with an error
//! meaning "the session you referenced no longer exists server-side". That
//! condition is expected (sessions get revoked and garbage-collected) and
//! must be recovered from locally instead of being surfaced as a failure.
//!
//! Rather than reassigning a global network primitive, interception is a
//! decorator seam: the transport offers every failed auth-surface response
//! to a registry holding at most one installed [`NetworkInterceptor`], with
//! an explicit install/uninstall lifecycle so teardown restores whatever was
//! installed before.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Error code the backend uses for a session its auth service no longer has.
pub const STALE_SESSION_CODE: &str = "session_not_found";

/// Message substring the backend uses when a token references a
/// garbage-collected session.
pub const STALE_SESSION_MESSAGE: &str = "Session from session_id claim in JWT does not exist";

/// Path prefix identifying the backend's authentication surface.
pub const AUTH_PATH_PREFIX: &str = "/auth/v1/";

/// A response captured from the backend for inspection.
///
/// Interceptors receive the response as observed data; they can react to it
/// but never alter it. The transport passes the original response through
/// unchanged regardless of what an interceptor does.
#[derive(Debug, Clone)]
pub struct InterceptedResponse {
    /// Full request URL the response belongs to
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Raw response body text
    pub body: String,
}

impl InterceptedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Returns true if the URL targets the backend's authentication surface.
pub fn is_auth_request(url: &str) -> bool {
    url.contains(AUTH_PATH_PREFIX)
}

/// Classifies a response body as a stale-session condition.
///
/// A body matches when it carries the recognized error code or the
/// recognized message substring. Unparseable bodies never match; transient
/// parse failures while inspecting responses are not fatal.
pub fn is_stale_session_body(body: &str) -> bool {
    let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) else {
        return false;
    };

    if parsed.get("code").and_then(|c| c.as_str()) == Some(STALE_SESSION_CODE) {
        return true;
    }

    ["message", "msg", "error_description"]
        .iter()
        .filter_map(|key| parsed.get(*key).and_then(|m| m.as_str()))
        .any(|message| message.contains(STALE_SESSION_MESSAGE))
}

/// An observer of backend auth-surface responses.
#[async_trait]
pub trait NetworkInterceptor: Send + Sync {
    /// Inspects a failed auth-surface response.
    ///
    /// Implementations must not assume the response can be retried or
    /// altered; they only get to react (e.g. by clearing local state).
    async fn inspect(&self, response: &InterceptedResponse);
}

/// Handle returned by [`InterceptorRegistry::install`].
///
/// Holds whatever interceptor was installed before, so uninstalling restores
/// the prior mechanism exactly. Dropping the handle without uninstalling
/// leaves the new interceptor in place for the registry's lifetime.
pub struct InterceptorHandle {
    previous: Option<Arc<dyn NetworkInterceptor>>,
}

/// Registry holding at most one installed interceptor.
///
/// A single slot makes the exactly-one-installation invariant structural:
/// re-installing (e.g. a store being rebuilt) replaces the slot instead of
/// wrapping the previous interceptor a second time.
#[derive(Default)]
pub struct InterceptorRegistry {
    slot: RwLock<Option<Arc<dyn NetworkInterceptor>>>,
}

impl InterceptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs an interceptor, replacing any current one.
    ///
    /// # Returns
    ///
    /// A handle carrying the previously installed interceptor; pass it to
    /// [`uninstall`](Self::uninstall) to restore it.
    pub async fn install(&self, interceptor: Arc<dyn NetworkInterceptor>) -> InterceptorHandle {
        let mut slot = self.slot.write().await;
        let previous = slot.replace(interceptor);
        InterceptorHandle { previous }
    }

    /// Uninstalls the current interceptor, restoring the one that was
    /// installed when the handle was created.
    pub async fn uninstall(&self, handle: InterceptorHandle) {
        let mut slot = self.slot.write().await;
        *slot = handle.previous;
    }

    /// Offers a response to the installed interceptor, if any.
    pub async fn notify(&self, response: &InterceptedResponse) {
        let current = { self.slot.read().await.clone() };
        if let Some(interceptor) = current {
            interceptor.inspect(response).await;
        }
    }

    /// Returns true if an interceptor is currently installed.
    pub async fn is_installed(&self) -> bool {
        self.slot.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingInterceptor {
        seen: AtomicUsize,
    }

    #[async_trait]
    impl NetworkInterceptor for CountingInterceptor {
        async fn inspect(&self, _response: &InterceptedResponse) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn response(url: &str, status: u16, body: &str) -> InterceptedResponse {
        InterceptedResponse {
            url: url.to_string(),
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_classify_by_code() {
        assert!(is_stale_session_body(r#"{"code":"session_not_found"}"#));
    }

    #[test]
    fn test_classify_by_message_substring() {
        let body = r#"{"message":"invalid JWT: Session from session_id claim in JWT does not exist"}"#;
        assert!(is_stale_session_body(body));
    }

    #[test]
    fn test_unparseable_body_does_not_match() {
        assert!(!is_stale_session_body("<html>502 Bad Gateway</html>"));
    }

    #[test]
    fn test_other_auth_errors_do_not_match() {
        assert!(!is_stale_session_body(
            r#"{"code":"invalid_credentials","message":"Invalid login credentials"}"#
        ));
    }

    #[test]
    fn test_numeric_code_does_not_match() {
        assert!(!is_stale_session_body(r#"{"code":400,"msg":"Bad Request"}"#));
    }

    #[test]
    fn test_auth_path_matching() {
        assert!(is_auth_request("https://db.example.co/auth/v1/token"));
        assert!(!is_auth_request("https://db.example.co/rest/v1/platforms"));
    }

    #[tokio::test]
    async fn test_install_uninstall_restores_previous() {
        let registry = InterceptorRegistry::new();

        let first = Arc::new(CountingInterceptor {
            seen: AtomicUsize::new(0),
        });
        let second = Arc::new(CountingInterceptor {
            seen: AtomicUsize::new(0),
        });

        let first_handle = registry.install(first.clone()).await;
        let second_handle = registry.install(second.clone()).await;

        // Only the most recent installation observes responses.
        registry.notify(&response("/auth/v1/token", 403, "{}")).await;
        assert_eq!(first.seen.load(Ordering::SeqCst), 0);
        assert_eq!(second.seen.load(Ordering::SeqCst), 1);

        // Uninstalling the second restores the first.
        registry.uninstall(second_handle).await;
        registry.notify(&response("/auth/v1/token", 403, "{}")).await;
        assert_eq!(first.seen.load(Ordering::SeqCst), 1);

        registry.uninstall(first_handle).await;
        assert!(!registry.is_installed().await);
    }

    #[tokio::test]
    async fn test_notify_without_interceptor_is_noop() {
        let registry = InterceptorRegistry::new();
        registry.notify(&response("/auth/v1/user", 401, "{}")).await;
    }
}
