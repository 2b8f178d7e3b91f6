//! Authentication domain module.
//!
//! This module contains the identity models, the session state machine, the
//! provider trait for the backend's auth surface, the token cache trait, and
//! the auth-response interception seam.
//!
//! # Module Structure
//!
//! - `model`: identity types (`AuthUser`, `AuthSession`, `AuthStateChange`)
//! - `state`: explicit session state machine (`SessionState`)
//! - `provider`: backend auth capability (`AuthProvider`)
//! - `cache`: local token artifact persistence (`TokenCacheStore`)
//! - `interceptor`: stale-session classification and the interceptor registry

mod cache;
mod interceptor;
mod model;
mod provider;
mod state;

// Re-export public API
pub use cache::TokenCacheStore;
pub use interceptor::{
    AUTH_PATH_PREFIX, InterceptedResponse, InterceptorHandle, InterceptorRegistry,
    NetworkInterceptor, STALE_SESSION_CODE, STALE_SESSION_MESSAGE, is_auth_request,
    is_stale_session_body,
};
pub use model::{AuthChangeEvent, AuthSession, AuthStateChange, AuthUser};
pub use provider::{AuthProvider, SignOutScope};
pub use state::{SessionState, SessionTransition};
