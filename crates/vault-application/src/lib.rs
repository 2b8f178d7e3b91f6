//! Application layer for SecureVault.
//!
//! This crate provides the stores a view layer consumes: the session store
//! (auth state, sign-in/out), the cached platform and account lists, and
//! the bootstrap wiring that keeps the inactivity monitor in lockstep with
//! the session.

pub mod accounts_store;
pub mod bootstrap;
pub mod platforms_store;
pub mod session_store;

pub use accounts_store::AccountsStore;
pub use bootstrap::VaultApp;
pub use platforms_store::PlatformsStore;
pub use session_store::SessionStore;
