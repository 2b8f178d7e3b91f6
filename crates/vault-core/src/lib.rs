//! Core domain layer for SecureVault.
//!
//! This crate holds the session lifecycle machinery (state machine,
//! inactivity deadline, auth-response interception), the identity and record
//! models, the traits implemented by the backend layer, and small shared
//! utilities (presets, password generation, configuration model).

pub mod auth;
pub mod config;
pub mod error;
pub mod idle;
pub mod password;
pub mod records;

// Re-export common error type
pub use error::{Result, VaultError};
