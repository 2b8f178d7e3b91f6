//! Backend client layer for SecureVault.
//!
//! This crate implements the traits defined in `vault-core` against the
//! hosted backend: the REST auth client, REST table repositories, the
//! on-disk token cache, configuration loading, and path resolution.

pub mod config_service;
pub mod paths;
pub mod rest_account_repository;
pub mod rest_auth_client;
pub mod rest_platform_repository;
pub mod table_client;
pub mod token_cache;

pub use config_service::{ENV_ANON_KEY, ENV_BACKEND_URL, load_config, load_config_from};
pub use paths::VaultPaths;
pub use rest_account_repository::RestAccountRepository;
pub use rest_auth_client::RestAuthClient;
pub use rest_platform_repository::RestPlatformRepository;
pub use table_client::TableClient;
pub use token_cache::{TokenCache, TokenCacheError};
