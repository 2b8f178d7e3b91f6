//! Stored records domain module.
//!
//! - `model`: row models and insert/update payloads
//! - `repository`: repository traits for platforms and accounts
//! - `preset`: built-in platform suggestions

mod model;
mod preset;
mod repository;

pub use model::{
    Account, AccountChanges, NewAccount, NewPlatform, Platform, PlatformChanges,
};
pub use preset::{find_preset, platform_presets, PlatformPreset, DEFAULT_COLOR, DEFAULT_ICON};
pub use repository::{AccountRepository, PlatformRepository};
