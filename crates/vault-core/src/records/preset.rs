//! Platform presets.
//!
//! Provides the built-in platform suggestions offered when creating a new
//! platform: a display name, an icon slug, and a brand accent color.

/// Icon slug used when no preset or custom icon is chosen.
pub const DEFAULT_ICON: &str = "globe";

/// Accent color used when no preset or custom color is chosen.
pub const DEFAULT_COLOR: &str = "#3b82f6";

/// A suggested platform with its icon and brand color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformPreset {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

/// Returns the built-in platform presets, in display order.
pub fn platform_presets() -> Vec<PlatformPreset> {
    vec![
        PlatformPreset {
            name: "Gmail",
            icon: "mail",
            color: "#ea4335",
        },
        PlatformPreset {
            name: "GitHub",
            icon: "github",
            color: "#24292e",
        },
        PlatformPreset {
            name: "Twitter",
            icon: "twitter",
            color: "#1da1f2",
        },
        PlatformPreset {
            name: "Facebook",
            icon: "facebook",
            color: "#1877f2",
        },
        PlatformPreset {
            name: "Instagram",
            icon: "instagram",
            color: "#e4405f",
        },
        PlatformPreset {
            name: "LinkedIn",
            icon: "linkedin",
            color: "#0a66c2",
        },
        PlatformPreset {
            name: "Netflix",
            icon: "tv",
            color: "#e50914",
        },
        PlatformPreset {
            name: "Amazon",
            icon: "shopping-cart",
            color: "#ff9900",
        },
        PlatformPreset {
            name: "Spotify",
            icon: "music",
            color: "#1db954",
        },
        PlatformPreset {
            name: "Discord",
            icon: "message-circle",
            color: "#5865f2",
        },
        PlatformPreset {
            name: "Slack",
            icon: "slack",
            color: "#611f69",
        },
        PlatformPreset {
            name: "Dropbox",
            icon: "folder",
            color: "#0061ff",
        },
    ]
}

/// Looks up a preset by its display name.
pub fn find_preset(name: &str) -> Option<PlatformPreset> {
    platform_presets().into_iter().find(|p| p.name == name)
}
