//! Configuration module for pkgbridge
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (PKGBRIDGE_*)
//! 3. User config (`PKGBRIDGE_CONFIG` or ~/.config/pkgbridge/config.toml)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{apply_overrides, user_config_path, ConfigWarning, CONFIG_ENV};
pub use types::{Config, InstallConfig, Paths, PathsConfig, PushConfig, RegistryConfig};
