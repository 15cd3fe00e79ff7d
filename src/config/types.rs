//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::RetentionPolicy;
use crate::error::BridgeResult;
use crate::infrastructure::fs::expand_home;

use super::loader::{self, ConfigWarning};

/// On-disk locations; `~` is expanded by [`PathsConfig::resolve`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Parent of the per-short-name clones
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Shared cache that built artifacts are moved into
    #[serde(default = "default_package_cache_dir")]
    pub package_cache_dir: PathBuf,

    /// Installed-set mapping file
    #[serde(default = "default_installed_map")]
    pub installed_map: PathBuf,

    /// Process lock file
    #[serde(default = "default_lock_file")]
    pub lock_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            package_cache_dir: default_package_cache_dir(),
            installed_map: default_installed_map(),
            lock_file: default_lock_file(),
        }
    }
}

impl PathsConfig {
    pub fn resolve(&self) -> Paths {
        Paths {
            work_dir: expand_home(&self.work_dir),
            package_cache_dir: expand_home(&self.package_cache_dir),
            installed_map: expand_home(&self.installed_map),
            lock_file: expand_home(&self.lock_file),
        }
    }
}

/// Absolute paths used at runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub work_dir: PathBuf,
    pub package_cache_dir: PathBuf,
    pub installed_map: PathBuf,
    pub lock_file: PathBuf,
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("~/.cache/pkgbridge")
}

fn default_package_cache_dir() -> PathBuf {
    PathBuf::from("/var/cache/pacman/pkg")
}

fn default_installed_map() -> PathBuf {
    PathBuf::from("~/.cache/pkgbridge/installed.map")
}

fn default_lock_file() -> PathBuf {
    PathBuf::from("/tmp/pkgbridge.lock")
}

/// Install behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallConfig {
    /// Parallel source reachability checks
    #[serde(default = "default_check_concurrency")]
    pub check_concurrency: usize,

    /// Scheme prefixed to source addresses when cloning
    #[serde(default = "default_scheme")]
    pub scheme: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            check_concurrency: default_check_concurrency(),
            scheme: default_scheme(),
        }
    }
}

fn default_check_concurrency() -> usize {
    4
}

fn default_scheme() -> String {
    "https".to_string()
}

/// Registry service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Directory served under `/repo/` and watched for new artifacts
    #[serde(default = "default_package_cache_dir")]
    pub serve_dir: PathBuf,

    /// Logical repository name; database is `<repo_name>.db.tar.gz`
    #[serde(default = "default_repo_name")]
    pub repo_name: String,

    #[serde(default = "default_true")]
    pub prevent_downgrade: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            serve_dir: default_package_cache_dir(),
            repo_name: default_repo_name(),
            prevent_downgrade: true,
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:4572".to_string()
}

fn default_repo_name() -> String {
    "localhost".to_string()
}

fn default_true() -> bool {
    true
}

/// Push client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushConfig {
    #[serde(default = "default_scheme")]
    pub protocol: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            protocol: default_scheme(),
            endpoint: default_endpoint(),
        }
    }
}

fn default_endpoint() -> String {
    "/api/push".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub retention: RetentionPolicy,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub install: InstallConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub push: PushConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> BridgeResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> BridgeResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from the user config file (or `PKGBRIDGE_CONFIG`), or defaults
    pub fn load_or_default() -> BridgeResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default()
    }

    /// Apply environment variable overrides (PKGBRIDGE_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Render as TOML, e.g. for `pkgbridge config`
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}
