//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BridgeError, BridgeResult};
use crate::infrastructure::fs::home_dir;

use super::types::Config;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "PKGBRIDGE_CONFIG";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(s) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", s)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> BridgeResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| BridgeError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load the explicit or user config file, falling back to defaults when it
/// does not exist. A file that exists but does not parse is an error.
pub fn load_or_default() -> BridgeResult<(Config, Vec<ConfigWarning>)> {
    let path = std::env::var(CONFIG_ENV)
        .ok()
        .map(PathBuf::from)
        .or_else(user_config_path);

    let (config, warnings) = match path {
        Some(p) if p.exists() => load_with_warnings(&p)?,
        _ => (Config::default(), Vec::new()),
    };
    Ok((with_env_overrides(config), warnings))
}

/// `~/.config/pkgbridge/config.toml`, honouring `XDG_CONFIG_HOME`
pub fn user_config_path() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| home_dir().map(|h| h.join(".config")))
        .map(|dir| dir.join("pkgbridge/config.toml"))
}

/// Apply environment variable overrides (PKGBRIDGE_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Overrides from an arbitrary lookup, so tests need not mutate the process
/// environment.
pub fn apply_overrides(mut config: Config, var: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(v) = var("PKGBRIDGE_WORK_DIR") {
        config.paths.work_dir = PathBuf::from(v);
    }
    if let Some(v) = var("PKGBRIDGE_PACKAGE_CACHE_DIR") {
        config.paths.package_cache_dir = PathBuf::from(v);
    }
    if let Some(v) = var("PKGBRIDGE_INSTALLED_MAP") {
        config.paths.installed_map = PathBuf::from(v);
    }
    if let Some(v) = var("PKGBRIDGE_LOCK_FILE") {
        config.paths.lock_file = PathBuf::from(v);
    }
    if let Some(v) = var("PKGBRIDGE_REMOVE_WORK_DIRS") {
        config.retention.remove_work_dirs = parse_bool(&v);
    }
    if let Some(v) = var("PKGBRIDGE_REMOVE_BUILT_PACKAGES") {
        config.retention.remove_built_packages = parse_bool(&v);
    }
    config
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "retention",
        "remove_work_dirs",
        "remove_built_packages",
        "paths",
        "work_dir",
        "package_cache_dir",
        "installed_map",
        "lock_file",
        "install",
        "check_concurrency",
        "scheme",
        "registry",
        "listen",
        "serve_dir",
        "repo_name",
        "prevent_downgrade",
        "push",
        "protocol",
        "endpoint",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
