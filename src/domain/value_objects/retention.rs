//! Retention policy - what survives after a source package is built

use serde::{Deserialize, Serialize};

/// Whether clones and built artifacts are kept after use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RetentionPolicy {
    /// Delete the working clone instead of resetting it
    #[serde(default)]
    pub remove_work_dirs: bool,
    /// Do not move built artifacts into the shared package cache
    #[serde(default)]
    pub remove_built_packages: bool,
}

impl RetentionPolicy {
    pub fn keep_all() -> Self {
        Self::default()
    }

    pub fn keeps_clone(&self) -> bool {
        !self.remove_work_dirs
    }

    pub fn caches_artifacts(&self) -> bool {
        !self.remove_built_packages
    }
}
