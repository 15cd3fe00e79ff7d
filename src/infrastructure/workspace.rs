//! Working-directory handling around a build
//!
//! Manifest file I/O, moving built artifacts into the shared package cache,
//! and cleaning a clone after its build according to the retention policy.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::entities::{ARTIFACT_SUFFIX, SIGNATURE_SUFFIX};
use crate::domain::ports::VersionControl;
use crate::domain::services::manifest;
use crate::domain::value_objects::RetentionPolicy;
use crate::error::{BridgeError, BridgeResult};
use crate::infrastructure::fs::{atomic_write, files_with_suffix, move_file};
use crate::infrastructure::process;

/// Build byproduct directories left by the build tool
const BYPRODUCT_DIRS: [&str; 2] = ["pkg", "src"];

/// Read a manifest, mapping any failure to a manifest error.
pub fn read_manifest(path: &Path) -> BridgeResult<String> {
    fs::read_to_string(path).map_err(|e| BridgeError::Manifest {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Rewrite source dependency tokens in place. Returns whether the file changed.
pub fn rewrite_manifest(path: &Path, tokens: &[String]) -> BridgeResult<bool> {
    if tokens.is_empty() {
        return Ok(false);
    }
    let content = read_manifest(path)?;
    let rewritten = manifest::rewrite_sources(&content, tokens)?;
    if rewritten == content {
        return Ok(false);
    }
    atomic_write(path, rewritten.as_bytes()).map_err(|e| BridgeError::Manifest {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(true)
}

/// Post-build housekeeping for one working directory
pub struct Janitor<'a> {
    vcs: &'a dyn VersionControl,
    retention: RetentionPolicy,
    cache_dir: PathBuf,
}

impl<'a> Janitor<'a> {
    pub fn new(vcs: &'a dyn VersionControl, retention: RetentionPolicy, cache_dir: PathBuf) -> Self {
        Self {
            vcs,
            retention,
            cache_dir,
        }
    }

    /// Move built artifacts and their signatures into the package cache.
    /// Returns the cached paths; nothing moves when caching is disabled.
    pub fn cache_artifacts(&self, dir: &Path) -> BridgeResult<Vec<PathBuf>> {
        if !self.retention.caches_artifacts() {
            return Ok(Vec::new());
        }
        let mut files = files_with_suffix(dir, ARTIFACT_SUFFIX)?;
        files.extend(files_with_suffix(dir, &format!("{ARTIFACT_SUFFIX}{SIGNATURE_SUFFIX}"))?);

        let mut cached = Vec::with_capacity(files.len());
        for file in files {
            let Some(name) = file.file_name() else {
                continue;
            };
            let target = self.cache_dir.join(name);
            self.move_into_cache(&file, &target)?;
            cached.push(target);
        }
        Ok(cached)
    }

    /// Delete the clone, or strip byproducts and reset it for reuse.
    pub fn clean(&self, dir: &Path) -> BridgeResult<()> {
        if !dir.exists() {
            return Ok(());
        }
        if !self.retention.keeps_clone() {
            fs::remove_dir_all(dir)?;
            return Ok(());
        }

        for archive in files_with_suffix(dir, ".tar.gz")? {
            fs::remove_file(archive)?;
        }
        for sub in BYPRODUCT_DIRS {
            let path = dir.join(sub);
            if path.is_dir() {
                fs::remove_dir_all(path)?;
            }
        }
        self.vcs.clean(dir).map_err(|e| BridgeError::Vcs {
            action: "clean".to_string(),
            dir: dir.to_path_buf(),
            output: e.output,
        })?;
        Ok(())
    }

    fn move_into_cache(&self, from: &Path, to: &Path) -> BridgeResult<()> {
        match move_file(from, to) {
            Ok(()) => Ok(()),
            // The system package cache is usually root-owned.
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                process::run_privileged("mv", [from.as_os_str(), to.as_os_str()], None)
                    .map(|_| ())
                    .map_err(|e| BridgeError::Io(std::io::Error::other(e.to_string())))
            }
            Err(e) => Err(e.into()),
        }
    }
}
