//! Process-wide advisory lock
//!
//! Two orchestrator invocations must never mutate the host package database
//! at the same time. The guard holds an exclusive `fs2` lock on a file for
//! as long as it lives.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{BridgeError, BridgeResult};

#[derive(Debug)]
pub struct ProcessLock {
    file: File,
    path: PathBuf,
}

impl ProcessLock {
    /// Take the lock without waiting; a held lock is an error.
    pub fn acquire(path: &Path) -> BridgeResult<Self> {
        let file = open(path)?;
        file.try_lock_exclusive().map_err(|e| BridgeError::Lock {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Wait until the lock is free.
    pub fn acquire_blocking(path: &Path) -> BridgeResult<Self> {
        let file = open(path)?;
        file.lock_exclusive().map_err(|e| BridgeError::Lock {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProcessLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn open(path: &Path) -> BridgeResult<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(path)
        .map_err(|e| BridgeError::Lock {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
