//! Installed-set stores
//!
//! `FileInstalledStore` persists the mapping as a flat `key: value` text
//! file. New entries are appended; the file is only rewritten (atomically)
//! when entries are removed by an uninstall.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::entities::InstalledSet;
use crate::domain::ports::InstalledStore;
use crate::error::{BridgeError, BridgeResult};
use crate::infrastructure::fs::atomic_write;

pub struct FileInstalledStore {
    path: PathBuf,
}

impl FileInstalledStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn err(&self, e: impl std::fmt::Display) -> BridgeError {
        BridgeError::Store {
            path: self.path.clone(),
            message: e.to_string(),
        }
    }
}

impl InstalledStore for FileInstalledStore {
    fn load(&self) -> BridgeResult<InstalledSet> {
        if !self.path.exists() {
            return Ok(InstalledSet::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.err(e))?;
        Ok(InstalledSet::parse(&content))
    }

    fn put(&self, key: &str, short_name: &str) -> BridgeResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.err(e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.err(e))?;
        file.write_all(InstalledSet::format_line(key, short_name).as_bytes())
            .map_err(|e| self.err(e))
    }

    fn remove(&self, keys: &[String]) -> BridgeResult<()> {
        let mut set = self.load()?;
        let before = set.len();
        for key in keys {
            set.remove(key);
        }
        if set.len() == before {
            return Ok(());
        }
        atomic_write(&self.path, set.render().as_bytes()).map_err(|e| self.err(e))
    }
}

/// In-memory store for tests and dry runs
#[derive(Default)]
pub struct MemoryInstalledStore {
    set: Mutex<InstalledSet>,
}

impl MemoryInstalledStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut set = InstalledSet::new();
        for (k, v) in entries {
            set.insert(k, v);
        }
        Self {
            set: Mutex::new(set),
        }
    }

    fn poisoned() -> BridgeError {
        BridgeError::Store {
            path: PathBuf::from("<memory>"),
            message: "store lock poisoned".to_string(),
        }
    }
}

impl InstalledStore for MemoryInstalledStore {
    fn load(&self) -> BridgeResult<InstalledSet> {
        self.set
            .lock()
            .map(|s| s.clone())
            .map_err(|_| Self::poisoned())
    }

    fn put(&self, key: &str, short_name: &str) -> BridgeResult<()> {
        self.set
            .lock()
            .map_err(|_| Self::poisoned())?
            .insert(key, short_name);
        Ok(())
    }

    fn remove(&self, keys: &[String]) -> BridgeResult<()> {
        let mut set = self.set.lock().map_err(|_| Self::poisoned())?;
        for key in keys {
            set.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileInstalledStore::new(dir.path().join("installed.map"));
        assert!(store.load().unwrap().is_empty());
        assert!(!store.contains("github.com/a/x").unwrap());
    }

    #[test]
    fn put_appends_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache/installed.map");
        let store = FileInstalledStore::new(&path);

        store.put("github.com/a/x", "x").unwrap();
        store.put("github.com/b/y@v1", "y").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "github.com/a/x: x\ngithub.com/b/y@v1: y\n"
        );
        assert_eq!(store.get("github.com/b/y@v1").unwrap().as_deref(), Some("y"));
    }

    #[test]
    fn tolerates_hand_edited_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("installed.map");
        fs::write(&path, "garbage\n\ngithub.com/a/x: x\n").unwrap();
        let store = FileInstalledStore::new(&path);
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn remove_rewrites_without_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("installed.map");
        let store = FileInstalledStore::new(&path);
        store.put("github.com/a/x", "x").unwrap();
        store.put("github.com/b/y", "y").unwrap();

        store.remove(&["github.com/a/x".to_string()]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "github.com/b/y: y\n");
    }

    #[test]
    fn remove_of_unknown_key_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("installed.map");
        fs::write(&path, "github.com/a/x: x\nstray\n").unwrap();
        let store = FileInstalledStore::new(&path);

        store.remove(&["nope".to_string()]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "github.com/a/x: x\nstray\n");
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryInstalledStore::with_entries([("h/o/x", "x")]);
        assert!(store.contains("h/o/x").unwrap());
        store.put("h/o/y", "y").unwrap();
        store.remove(&["h/o/x".to_string()]).unwrap();
        let set = store.load().unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("h/o/y"), Some("y"));
    }
}
