//! TOML Index Ledger
//!
//! Persists a `RepositoryIndex` as `<repo>.index.toml` next to the package
//! database it mirrors.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{IndexEntry, RepositoryIndex};
use crate::error::{BridgeError, BridgeResult};
use crate::infrastructure::fs::atomic_write;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TomlIndexEntry {
    filename: String,
    version: String,
    checksum: String,
    indexed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TomlIndex {
    version: u32,
    repo: String,
    #[serde(default)]
    packages: BTreeMap<String, TomlIndexEntry>,
}

pub struct TomlIndexRepository {
    path: PathBuf,
}

impl TomlIndexRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ledger path for `repo` inside `dir`
    pub fn for_repo(dir: &Path, repo: &str) -> Self {
        Self::new(dir.join(format!("{repo}.index.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self, repo: &str) -> BridgeResult<RepositoryIndex> {
        if !self.path.exists() {
            return Ok(RepositoryIndex::new(repo));
        }

        let content = fs::read_to_string(&self.path)?;
        let toml_index: TomlIndex = toml::from_str(&content).map_err(|e| self.corrupt(e))?;
        if toml_index.version != RepositoryIndex::FORMAT_VERSION {
            return Err(self.corrupt(format!(
                "unsupported ledger version {} (expected {})",
                toml_index.version,
                RepositoryIndex::FORMAT_VERSION
            )));
        }

        let mut index = RepositoryIndex::new(toml_index.repo);
        for (name, e) in toml_index.packages {
            index.restore(
                name,
                IndexEntry {
                    filename: e.filename,
                    version: e.version,
                    checksum: e.checksum,
                    indexed_at: e.indexed_at,
                },
            );
        }
        Ok(index)
    }

    pub fn save(&self, index: &RepositoryIndex) -> BridgeResult<()> {
        let packages = index
            .entries()
            .map(|(name, e)| {
                (
                    name.to_string(),
                    TomlIndexEntry {
                        filename: e.filename.clone(),
                        version: e.version.clone(),
                        checksum: e.checksum.clone(),
                        indexed_at: e.indexed_at,
                    },
                )
            })
            .collect();
        let toml_index = TomlIndex {
            version: index.format_version(),
            repo: index.repo().to_string(),
            packages,
        };
        let content = toml::to_string_pretty(&toml_index).map_err(|e| self.corrupt(e))?;
        atomic_write(&self.path, content.as_bytes())?;
        Ok(())
    }

    fn corrupt(&self, e: impl std::fmt::Display) -> BridgeError {
        BridgeError::Index {
            file: self.path.display().to_string(),
            repo: String::new(),
            output: e.to_string(),
        }
    }
}
