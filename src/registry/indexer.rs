//! Incremental repository indexing
//!
//! The ledger (`<repo>.index.toml`) decides whether an artifact changes the
//! repository; only then is the index tool run against `<repo>.db.tar.gz`.
//! Push handler, watcher and startup scan all go through [`Indexer::add`],
//! serialized by an exclusive lock on `<repo>.index.lock`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::domain::entities::{IndexChange, RegistryArtifact, ARTIFACT_SUFFIX};
use crate::domain::ports::IndexTool;
use crate::error::{BridgeError, BridgeResult};
use crate::infrastructure::fs::{files_with_suffix, sha256_file};
use crate::infrastructure::{ProcessLock, TomlIndexRepository};

pub struct Indexer {
    dir: PathBuf,
    repo: String,
    prevent_downgrade: bool,
    tool: Arc<dyn IndexTool>,
}

impl Indexer {
    pub fn new(
        dir: impl Into<PathBuf>,
        repo: impl Into<String>,
        prevent_downgrade: bool,
        tool: Arc<dyn IndexTool>,
    ) -> Self {
        Self {
            dir: dir.into(),
            repo: repo.into(),
            prevent_downgrade,
            tool,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Database file handed to the index tool
    pub fn db_path(&self) -> PathBuf {
        self.dir.join(format!("{}.db.tar.gz", self.repo))
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(format!("{}.index.lock", self.repo))
    }

    /// Index one artifact. A lower version than the indexed one is refused
    /// unless `force` is set or downgrade protection is off.
    pub fn add(&self, artifact: &Path, force: bool) -> BridgeResult<IndexChange> {
        let parsed = RegistryArtifact::from_path(artifact)?;
        let force = force || !self.prevent_downgrade;
        let _lock = ProcessLock::acquire_blocking(&self.lock_path())?;

        let checksum = sha256_file(artifact)?;
        let ledger = TomlIndexRepository::for_repo(&self.dir, &self.repo);
        let mut index = ledger.load(&self.repo)?;
        let change = index.insert(&parsed, &checksum, force, Utc::now())?;
        if !change.is_change() {
            return Ok(change);
        }

        self.tool
            .add(&self.db_path(), artifact, force)
            .map_err(|e| BridgeError::Index {
                file: parsed.filename().to_string(),
                repo: self.repo.clone(),
                output: e.output,
            })?;
        ledger.save(&index)?;
        Ok(change)
    }

    /// Index and log the outcome. Failures are reported, never propagated.
    pub fn add_logged(&self, artifact: &Path, force: bool) -> Option<IndexChange> {
        let file = artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = self.dir.display();
        match self.add(artifact, force) {
            Ok(IndexChange::Unchanged) => {
                debug!("package {} already in db {} in dir {}", file, self.repo, dir);
                Some(IndexChange::Unchanged)
            }
            Ok(change) => {
                info!("package {} added to db {} in dir {}", file, self.repo, dir);
                Some(change)
            }
            Err(e) => {
                error!(
                    "unable to add package {} to db {} in dir {}: {}",
                    file, self.repo, dir, e
                );
                None
            }
        }
    }

    /// Index every artifact already present in the directory.
    /// Returns how many changed the repository.
    pub fn scan(&self) -> BridgeResult<usize> {
        let mut changed = 0;
        for artifact in files_with_suffix(&self.dir, ARTIFACT_SUFFIX)? {
            if self
                .add_logged(&artifact, false)
                .is_some_and(|c| c.is_change())
            {
                changed += 1;
            }
        }
        Ok(changed)
    }
}
