//! Repository index ledger
//!
//! Tracks, per logical repository, which artifact currently represents each
//! package. Re-adding an identical artifact is a no-op; adding a lower version
//! than the indexed one is refused unless forced.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::entities::RegistryArtifact;
use crate::domain::value_objects::PackageVersion;
use crate::error::{BridgeError, BridgeResult};

/// One indexed artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub filename: String,
    pub version: String,
    pub checksum: String,
    pub indexed_at: DateTime<Utc>,
}

/// What an insert did to the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexChange {
    /// Package was not indexed before
    Added,
    /// Package was indexed under another file or checksum
    Updated { previous: String },
    /// Same file with the same checksum is already indexed
    Unchanged,
}

impl IndexChange {
    pub fn is_change(&self) -> bool {
        !matches!(self, IndexChange::Unchanged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryIndex {
    repo: String,
    version: u32,
    entries: BTreeMap<String, IndexEntry>,
}

impl RepositoryIndex {
    pub const FORMAT_VERSION: u32 = 1;

    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            version: Self::FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn format_version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for a package name
    pub fn get(&self, package: &str) -> Option<&IndexEntry> {
        self.entries.get(package)
    }

    /// Number of entries referencing `filename` (0 or 1)
    pub fn count_filename(&self, filename: &str) -> usize {
        self.entries
            .values()
            .filter(|e| e.filename == filename)
            .count()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Restore an entry as persisted, without policy checks
    pub fn restore(&mut self, package: impl Into<String>, entry: IndexEntry) {
        self.entries.insert(package.into(), entry);
    }

    /// Decide and record the effect of indexing `artifact`.
    pub fn insert(
        &mut self,
        artifact: &RegistryArtifact,
        checksum: &str,
        force: bool,
        now: DateTime<Utc>,
    ) -> BridgeResult<IndexChange> {
        let change = match self.entries.get(artifact.name()) {
            None => IndexChange::Added,
            Some(existing) => {
                if existing.filename == artifact.filename() && existing.checksum == checksum {
                    return Ok(IndexChange::Unchanged);
                }
                let current = PackageVersion::parse(&existing.version);
                if !force && artifact.version() < &current {
                    return Err(BridgeError::Downgrade {
                        package: artifact.name().to_string(),
                        current: existing.version.clone(),
                        candidate: artifact.version().to_string(),
                    });
                }
                IndexChange::Updated {
                    previous: existing.filename.clone(),
                }
            }
        };

        self.entries.insert(
            artifact.name().to_string(),
            IndexEntry {
                filename: artifact.filename().to_string(),
                version: artifact.version().to_string(),
                checksum: checksum.to_string(),
                indexed_at: now,
            },
        );
        Ok(change)
    }

    /// Drop a package from the ledger
    pub fn remove(&mut self, package: &str) -> Option<IndexEntry> {
        self.entries.remove(package)
    }
}
