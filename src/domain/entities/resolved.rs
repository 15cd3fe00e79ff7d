//! A source package while it is being resolved and built

use std::path::{Path, PathBuf};

use crate::domain::entities::PackageReference;

/// File name of the build manifest inside a clone
pub const MANIFEST_FILE: &str = "PKGBUILD";

/// Owns the exclusive working directory of one source package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSourcePackage {
    reference: PackageReference,
    work_dir: PathBuf,
    resolved_version: String,
    branch: String,
}

impl ResolvedSourcePackage {
    /// Working directory is `<work_root>/<shortName>`
    pub fn new(reference: PackageReference, work_root: &Path) -> Self {
        let work_dir = work_root.join(reference.short_name());
        Self {
            reference,
            work_dir,
            resolved_version: String::new(),
            branch: String::new(),
        }
    }

    pub fn reference(&self) -> &PackageReference {
        &self.reference
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.work_dir.join(MANIFEST_FILE)
    }

    /// Concrete commit or ref the clone is checked out at
    pub fn resolved_version(&self) -> &str {
        &self.resolved_version
    }

    /// Default branch the version was resolved against
    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn set_resolved(&mut self, branch: impl Into<String>, version: impl Into<String>) {
        self.branch = branch.into();
        self.resolved_version = version.into();
    }
}
