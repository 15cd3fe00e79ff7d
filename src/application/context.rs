//! Orchestrator context
//!
//! Everything a mutating operation needs, passed explicitly: the held
//! process lock, resolved paths, retention policy and install settings.
//! Dropping the context releases the lock on every exit path.

use std::path::Path;

use crate::config::{Config, Paths};
use crate::domain::ports::{BuildTool, EventSink, HostPackageManager, InstalledStore, VersionControl};
use crate::domain::value_objects::RetentionPolicy;
use crate::error::BridgeResult;
use crate::infrastructure::{Janitor, ProcessLock};

pub struct Context {
    paths: Paths,
    retention: RetentionPolicy,
    scheme: String,
    check_concurrency: usize,
    lock: ProcessLock,
}

impl Context {
    /// Take the process lock named by the config and capture its settings.
    pub fn acquire(config: &Config) -> BridgeResult<Self> {
        let paths = config.paths.resolve();
        let lock = ProcessLock::acquire(&paths.lock_file)?;
        Ok(Self::new(paths, config.retention, lock)
            .with_scheme(config.install.scheme.clone())
            .with_check_concurrency(config.install.check_concurrency))
    }

    pub fn new(paths: Paths, retention: RetentionPolicy, lock: ProcessLock) -> Self {
        Self {
            paths,
            retention,
            scheme: "https".to_string(),
            check_concurrency: 4,
            lock,
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_check_concurrency(mut self, n: usize) -> Self {
        self.check_concurrency = n.max(1);
        self
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn work_dir(&self) -> &Path {
        &self.paths.work_dir
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn check_concurrency(&self) -> usize {
        self.check_concurrency
    }

    pub fn lock_path(&self) -> &Path {
        self.lock.path()
    }

    pub fn janitor<'a>(&self, vcs: &'a dyn VersionControl) -> Janitor<'a> {
        Janitor::new(vcs, self.retention, self.paths.package_cache_dir.clone())
    }
}

/// The external collaborators of the orchestrator
#[derive(Clone, Copy)]
pub struct Ports<'a> {
    pub packages: &'a dyn HostPackageManager,
    pub vcs: &'a dyn VersionControl,
    pub builder: &'a dyn BuildTool,
    pub store: &'a dyn InstalledStore,
    pub events: &'a dyn EventSink,
}
