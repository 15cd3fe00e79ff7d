//! In-memory fakes of every port, shared by the use case tests

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use tempfile::TempDir;

use crate::config::Paths;
use crate::domain::entities::MANIFEST_FILE;
use crate::domain::ports::{
    BridgeEvent, BuildOptions, BuildTool, EventSink, HostPackageManager, ToolError, ToolResult,
    VersionControl,
};
use crate::domain::value_objects::RetentionPolicy;
use crate::infrastructure::{MemoryInstalledStore, ProcessLock};

use super::context::{Context, Ports};

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Default)]
pub struct FakeManager {
    pub known: HashSet<String>,
    pub installed: Mutex<HashSet<String>>,
    pub calls: Mutex<Vec<String>>,
    pub remove_output: Option<String>,
}

impl FakeManager {
    pub fn knowing(names: &[&str]) -> Self {
        Self {
            known: names.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_installed(self, names: &[&str]) -> Self {
        self.installed
            .lock()
            .unwrap()
            .extend(names.iter().map(|s| s.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl HostPackageManager for FakeManager {
    fn is_installed(&self, name: &str) -> bool {
        self.installed.lock().unwrap().contains(name)
    }

    fn searchable_names(&self) -> Result<HashSet<String>, ToolError> {
        Ok(self.known.clone())
    }

    fn install(&self, names: &[String]) -> ToolResult {
        self.calls
            .lock()
            .unwrap()
            .push(format!("install {}", names.join(" ")));
        self.installed.lock().unwrap().extend(names.iter().cloned());
        Ok(String::new())
    }

    fn remove(&self, names: &[String]) -> ToolResult {
        self.calls
            .lock()
            .unwrap()
            .push(format!("remove {}", names.join(" ")));
        if let Some(output) = &self.remove_output {
            return Err(ToolError::new("pacman", Some(1), output.clone()));
        }
        let mut installed = self.installed.lock().unwrap();
        for name in names {
            installed.remove(name);
        }
        Ok(String::new())
    }
}

/// Where [`FakeVcs`] remembers the URL a directory was cloned from
pub const ORIGIN_FILE: &str = ".git/origin";

/// Repositories keyed by address, each holding its manifest text.
/// Checking out the default branch answers "Already on", like git does.
#[derive(Default)]
pub struct FakeVcs {
    pub repos: HashMap<String, String>,
    pub remote: String,
    pub calls: Mutex<Vec<String>>,
}

impl FakeVcs {
    pub fn with_repo(mut self, address: &str, manifest: &str) -> Self {
        self.repos.insert(address.to_string(), manifest.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl VersionControl for FakeVcs {
    fn clone_repo(&self, url: &str, dir: &Path) -> ToolResult {
        let address = url.split_once("://").map(|(_, a)| a).unwrap_or(url);
        self.record(format!("clone {address}"));
        let Some(manifest) = self.repos.get(address) else {
            return Err(ToolError::new(
                "git",
                Some(128),
                format!("fatal: repository '{url}' not found"),
            ));
        };
        fs::create_dir_all(dir.join(".git")).unwrap();
        fs::write(dir.join(ORIGIN_FILE), url).unwrap();
        fs::write(dir.join(MANIFEST_FILE), manifest).unwrap();
        Ok(String::new())
    }

    fn checkout(&self, dir: &Path, target: &str) -> ToolResult {
        self.record(format!("checkout {} {target}", dir_name(dir)));
        if target == "main" {
            return Err(ToolError::new("git", Some(1), "Already on 'main'\n"));
        }
        Ok(String::new())
    }

    fn pull(&self, dir: &Path) -> ToolResult {
        self.record(format!("pull {}", dir_name(dir)));
        Ok(String::new())
    }

    fn last_commit(&self, _: &Path, _: &str) -> ToolResult {
        Ok("0123abcd\n".to_string())
    }

    fn default_branch(&self, _: &Path) -> ToolResult {
        Ok("main".to_string())
    }

    fn clean(&self, dir: &Path) -> ToolResult {
        self.record(format!("clean {}", dir_name(dir)));
        Ok(String::new())
    }

    /// The URL a clone was made from, else the configured `remote`
    fn remote_url(&self, dir: &Path) -> ToolResult {
        Ok(fs::read_to_string(dir.join(ORIGIN_FILE)).unwrap_or_else(|_| self.remote.clone()))
    }
}

/// Writes an artifact into the build directory on success.
#[derive(Default)]
pub struct FakeBuilder {
    pub failing: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeBuilder {
    pub fn failing(name: &str) -> Self {
        Self {
            failing: [name.to_string()].into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl BuildTool for FakeBuilder {
    fn build(&self, dir: &Path, options: BuildOptions) -> ToolResult {
        let name = dir_name(dir);
        self.calls.lock().unwrap().push(format!(
            "build {name} install={} sign={}",
            options.install, options.sign
        ));
        if self.failing.contains(&name) {
            return Err(ToolError::new(
                "makepkg",
                Some(4),
                "==> ERROR: A failure occurred in build().\n",
            ));
        }
        fs::write(dir.join(format!("{name}-1.0-1-x86_64.pkg.tar.zst")), b"pkg").unwrap();
        if options.sign {
            fs::write(dir.join(format!("{name}-1.0-1-x86_64.pkg.tar.zst.sig")), b"sig").unwrap();
        }
        Ok(String::new())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<BridgeEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<BridgeEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn on_event(&self, event: BridgeEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// A temporary root holding the work, cache, map and lock paths
pub struct Harness {
    pub root: TempDir,
    pub manager: FakeManager,
    pub vcs: FakeVcs,
    pub builder: FakeBuilder,
    pub store: MemoryInstalledStore,
    pub events: RecordingSink,
    pub retention: RetentionPolicy,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
            manager: FakeManager::default(),
            vcs: FakeVcs::default(),
            builder: FakeBuilder::default(),
            store: MemoryInstalledStore::new(),
            events: RecordingSink::default(),
            retention: RetentionPolicy::keep_all(),
        }
    }

    pub fn paths(&self) -> Paths {
        let root = self.root.path();
        Paths {
            work_dir: root.join("work"),
            package_cache_dir: root.join("cache"),
            installed_map: root.join("installed.map"),
            lock_file: root.join("pkgbridge.lock"),
        }
    }

    pub fn context(&self) -> Context {
        let paths = self.paths();
        let lock = ProcessLock::acquire(&paths.lock_file).unwrap();
        Context::new(paths, self.retention, lock).with_check_concurrency(2)
    }

    pub fn ports(&self) -> Ports<'_> {
        Ports {
            packages: &self.manager,
            vcs: &self.vcs,
            builder: &self.builder,
            store: &self.store,
            events: &self.events,
        }
    }
}
