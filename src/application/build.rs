//! Build Use Case
//!
//! Builds signed artifacts without installing them, either from source
//! references (cloned into the work directory) or from a local clone.
//! Source dependencies of the manifest are installed first, exactly as
//! `install` would.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::entities::{PackageGroups, PackageReference, ARTIFACT_SUFFIX, MANIFEST_FILE};
use crate::domain::ports::{BridgeEvent, BuildOptions};
use crate::domain::services::manifest;
use crate::error::{BridgeError, BridgeResult};
use crate::infrastructure::fs::{atomic_write, files_with_suffix};
use crate::infrastructure::workspace::{read_manifest, rewrite_manifest};

use super::context::{Context, Ports};
use super::install::InstallUseCase;
use super::reachability;
use super::source::{ensure_clone, resolve_version, vcs_error, CloneState};

/// One built package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub package: String,
    pub version: String,
    /// Where the artifacts ended up: the package cache, or the build
    /// directory when caching is disabled
    pub artifacts: Vec<PathBuf>,
}

/// Where the build directory came from
#[derive(Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// Our own clone in the work directory; cleaned afterwards
    WorkDir,
    /// A user's checkout; the manifest is restored and nothing is cleaned
    Local,
}

pub struct BuildUseCase<'a> {
    context: &'a Context,
    ports: Ports<'a>,
}

impl<'a> BuildUseCase<'a> {
    pub fn new(context: &'a Context, ports: Ports<'a>) -> Self {
        Self { context, ports }
    }

    /// Clone, pin and build every source reference, in order.
    pub fn build<S: AsRef<str>>(&self, refs: &[S]) -> BridgeResult<Vec<BuildOutcome>> {
        let groups = PackageGroups::classify(refs)?;
        if let Some(native) = groups.native.first() {
            return Err(BridgeError::Classification {
                input: native.address().to_string(),
                reason: "only source packages can be built".to_string(),
            });
        }
        self.ports.events.on_event(BridgeEvent::Started {
            command: "build".to_string(),
            packages: groups.source.iter().map(PackageReference::key).collect(),
        });

        reachability::check_sources(
            self.ports.vcs,
            &groups.source,
            self.context.work_dir(),
            self.context.scheme(),
            self.context.check_concurrency(),
        )?;

        let mut outcomes = Vec::with_capacity(groups.source.len());
        for reference in &groups.source {
            outcomes.push(self.build_reference(reference)?);
        }

        self.ports.events.on_event(BridgeEvent::Completed {
            command: "build".to_string(),
        });
        Ok(outcomes)
    }

    /// Build the checkout in `dir` as it stands. Its `pkgname` must equal
    /// the last segment of its `origin` remote URL.
    pub fn build_dir(&self, dir: &Path) -> BridgeResult<BuildOutcome> {
        let manifest_path = dir.join(MANIFEST_FILE);
        let content = read_manifest(&manifest_path)?;
        let package = manifest::read_scalar(&content, "pkgname").ok_or_else(|| {
            BridgeError::Manifest {
                path: manifest_path.clone(),
                message: "pkgname is not set".to_string(),
            }
        })?;

        let url = self
            .ports
            .vcs
            .remote_url(dir)
            .map_err(vcs_error("config", dir))?;
        let repository = repository_name(&url);
        if repository != package {
            return Err(BridgeError::Build {
                package,
                output: format!("package name does not match repository name {repository}"),
            });
        }

        let version = self
            .ports
            .vcs
            .last_commit(dir, "HEAD")
            .map_err(vcs_error("log", dir))?
            .trim()
            .to_string();
        self.build_in(dir, &package, version, Origin::Local)
    }

    fn build_reference(&self, reference: &PackageReference) -> BridgeResult<BuildOutcome> {
        let dir = self.context.work_dir().join(reference.short_name());
        match ensure_clone(self.ports.vcs, reference, &dir, self.context.scheme())? {
            CloneState::Fresh => self.ports.events.on_event(BridgeEvent::Cloned {
                address: reference.address().to_string(),
                dir: dir.clone(),
            }),
            CloneState::Reused => {
                self.ports.vcs.clean(&dir).map_err(vcs_error("clean", &dir))?;
                self.ports.events.on_event(BridgeEvent::Reused {
                    address: reference.address().to_string(),
                    dir: dir.clone(),
                });
            }
        }

        let (branch, version) = resolve_version(self.ports.vcs, &dir, reference.pin())?;
        self.ports.events.on_event(BridgeEvent::CheckedOut {
            address: reference.address().to_string(),
            branch,
            version: version.clone(),
        });
        self.build_in(&dir, reference.short_name(), version, Origin::WorkDir)
    }

    fn build_in(
        &self,
        dir: &Path,
        package: &str,
        version: String,
        origin: Origin,
    ) -> BridgeResult<BuildOutcome> {
        let manifest_path = dir.join(MANIFEST_FILE);
        let original = read_manifest(&manifest_path)?;
        let tokens = manifest::read_dependencies(&original);
        let dependencies = PackageGroups::classify(&tokens)?;
        InstallUseCase::new(self.context, self.ports).install_groups(&dependencies)?;

        let source_tokens: Vec<String> = tokens
            .into_iter()
            .filter(|t| PackageReference::parse(t).is_ok_and(|r| r.is_source()))
            .collect();
        let rewritten = rewrite_manifest(&manifest_path, &source_tokens)?;

        self.ports.events.on_event(BridgeEvent::Building {
            package: package.to_string(),
        });
        let built = self
            .ports
            .builder
            .build(dir, BuildOptions::default().with_sign(true));

        if rewritten && origin == Origin::Local {
            atomic_write(&manifest_path, original.as_bytes())?;
        }
        built.map_err(|e| BridgeError::Build {
            package: package.to_string(),
            output: e.output,
        })?;

        let janitor = self.context.janitor(self.ports.vcs);
        let artifacts = if self.context.retention().caches_artifacts() {
            janitor
                .cache_artifacts(dir)?
                .into_iter()
                .filter(|p| is_artifact_path(p))
                .collect()
        } else {
            files_with_suffix(dir, ARTIFACT_SUFFIX)?
        };
        if origin == Origin::WorkDir {
            janitor.clean(dir)?;
        }

        self.ports.events.on_event(BridgeEvent::Built {
            package: package.to_string(),
            artifacts: artifacts.clone(),
        });
        Ok(BuildOutcome {
            package: package.to_string(),
            version,
            artifacts,
        })
    }
}

fn is_artifact_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(ARTIFACT_SUFFIX))
}

/// Last segment of a remote URL without a `.git` suffix
fn repository_name(url: &str) -> &str {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last)
}

/// Whether `dir` looks like a local clone with a manifest
pub fn is_build_dir(dir: &Path) -> bool {
    dir.join(MANIFEST_FILE).is_file() && fs::metadata(dir.join(".git")).is_ok()
}
