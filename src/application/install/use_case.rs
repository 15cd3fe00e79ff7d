//! Install Use Case
//!
//! Orchestrates the install flow:
//! 1. Classify references into native and source groups
//! 2. Reachability pre-check of both groups
//! 3. Batched install of the native group
//! 4. Depth-first install of the source group: clone, pin, recurse into
//!    source dependencies, rewrite the manifest, build, record, cache, clean
//!
//! Every mutating step runs sequentially on the calling thread.

use std::collections::HashMap;

use crate::application::context::{Context, Ports};
use crate::application::reachability;
use crate::application::source::{ensure_clone, resolve_version, vcs_error, CloneState};
use crate::domain::entities::{InstalledSet, PackageGroups, PackageReference, ResolvedSourcePackage};
use crate::domain::ports::{BridgeEvent, BuildOptions};
use crate::domain::services::{manifest, walk, PlanVisitor};
use crate::error::{BridgeError, BridgeResult};
use crate::infrastructure::workspace::{read_manifest, rewrite_manifest};

use super::result::InstallReport;

pub struct InstallUseCase<'a> {
    context: &'a Context,
    ports: Ports<'a>,
}

impl<'a> InstallUseCase<'a> {
    pub fn new(context: &'a Context, ports: Ports<'a>) -> Self {
        Self { context, ports }
    }

    /// Install every reference and the transitive closure of its dependencies.
    pub fn install<S: AsRef<str>>(&self, refs: &[S]) -> BridgeResult<InstallReport> {
        let groups = PackageGroups::classify(refs)?;
        self.ports.events.on_event(BridgeEvent::Started {
            command: "install".to_string(),
            packages: groups
                .native
                .iter()
                .chain(&groups.source)
                .map(PackageReference::key)
                .collect(),
        });

        let report = self.install_groups(&groups)?;

        self.ports.events.on_event(BridgeEvent::Completed {
            command: "install".to_string(),
        });
        Ok(report)
    }

    /// Install already classified groups. Nothing is installed unless every
    /// reference passes the reachability pre-check.
    pub fn install_groups(&self, groups: &PackageGroups) -> BridgeResult<InstallReport> {
        let native = groups.native_names();
        reachability::check_native(self.ports.packages, &native)?;

        let installed = self.ports.store.load()?;
        let unrecorded: Vec<PackageReference> = groups
            .source
            .iter()
            .filter(|r| !self.is_installed(&installed, r))
            .cloned()
            .collect();
        reachability::check_sources(
            self.ports.vcs,
            &unrecorded,
            self.context.work_dir(),
            self.context.scheme(),
            self.context.check_concurrency(),
        )?;

        let native_installed = self.install_native(&native)?;

        let mut installer = SourceInstaller {
            use_case: self,
            installed,
            prepared: HashMap::new(),
            native_installed,
            source_installed: Vec::new(),
        };
        let outcome = walk(&groups.source, &mut installer)?;

        for skip in &outcome.skipped {
            self.ports.events.on_event(BridgeEvent::Skipped {
                address: skip.reference.key(),
                reason: skip.reason.to_string(),
            });
        }

        Ok(InstallReport {
            native_installed: installer.native_installed,
            source_installed: installer.source_installed,
            skipped: outcome.skipped,
        })
    }

    /// One batched host install of the names not installed yet.
    /// Returns the names handed to the host manager.
    pub fn install_native(&self, names: &[String]) -> BridgeResult<Vec<String>> {
        let mut missing: Vec<String> = Vec::new();
        for name in names {
            if !missing.contains(name) && !self.ports.packages.is_installed(name) {
                missing.push(name.clone());
            }
        }
        if missing.is_empty() {
            return Ok(missing);
        }

        self.ports
            .packages
            .install(&missing)
            .map_err(|e| BridgeError::Install {
                names: missing.clone(),
                output: e.output,
            })?;
        self.ports.events.on_event(BridgeEvent::NativeInstalled {
            names: missing.clone(),
        });
        Ok(missing)
    }

    /// Recorded under its exact key, recorded under any pin of its address,
    /// or known to the host manager by short name.
    pub fn is_installed(&self, installed: &InstalledSet, reference: &PackageReference) -> bool {
        installed.contains(&reference.key())
            || installed.keys_for_address(reference.address()).next().is_some()
            || self.ports.packages.is_installed(reference.short_name())
    }
}

/// A source package between `enter` and `finish`
struct Prepared {
    package: ResolvedSourcePackage,
    native: Vec<String>,
    source_tokens: Vec<String>,
}

struct SourceInstaller<'u, 'a> {
    use_case: &'u InstallUseCase<'a>,
    installed: InstalledSet,
    prepared: HashMap<String, Prepared>,
    native_installed: Vec<String>,
    source_installed: Vec<String>,
}

impl SourceInstaller<'_, '_> {
    fn emit(&self, event: BridgeEvent) {
        self.use_case.ports.events.on_event(event);
    }
}

impl PlanVisitor for SourceInstaller<'_, '_> {
    fn is_installed(&mut self, reference: &PackageReference) -> BridgeResult<bool> {
        Ok(self.use_case.is_installed(&self.installed, reference))
    }

    fn enter(&mut self, reference: &PackageReference) -> BridgeResult<Vec<PackageReference>> {
        let ports = self.use_case.ports;
        let context = self.use_case.context;
        let mut package = ResolvedSourcePackage::new(reference.clone(), context.work_dir());
        let dir = package.work_dir().to_path_buf();

        match ensure_clone(ports.vcs, reference, &dir, context.scheme())? {
            CloneState::Fresh => self.emit(BridgeEvent::Cloned {
                address: reference.address().to_string(),
                dir: dir.clone(),
            }),
            CloneState::Reused => {
                // Drop a manifest rewrite left behind by an interrupted run.
                ports.vcs.clean(&dir).map_err(vcs_error("clean", &dir))?;
                self.emit(BridgeEvent::Reused {
                    address: reference.address().to_string(),
                    dir: dir.clone(),
                });
            }
        }

        let (branch, version) = resolve_version(ports.vcs, &dir, reference.pin())?;
        self.emit(BridgeEvent::CheckedOut {
            address: reference.address().to_string(),
            branch: branch.clone(),
            version: version.clone(),
        });
        package.set_resolved(branch, version);

        let content = read_manifest(&package.manifest_path())?;
        let mut native = Vec::new();
        let mut source = Vec::new();
        let mut source_tokens = Vec::new();
        for token in manifest::read_dependencies(&content) {
            let dependency = PackageReference::parse(&token)?;
            if dependency.is_source() {
                source.push(dependency);
                source_tokens.push(token);
            } else {
                native.push(dependency.address().to_string());
            }
        }

        if !source.is_empty() {
            self.emit(BridgeEvent::Resolving {
                address: reference.address().to_string(),
                dependencies: source.iter().map(PackageReference::key).collect(),
            });
        }
        self.prepared.insert(
            reference.key(),
            Prepared {
                package,
                native,
                source_tokens,
            },
        );
        Ok(source)
    }

    fn finish(&mut self, reference: &PackageReference) -> BridgeResult<()> {
        let Some(prepared) = self.prepared.remove(&reference.key()) else {
            return Ok(());
        };
        let ports = self.use_case.ports;
        let dir = prepared.package.work_dir();

        let native = self.use_case.install_native(&prepared.native)?;
        self.native_installed.extend(native);

        rewrite_manifest(&prepared.package.manifest_path(), &prepared.source_tokens)?;

        self.emit(BridgeEvent::Building {
            package: reference.short_name().to_string(),
        });
        ports
            .builder
            .build(dir, BuildOptions::install())
            .map_err(|e| BridgeError::Build {
                package: reference.short_name().to_string(),
                output: e.output,
            })?;

        ports.store.put(&reference.key(), reference.short_name())?;
        self.installed.insert(reference.key(), reference.short_name());

        let janitor = self.use_case.context.janitor(ports.vcs);
        janitor.cache_artifacts(dir)?;
        janitor.clean(dir)?;

        self.emit(BridgeEvent::Installed {
            address: reference.key(),
            short_name: reference.short_name().to_string(),
        });
        self.source_installed.push(reference.key());
        Ok(())
    }
}
