//! Reachability pre-check
//!
//! Runs before anything is installed. Every unreachable name is collected
//! before the single aggregate error is returned.
//!
//! Source checks fan out over a bounded group of scoped threads. The first
//! failure raises a shared cancel flag so idle workers stop taking new
//! references; checks already in flight still report.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use crate::domain::entities::{Namespace, PackageReference, MANIFEST_FILE};
use crate::domain::ports::{HostPackageManager, VersionControl};
use crate::error::{BridgeError, BridgeResult};

use super::source::ensure_clone;

/// Every native name must be known to the host manager's sync databases
/// (or already installed).
pub fn check_native(packages: &dyn HostPackageManager, names: &[String]) -> BridgeResult<()> {
    if names.is_empty() {
        return Ok(());
    }
    let known = packages.searchable_names()?;
    let missing: Vec<String> = names
        .iter()
        .filter(|n| !known.contains(n.as_str()) && !packages.is_installed(n))
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(BridgeError::Unreachable {
            namespace: Namespace::Native,
            names: missing,
        })
    }
}

/// Every source reference must clone (or already be cloned) and carry a
/// manifest. References sharing a working directory run on the same
/// worker, one repository after another, and each distinct address is
/// checked once.
pub fn check_sources(
    vcs: &dyn VersionControl,
    refs: &[PackageReference],
    work_root: &Path,
    scheme: &str,
    concurrency: usize,
) -> BridgeResult<()> {
    // One check per working directory, in first-seen order.
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut by_dir: HashMap<&str, usize> = HashMap::new();
    for (i, r) in refs.iter().enumerate() {
        match by_dir.get(r.short_name()) {
            Some(&g) => groups[g].push(i),
            None => {
                by_dir.insert(r.short_name(), groups.len());
                groups.push(vec![i]);
            }
        }
    }
    if groups.is_empty() {
        return Ok(());
    }

    let workers = concurrency.clamp(1, groups.len());
    let next = AtomicUsize::new(0);
    let cancelled = AtomicBool::new(false);
    let failed: Mutex<Vec<usize>> = Mutex::new(Vec::new());

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                if cancelled.load(Ordering::SeqCst) {
                    break;
                }
                let g = next.fetch_add(1, Ordering::SeqCst);
                let Some(members) = groups.get(g) else {
                    break;
                };
                let mut outcomes: Vec<(&str, bool)> = Vec::new();
                for &i in members {
                    let address = refs[i].address();
                    let ok = match outcomes.iter().find(|(a, _)| *a == address) {
                        Some(&(_, ok)) => ok,
                        None => {
                            let ok = check_one(vcs, &refs[i], work_root, scheme).is_ok();
                            outcomes.push((address, ok));
                            ok
                        }
                    };
                    if !ok {
                        if let Ok(mut failed) = failed.lock() {
                            failed.push(i);
                        }
                        cancelled.store(true, Ordering::SeqCst);
                    }
                }
            });
        }
    });

    let mut failed = failed.into_inner().unwrap_or_else(|e| e.into_inner());
    if failed.is_empty() {
        return Ok(());
    }
    failed.sort_unstable();
    Err(BridgeError::Unreachable {
        namespace: Namespace::Source,
        names: failed.into_iter().map(|i| refs[i].to_string()).collect(),
    })
}

fn check_one(
    vcs: &dyn VersionControl,
    reference: &PackageReference,
    work_root: &Path,
    scheme: &str,
) -> BridgeResult<()> {
    let dir = work_root.join(reference.short_name());
    ensure_clone(vcs, reference, &dir, scheme)?;
    let manifest = dir.join(MANIFEST_FILE);
    if manifest.is_file() {
        Ok(())
    } else {
        Err(BridgeError::Manifest {
            path: manifest,
            message: "not found".to_string(),
        })
    }
}
