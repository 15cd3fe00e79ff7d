//! Serve directory watcher
//!
//! Artifacts dropped into the serve directory by any means (push handler,
//! `cp`, `rsync`) are indexed without a request. Events are collected for a
//! short debounce window so that one copy producing several notifications
//! is indexed once.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::domain::entities::is_artifact_name;
use crate::error::{BridgeError, BridgeResult};

use super::indexer::Indexer;

/// Quiet period before pending artifacts are indexed
pub const DEBOUNCE_MS: u64 = 100;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Artifacts seen since the last flush
#[derive(Debug, Default)]
pub struct PendingArtifacts {
    paths: BTreeSet<PathBuf>,
    last_change: Option<Instant>,
}

impl PendingArtifacts {
    pub fn add(&mut self, path: PathBuf, now: Instant) {
        self.paths.insert(path);
        self.last_change = Some(now);
    }

    /// True once the debounce window has passed since the last addition
    pub fn is_ready(&self, now: Instant) -> bool {
        match self.last_change {
            Some(last) => {
                !self.paths.is_empty()
                    && now.duration_since(last) >= Duration::from_millis(DEBOUNCE_MS)
            }
            None => false,
        }
    }

    pub fn take(&mut self) -> Vec<PathBuf> {
        self.last_change = None;
        std::mem::take(&mut self.paths).into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Artifact paths named by a creation or rename-into event
pub fn artifact_paths(event: &Event) -> Vec<PathBuf> {
    let relevant = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To | RenameMode::Both))
    );
    if !relevant {
        return Vec::new();
    }
    let candidates: &[PathBuf] = match event.kind {
        // Both carries [from, to]
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => event.paths.get(1..).unwrap_or(&[]),
        _ => &event.paths,
    };
    candidates
        .iter()
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_artifact_name)
        })
        .cloned()
        .collect()
}

/// Start watching `indexer.dir()` on a dedicated thread until `shutdown`
/// is raised. Failing to register the watch is returned to the caller.
pub fn spawn(indexer: Arc<Indexer>, shutdown: Arc<AtomicBool>) -> BridgeResult<JoinHandle<()>> {
    let dir = indexer.dir().to_path_buf();
    let (tx, rx) = channel::<Vec<PathBuf>>();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                let paths = artifact_paths(&event);
                if !paths.is_empty() {
                    let _ = tx.send(paths);
                }
            }
            Err(e) => warn!("watch error: {}", e),
        },
        notify::Config::default(),
    )
    .map_err(|e| watch_error(&dir, e))?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .map_err(|e| watch_error(&dir, e))?;
    debug!("watching {} for new packages", dir.display());

    let handle = thread::Builder::new()
        .name("pkgbridge-watcher".to_string())
        .spawn(move || {
            // Keep the watcher alive for the lifetime of the loop.
            let _watcher = watcher;
            let mut pending = PendingArtifacts::default();
            while !shutdown.load(Ordering::SeqCst) {
                match rx.recv_timeout(POLL_INTERVAL) {
                    Ok(paths) => {
                        let now = Instant::now();
                        for path in paths {
                            pending.add(path, now);
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
                if pending.is_ready(Instant::now()) {
                    flush(&indexer, pending.take());
                }
            }
        })?;
    Ok(handle)
}

fn flush(indexer: &Indexer, paths: Vec<PathBuf>) {
    for path in paths {
        // Renamed away or removed again before the window closed.
        if !path.is_file() {
            continue;
        }
        indexer.add_logged(&path, false);
    }
}

fn watch_error(dir: &Path, e: notify::Error) -> BridgeError {
    BridgeError::Io(std::io::Error::other(format!(
        "unable to watch {}: {}",
        dir.display(),
        e
    )))
}
