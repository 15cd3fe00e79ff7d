//! Bridge Event Port
//!
//! Observable progress of install, build, remove and push operations.
//! The terminal printer and the NDJSON stream both implement the sink.

use std::path::PathBuf;

/// Event emitted while the orchestrator or push client works
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// References accepted for an operation
    Started { command: String, packages: Vec<String> },

    /// Host packages installed in one batch
    NativeInstalled { names: Vec<String> },

    /// A fresh clone was made
    Cloned { address: String, dir: PathBuf },

    /// An existing clone is reused
    Reused { address: String, dir: PathBuf },

    /// Working tree switched to the resolved version
    CheckedOut {
        address: String,
        branch: String,
        version: String,
    },

    /// Source dependencies found in a manifest
    Resolving { address: String, dependencies: Vec<String> },

    /// Build tool started
    Building { package: String },

    /// Source package built, installed and recorded
    Installed { address: String, short_name: String },

    /// Source package built without installing
    Built {
        package: String,
        artifacts: Vec<PathBuf>,
    },

    /// Template files written for a repository
    Generated { package: String, files: Vec<PathBuf> },

    /// Reference passed over by the planner
    Skipped { address: String, reason: String },

    /// Host packages removed in one batch
    Removed { names: Vec<String> },

    /// Upload began
    UploadStarted { file: String, url: String, size: u64 },

    /// Bytes handed to the connection so far
    UploadProgress { file: String, sent: u64, total: u64 },

    /// Registry accepted the artifact
    Uploaded { file: String },

    /// Operation finished
    Completed { command: String },
}

/// Trait for receiving bridge events
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: BridgeEvent);

    /// Whether per-chunk events such as upload progress are wanted
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn on_event(&self, _event: BridgeEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
