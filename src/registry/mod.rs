//! Registry Service
//!
//! HTTP endpoint accepting signed artifact uploads and serving the
//! repository directory, plus a watcher that indexes artifacts placed
//! there by other means.
//!
//! ## Structure
//!
//! - `server` - Listener, accept loop, startup scan and shutdown
//! - `router` - Method/path dispatch
//! - `push` - Upload validation, signature check, storage, indexing
//! - `files` - Static `/repo/` files
//! - `body` - Response bodies, streamed for served files
//! - `indexer` - Ledger-backed incremental indexing under a file lock
//! - `watcher` - Debounced serve directory notifications

pub mod body;
pub mod files;
pub mod indexer;
pub mod push;
pub mod router;
pub mod server;
pub mod watcher;

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::ports::Signer;

pub use indexer::Indexer;
pub use router::route;
pub use server::RegistryServer;

/// Shared by every request
pub struct RegistryState {
    pub dir: PathBuf,
    pub signer: Arc<dyn Signer>,
    pub indexer: Arc<Indexer>,
}

impl RegistryState {
    pub fn new(dir: impl Into<PathBuf>, signer: Arc<dyn Signer>, indexer: Arc<Indexer>) -> Self {
        Self {
            dir: dir.into(),
            signer,
            indexer,
        }
    }
}
