//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all process and file I/O.
//!
//! ## Structure
//!
//! - `process` - Captured command execution for every external tool
//! - `http` - Streaming upload client for the push command
//! - `events/` - NDJSON event sink
//! - `tools/` - pacman, git, makepkg, gpg and repo-add adapters
//! - `repositories/` - Installed-set map and index ledger persistence
//! - `lock` - Process-wide advisory lock
//! - `workspace` - Manifest rewrite, artifact caching, clone cleanup

pub mod events;
pub mod fs;
pub mod http;
pub mod lock;
pub mod process;
pub mod repositories;
pub mod tools;
pub mod workspace;

pub use events::JsonEventSink;
pub use http::HttpUploader;
pub use lock::ProcessLock;
pub use repositories::{FileInstalledStore, MemoryInstalledStore, TomlIndexRepository};
pub use tools::{Git, Gpg, Makepkg, Pacman, RepoAdd};
pub use workspace::Janitor;
