//! pkgbridge - decentralized package distribution for pacman hosts
//!
//! Installs native packages through the host package manager and source
//! packages straight from git hosts (`host/owner/name[@pin]`), builds and
//! signs artifacts, pushes them to a registry, and runs that registry:
//! a small HTTP service that verifies uploads and keeps a repository
//! database current.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;
pub mod registry;

// Re-exports for convenience
pub use config::Config;
pub use domain::entities::{Namespace, PackageGroups, PackageReference};
pub use error::{BridgeError, BridgeResult};
