//! Repository Implementations
//!
//! Persistence for the installed-set mapping and the registry index ledger.

mod index;
mod installed;

pub use index::TomlIndexRepository;
pub use installed::{FileInstalledStore, MemoryInstalledStore};
