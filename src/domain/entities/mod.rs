//! Domain Entities
//!
//! Core data of the package bridge. Pure data, no I/O.

mod artifact;
mod index;
mod installed;
mod reference;
mod resolved;

pub use artifact::{
    is_artifact_name, package_name_from_filename, RegistryArtifact, ARTIFACT_SUFFIX,
    SIGNATURE_SUFFIX,
};
pub use index::{IndexChange, IndexEntry, RepositoryIndex};
pub use installed::InstalledSet;
pub use reference::{Namespace, PackageGroups, PackageReference};
pub use resolved::{ResolvedSourcePackage, MANIFEST_FILE};
