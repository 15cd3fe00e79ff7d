//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `InstallUseCase` - Pre-check, batched native install, depth-first source install
//! - `BuildUseCase` - Signed builds without installing, from references or a local clone
//! - `RemoveUseCase` - Batched uninstall and installed-map cleanup
//! - `PushUseCase` - Upload built artifacts to a registry
//! - `GenerateUseCase` - Starter PKGBUILD and README install notes for a checkout

pub mod build;
pub mod context;
pub mod generate;
pub mod install;
pub mod push;
pub mod reachability;
pub mod remove;
pub mod signing;
pub mod source;
#[cfg(test)]
pub(crate) mod testing;

pub use build::{is_build_dir, BuildOutcome, BuildUseCase};
pub use context::{Context, Ports};
pub use generate::{GenerateOptions, GenerateUseCase};
pub use install::{InstallReport, InstallUseCase};
pub use push::{PushOptions, PushTarget, PushUseCase};
pub use remove::RemoveUseCase;
pub use signing::{export_public_key, signing_email};
