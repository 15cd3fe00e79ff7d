//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer. Every external
//! tool is reached through one of them; infrastructure provides the
//! concrete command-line adapters.

pub mod build_tool;
pub mod events;
pub mod index_tool;
pub mod installed_store;
pub mod package_manager;
pub mod signer;
pub mod tool;
pub mod uploader;
pub mod vcs;

pub use build_tool::{BuildOptions, BuildTool};
pub use events::{BridgeEvent, EventSink, NoopEventSink};
pub use index_tool::IndexTool;
pub use installed_store::InstalledStore;
pub use package_manager::HostPackageManager;
pub use signer::{identity_email, Signer};
pub use tool::{ToolError, ToolResult};
pub use uploader::{UploadRequest, Uploader};
pub use vcs::VersionControl;
