//! Domain Layer
//!
//! The core of pkgbridge - package references, manifests, the installed
//! set and the registry index, without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - References, resolved source packages, installed set, artifacts, index
//! - `value_objects/` - Package versions and the retention policy
//! - `services/` - Manifest reader/rewriter, tool output classifiers, install planner
//! - `ports/` - Interfaces for every external tool
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never runs a process or touches the network
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All tool access goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
