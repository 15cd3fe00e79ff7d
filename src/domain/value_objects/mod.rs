//! Value Objects
//!
//! Immutable types compared by value.

mod retention;
mod version;

pub use retention::RetentionPolicy;
pub use version::{segment_cmp, PackageVersion};
