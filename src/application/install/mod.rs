//! Install Module
//!
//! Resolves, builds and installs native and source packages.
//!
//! ## Structure
//!
//! - `result` - Report of one install call (`InstallReport`)
//! - `use_case` - The orchestrator (`InstallUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use pkgbridge::application::install::InstallUseCase;
//!
//! let use_case = InstallUseCase::new(&context, ports);
//! let report = use_case.install(&["curl", "github.com/owner/tool@v1"])?;
//! ```

mod result;
mod use_case;

pub use result::InstallReport;
pub use use_case::InstallUseCase;
