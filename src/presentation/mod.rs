//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//! - Terminal output (colored lines or NDJSON)
//!
//! ## Structure
//!
//! - `cli` - Commands and global flags
//! - `factory` - Wires host tools into use cases (dependency injection)
//! - `printer` - Colored event printer with upload progress
//! - `terminal`, `theme`, `progress` - Capabilities, icons, progress bar

pub mod cli;
pub mod factory;
pub mod printer;
pub mod progress;
pub mod terminal;
pub mod theme;

pub use cli::{Cli, ColorWhen, Commands, ConfigAction};
pub use factory::{event_sink, printer_style, HostTools};
pub use printer::{render_error, Printer, PrinterStyle};
