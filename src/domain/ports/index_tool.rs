//! IndexTool port - the external repository database builder
//!
//! The tool is assumed to serialize its own writes to a database file.

use std::path::Path;

use super::tool::ToolResult;

pub trait IndexTool: Send + Sync {
    /// Add or update `artifact` in the database at `db`. `force` lifts
    /// the tool's own downgrade protection.
    fn add(&self, db: &Path, artifact: &Path, force: bool) -> ToolResult;
}
