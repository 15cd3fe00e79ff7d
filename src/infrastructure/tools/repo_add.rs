//! repo-add adapter for the IndexTool port

use std::ffi::OsStr;
use std::path::Path;

use crate::domain::ports::{IndexTool, ToolResult};
use crate::infrastructure::process;

const PROGRAM: &str = "repo-add";

/// `repo-add --new [--prevent-downgrade] <db> <artifact>`
///
/// `--prevent-downgrade` is passed when enabled and the add is not forced.
#[derive(Debug, Clone, Copy)]
pub struct RepoAdd {
    prevent_downgrade: bool,
}

impl RepoAdd {
    pub fn new(prevent_downgrade: bool) -> Self {
        Self { prevent_downgrade }
    }
}

impl Default for RepoAdd {
    fn default() -> Self {
        Self::new(true)
    }
}

impl IndexTool for RepoAdd {
    fn add(&self, db: &Path, artifact: &Path, force: bool) -> ToolResult {
        let mut args: Vec<&OsStr> = vec![OsStr::new("--new")];
        if self.prevent_downgrade && !force {
            args.push(OsStr::new("--prevent-downgrade"));
        }
        args.push(db.as_os_str());
        args.push(artifact.as_os_str());
        process::run(PROGRAM, args, None)
    }
}
