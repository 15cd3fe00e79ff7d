//! makepkg adapter for the BuildTool port

use std::path::Path;

use crate::domain::ports::{BuildOptions, BuildTool, ToolResult};
use crate::infrastructure::process;

const PROGRAM: &str = "makepkg";

#[derive(Debug, Clone, Copy, Default)]
pub struct Makepkg;

impl Makepkg {
    pub fn new() -> Self {
        Self
    }

    /// Flags for one build: always sync dependencies and overwrite old
    /// artifacts, never prompt.
    pub fn args(options: BuildOptions) -> Vec<&'static str> {
        let mut args = vec!["--syncdeps", "--force", "--noconfirm"];
        if options.install {
            args.push("--install");
        }
        if options.sign {
            args.push("--sign");
        }
        args
    }
}

impl BuildTool for Makepkg {
    fn build(&self, dir: &Path, options: BuildOptions) -> ToolResult {
        process::run(PROGRAM, Self::args(options), Some(dir))
    }
}
