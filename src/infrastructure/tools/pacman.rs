//! pacman adapter for the HostPackageManager port

use std::collections::HashSet;

use crate::domain::ports::{HostPackageManager, ToolError, ToolResult};
use crate::domain::services::tool_output;
use crate::infrastructure::process;

const PROGRAM: &str = "pacman";

#[derive(Debug, Clone, Copy, Default)]
pub struct Pacman;

impl Pacman {
    pub fn new() -> Self {
        Self
    }
}

impl HostPackageManager for Pacman {
    fn is_installed(&self, name: &str) -> bool {
        process::run(PROGRAM, ["-Q", name], None).is_ok()
    }

    fn searchable_names(&self) -> Result<HashSet<String>, ToolError> {
        let out = process::run(PROGRAM, ["-Ssq"], None)?;
        Ok(tool_output::parse_name_list(&out))
    }

    fn install(&self, names: &[String]) -> ToolResult {
        let mut args = vec!["--noconfirm".to_string(), "-S".to_string()];
        args.extend(names.iter().cloned());
        process::run_privileged(PROGRAM, args, None)
    }

    fn remove(&self, names: &[String]) -> ToolResult {
        let mut args = vec!["--noconfirm".to_string(), "-R".to_string()];
        args.extend(names.iter().cloned());
        process::run_privileged(PROGRAM, args, None)
    }
}
