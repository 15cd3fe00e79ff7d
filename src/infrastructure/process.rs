//! Command execution for external tools
//!
//! Every adapter goes through [`run`]: the child's stdout and stderr are
//! captured and concatenated, and a nonzero exit becomes a [`ToolError`]
//! carrying that output verbatim.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::domain::ports::{ToolError, ToolResult};

/// Run `program` with `args`, optionally inside `dir`.
pub fn run<I, S>(program: &str, args: I, dir: Option<&Path>) -> ToolResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null());
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    let output = cmd
        .output()
        .map_err(|e| ToolError::new(program, None, e.to_string()))?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    if output.status.success() {
        Ok(text)
    } else {
        Err(ToolError::new(program, output.status.code(), text))
    }
}

/// Like [`run`] through `sudo` unless already running as root.
pub fn run_privileged<I, S>(program: &str, args: I, dir: Option<&Path>) -> ToolResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    if is_root() {
        return run(program, args, dir);
    }
    let mut full: Vec<std::ffi::OsString> = vec![program.into()];
    full.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
    run("sudo", full, dir).map_err(|mut e| {
        e.program = program.to_string();
        e
    })
}

/// True when `program --version` can be started and exits 0
pub fn is_available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn is_root() -> bool {
    std::env::var("USER").map(|u| u == "root").unwrap_or(false)
}
