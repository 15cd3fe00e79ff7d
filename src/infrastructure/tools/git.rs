//! git adapter for the VersionControl port
//!
//! Every call uses `git -C <dir>` so the process working directory is
//! never changed.

use std::ffi::OsStr;
use std::path::Path;

use crate::domain::ports::{ToolError, ToolResult, VersionControl};
use crate::domain::services::tool_output;
use crate::infrastructure::process;

const PROGRAM: &str = "git";

#[derive(Debug, Clone, Copy, Default)]
pub struct Git;

impl Git {
    pub fn new() -> Self {
        Self
    }

    fn in_dir(&self, dir: &Path, args: &[&str]) -> ToolResult {
        let mut full: Vec<&OsStr> = vec![OsStr::new("-C"), dir.as_os_str()];
        full.extend(args.iter().map(|a| OsStr::new(*a)));
        process::run(PROGRAM, full, None)
    }
}

impl VersionControl for Git {
    fn clone_repo(&self, url: &str, dir: &Path) -> ToolResult {
        let args = [OsStr::new("clone"), OsStr::new(url), dir.as_os_str()];
        process::run(PROGRAM, args, None)
    }

    fn checkout(&self, dir: &Path, target: &str) -> ToolResult {
        self.in_dir(dir, &["checkout", target])
    }

    fn pull(&self, dir: &Path) -> ToolResult {
        self.in_dir(dir, &["pull"])
    }

    fn last_commit(&self, dir: &Path, refname: &str) -> ToolResult {
        let out = self.in_dir(dir, &["log", "-n", "1", "--pretty=format:%H", refname])?;
        Ok(out.trim().to_string())
    }

    fn default_branch(&self, dir: &Path) -> ToolResult {
        let remotes = self.in_dir(dir, &["remote", "show"])?;
        let remote = tool_output::first_line(&remotes).ok_or_else(|| {
            ToolError::new(PROGRAM, None, format!("no remote configured in {}", dir.display()))
        })?;
        let info = self.in_dir(dir, &["remote", "show", &remote])?;
        tool_output::parse_head_branch(&info)
            .ok_or_else(|| ToolError::new(PROGRAM, None, info))
    }

    fn clean(&self, dir: &Path) -> ToolResult {
        let mut out = self.in_dir(dir, &["clean", "-xdf"])?;
        out.push_str(&self.in_dir(dir, &["reset", "--hard"])?);
        Ok(out)
    }

    fn remote_url(&self, dir: &Path) -> ToolResult {
        let out = self.in_dir(dir, &["config", "--get", "remote.origin.url"])?;
        Ok(out.trim().to_string())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn failing_command_reports_git_program() {
        if !process::is_available(PROGRAM) {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let err = Git::new().pull(&dir.path().join("missing")).unwrap_err();
        assert_eq!(err.program, "git");
        assert!(!err.output.is_empty());
    }
}
