//! VersionControl port - the git client
//!
//! All operations act on a local working directory and return the tool's
//! output unchanged, so callers can classify it (see
//! `domain::services::tool_output`).

use std::path::Path;

use super::tool::ToolResult;

pub trait VersionControl: Send + Sync {
    /// Clone `url` into `dir`
    fn clone_repo(&self, url: &str, dir: &Path) -> ToolResult;

    /// Switch the working tree to a branch, tag or commit
    fn checkout(&self, dir: &Path, target: &str) -> ToolResult;

    /// Fetch and merge the current branch's upstream
    fn pull(&self, dir: &Path) -> ToolResult;

    /// Hash of the last commit on `refname`
    fn last_commit(&self, dir: &Path, refname: &str) -> ToolResult;

    /// The remote's default (HEAD) branch name
    fn default_branch(&self, dir: &Path) -> ToolResult;

    /// Drop untracked files and hard-reset tracked changes
    fn clean(&self, dir: &Path) -> ToolResult;

    /// Fetch URL of the `origin` remote
    fn remote_url(&self, dir: &Path) -> ToolResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_control_is_object_safe() {
        fn _assert_object_safe(_: &dyn VersionControl) {}
    }
}
