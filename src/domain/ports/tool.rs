//! Shared failure type for external command-line collaborators
//!
//! Every collaborator (package manager, git, build tool, signer, index tool)
//! is a black box that returns its combined text output, or this error.

use thiserror::Error;

/// A tool could not be started or exited unsuccessfully
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{program} failed ({}): {output}", code.map(|c| c.to_string()).unwrap_or_else(|| "no exit code".to_string()))]
pub struct ToolError {
    /// Program name as invoked
    pub program: String,
    /// Exit code, `None` when killed by a signal or never started
    pub code: Option<i32>,
    /// Combined stdout + stderr, verbatim
    pub output: String,
}

impl ToolError {
    pub fn new(program: impl Into<String>, code: Option<i32>, output: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            code,
            output: output.into(),
        }
    }
}

/// Result of a tool invocation: captured output on success
pub type ToolResult = Result<String, ToolError>;
