//! gpg adapter for the Signer port

use std::ffi::OsStr;
use std::path::Path;

use crate::domain::ports::{Signer, ToolError, ToolResult};
use crate::domain::services::tool_output;
use crate::infrastructure::process;

const PROGRAM: &str = "gpg";

#[derive(Debug, Clone, Copy, Default)]
pub struct Gpg;

impl Gpg {
    pub fn new() -> Self {
        Self
    }
}

impl Signer for Gpg {
    fn identity(&self) -> ToolResult {
        let out = process::run(PROGRAM, ["--list-secret-keys"], None)?;
        tool_output::parse_gpg_uid(&out).ok_or_else(|| ToolError::new(PROGRAM, None, out))
    }

    fn verify(&self, artifact: &Path, signature: &Path) -> ToolResult {
        process::run(
            PROGRAM,
            [OsStr::new("--verify"), signature.as_os_str(), artifact.as_os_str()],
            None,
        )
    }

    fn export_public_key(&self, email: &str) -> ToolResult {
        let out = process::run(PROGRAM, ["--armor", "--export", email], None)?;
        if tool_output::is_armored_public_key(&out) {
            Ok(out)
        } else {
            Err(ToolError::new(
                PROGRAM,
                None,
                format!("gpg: no public key for {email}\n{out}"),
            ))
        }
    }
}
