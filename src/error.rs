//! Error types for pkgbridge
//!
//! Library errors use `thiserror`; the binary wraps them in `anyhow`.
//! Every variant that originates from an external tool keeps that tool's
//! captured output verbatim so the caller can show it unchanged.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::entities::Namespace;
use crate::domain::ports::ToolError;

/// Result type alias for pkgbridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Main error type for pkgbridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Malformed package reference
    #[error("invalid package reference '{input}': {reason}")]
    Classification { input: String, reason: String },

    /// One or more packages cannot be reached (all offenders listed)
    #[error("unable to resolve {namespace} packages: {}", names.join(" "))]
    Unreachable {
        namespace: Namespace,
        names: Vec<String>,
    },

    /// Version control could not switch to the requested ref
    #[error("unable to checkout '{target}' in {dir}:\n{output}")]
    Checkout {
        dir: PathBuf,
        target: String,
        output: String,
    },

    /// Any other version control failure (clone, pull, log, remote)
    #[error("git {action} failed for {dir}:\n{output}")]
    Vcs {
        action: String,
        dir: PathBuf,
        output: String,
    },

    /// Host build tool failed
    #[error("unable to build package {package}:\n{output}")]
    Build { package: String, output: String },

    /// Host package manager failed to install
    #[error("unable to install packages {}:\n{output}", names.join(" "))]
    Install { names: Vec<String>, output: String },

    /// Host package manager failed to remove
    #[error("unable to remove packages {}:\n{output}", names.join(" "))]
    Remove { names: Vec<String>, output: String },

    /// Manifest is missing or cannot be read
    #[error("invalid manifest {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    /// Detached signature failed verification
    #[error("signature verification failed for {file}:\n{output}")]
    Signature { file: String, output: String },

    /// Index tool rejected or failed to add an artifact
    #[error("unable to index {file} into {repo}:\n{output}")]
    Index {
        file: String,
        repo: String,
        output: String,
    },

    /// Artifact version is lower than the one already indexed
    #[error("refusing to downgrade {package} from {current} to {candidate}")]
    Downgrade {
        package: String,
        current: String,
        candidate: String,
    },

    /// Push client failure
    #[error("push failed: {0}")]
    Push(String),

    /// Local signing key unusable or not exportable
    #[error("signing key: {0}")]
    Key(String),

    /// Installed-set store failure
    #[error("installed package map {path}: {message}")]
    Store { path: PathBuf, message: String },

    /// Configuration could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// Another process holds the orchestrator lock
    #[error("another pkgbridge process holds the lock {path}: {message}")]
    Lock { path: PathBuf, message: String },

    /// External tool failure outside the named categories
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl BridgeError {
    /// Captured tool output carried by this error, if any
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            BridgeError::Checkout { output, .. }
            | BridgeError::Vcs { output, .. }
            | BridgeError::Build { output, .. }
            | BridgeError::Install { output, .. }
            | BridgeError::Remove { output, .. }
            | BridgeError::Signature { output, .. }
            | BridgeError::Index { output, .. } => Some(output),
            BridgeError::Tool(e) => Some(&e.output),
            _ => None,
        }
    }
}
