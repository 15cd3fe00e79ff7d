//! Registry artifacts - built package files identified by file name
//!
//! File names follow `name-pkgver-pkgrel-arch.pkg.tar.zst`, where `pkgver`
//! may carry an `epoch:` prefix. The package name itself may contain dashes;
//! it is everything before the last three dash-delimited tokens.

use std::path::{Path, PathBuf};

use crate::domain::value_objects::PackageVersion;
use crate::error::{BridgeError, BridgeResult};

/// Suffix every uploadable artifact must carry
pub const ARTIFACT_SUFFIX: &str = ".pkg.tar.zst";

/// Suffix of a detached signature next to an artifact
pub const SIGNATURE_SUFFIX: &str = ".sig";

/// True when `filename` looks like a package artifact (not its signature)
pub fn is_artifact_name(filename: &str) -> bool {
    filename.len() > ARTIFACT_SUFFIX.len() && filename.ends_with(ARTIFACT_SUFFIX)
}

/// Recover the package name: drop the last three dash-delimited tokens.
pub fn package_name_from_filename(filename: &str) -> BridgeResult<String> {
    let tokens: Vec<&str> = filename.split('-').collect();
    if tokens.len() < 4 {
        return Err(invalid(filename));
    }
    Ok(tokens[..tokens.len() - 3].join("-"))
}

/// A built package file plus the name of its detached signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryArtifact {
    filename: String,
    name: String,
    version: PackageVersion,
    arch: String,
}

impl RegistryArtifact {
    pub fn from_filename(filename: &str) -> BridgeResult<Self> {
        let stem = filename
            .strip_suffix(ARTIFACT_SUFFIX)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| invalid(filename))?;
        let tokens: Vec<&str> = stem.split('-').collect();
        if tokens.len() < 4 || tokens.iter().any(|t| t.is_empty()) {
            return Err(invalid(filename));
        }
        let n = tokens.len();
        Ok(Self {
            filename: filename.to_string(),
            name: tokens[..n - 3].join("-"),
            version: PackageVersion::parse(&format!("{}-{}", tokens[n - 3], tokens[n - 2])),
            arch: tokens[n - 1].to_string(),
        })
    }

    pub fn from_path(path: &Path) -> BridgeResult<Self> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| invalid(&path.display().to_string()))?;
        Self::from_filename(filename)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &PackageVersion {
        &self.version
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn signature_filename(&self) -> String {
        format!("{}{}", self.filename, SIGNATURE_SUFFIX)
    }

    pub fn signature_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.signature_filename())
    }
}

fn invalid(filename: &str) -> BridgeError {
    BridgeError::Index {
        file: filename.to_string(),
        repo: String::new(),
        output: "not a valid package file name".to_string(),
    }
}
