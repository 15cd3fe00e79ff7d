//! Clone and version handling for source packages

use std::fs;
use std::path::Path;

use crate::domain::entities::PackageReference;
use crate::domain::ports::{ToolError, VersionControl};
use crate::domain::services::tool_output;
use crate::error::{BridgeError, BridgeResult};

/// How a working directory came to hold its clone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneState {
    Fresh,
    Reused,
}

/// Clone `reference` into `dir` unless a clone of the same repository is
/// already there. A clone of another repository (same short name,
/// different address) is replaced.
pub fn ensure_clone(
    vcs: &dyn VersionControl,
    reference: &PackageReference,
    dir: &Path,
    scheme: &str,
) -> BridgeResult<CloneState> {
    if dir.join(".git").exists() {
        if holds_clone_of(vcs, reference, dir) {
            return Ok(CloneState::Reused);
        }
        fs::remove_dir_all(dir)?;
    }
    match vcs.clone_repo(&reference.clone_url(scheme), dir) {
        Ok(_) => Ok(CloneState::Fresh),
        Err(e) if tool_output::is_existing_clone(&e.output) => Ok(CloneState::Reused),
        Err(e) => Err(vcs_error("clone", dir)(e)),
    }
}

fn holds_clone_of(vcs: &dyn VersionControl, reference: &PackageReference, dir: &Path) -> bool {
    vcs.remote_url(dir)
        .ok()
        .and_then(|url| remote_address(&url))
        .is_some_and(|address| address == reference.address())
}

/// `host/owner/name` of a remote URL. Scheme, user, trailing `/` and
/// `.git` are dropped; scp-style `user@host:owner/name` maps to
/// `host/owner/name`.
pub fn remote_address(url: &str) -> Option<String> {
    let url = url.trim();
    let (rest, scp_style) = match url.split_once("://") {
        Some((_, rest)) => (rest, false),
        None => (url, true),
    };
    let (authority, path) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
    let authority = authority.rsplit('@').next().unwrap_or(authority);
    let joined = match authority.split_once(':') {
        Some((host, first)) if scp_style => format!("{host}/{first}{path}"),
        _ => format!("{authority}{path}"),
    };
    let joined = joined.trim_end_matches('/');
    let address = joined.strip_suffix(".git").unwrap_or(joined);
    (!address.is_empty()).then(|| address.to_string())
}

/// Checkout that treats "already on" as success.
pub fn checkout(vcs: &dyn VersionControl, dir: &Path, target: &str) -> BridgeResult<()> {
    match vcs.checkout(dir, target) {
        Ok(_) => Ok(()),
        Err(e) if tool_output::is_already_on_target(&e.output) => Ok(()),
        Err(e) => Err(BridgeError::Checkout {
            dir: dir.to_path_buf(),
            target: target.to_string(),
            output: e.output,
        }),
    }
}

/// Bring the default branch up to date and check out `pin`, or the head
/// commit of the default branch when `pin` is empty.
/// Returns `(branch, version)`.
pub fn resolve_version(
    vcs: &dyn VersionControl,
    dir: &Path,
    pin: &str,
) -> BridgeResult<(String, String)> {
    let branch = vcs.default_branch(dir).map_err(vcs_error("remote show", dir))?;
    checkout(vcs, dir, &branch)?;
    vcs.pull(dir).map_err(vcs_error("pull", dir))?;

    let version = if pin.is_empty() {
        vcs.last_commit(dir, &branch)
            .map_err(vcs_error("log", dir))?
            .trim()
            .to_string()
    } else {
        pin.to_string()
    };
    checkout(vcs, dir, &version)?;
    Ok((branch, version))
}

pub(crate) fn vcs_error<'a>(action: &'a str, dir: &'a Path) -> impl Fn(ToolError) -> BridgeError + 'a {
    move |e| BridgeError::Vcs {
        action: action.to_string(),
        dir: dir.to_path_buf(),
        output: e.output,
    }
}
