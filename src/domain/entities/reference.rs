//! Package references
//!
//! A reference is the raw token a user (or a manifest) names a package by.
//! Classification is pure: no network, no filesystem.
//!
//! - `curl` → Native, address `curl`
//! - `github.com/owner/tool@v1.2` → Source, address `github.com/owner/tool`,
//!   short name `tool`, pin `v1.2`

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, BridgeResult};

/// Which resolver owns a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Resolvable by the host package manager directly
    Native,
    /// Built from a version-controlled repository
    Source,
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Namespace::Native => write!(f, "native"),
            Namespace::Source => write!(f, "source"),
        }
    }
}

/// Immutable classification of a package token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageReference {
    namespace: Namespace,
    address: String,
    short_name: String,
    pin: String,
}

impl PackageReference {
    /// Classify a raw token.
    ///
    /// A token without `/` is Native and never carries a pin (an `@` in a
    /// native name is kept as part of the name). Otherwise the token is split
    /// on the first `@`; a leading `scheme://` and a trailing `/` or `.git`
    /// are stripped from the address.
    pub fn parse(raw: &str) -> BridgeResult<Self> {
        let token = raw.trim();
        if !token.contains('/') {
            if token.is_empty() {
                return Err(classification(raw, "empty package name"));
            }
            return Ok(Self {
                namespace: Namespace::Native,
                address: token.to_string(),
                short_name: token.to_string(),
                pin: String::new(),
            });
        }

        let (left, pin) = match token.split_once('@') {
            Some((left, pin)) => (left, pin),
            None => (token, ""),
        };

        let address = strip_scheme(left).trim_end_matches('/');
        let address = address.strip_suffix(".git").unwrap_or(address);
        if address.is_empty() {
            return Err(classification(raw, "empty address"));
        }
        if address.split('/').any(str::is_empty) {
            return Err(classification(raw, "empty path segment in address"));
        }

        let short_name = address
            .rsplit('/')
            .next()
            .unwrap_or(address)
            .to_string();

        Ok(Self {
            namespace: Namespace::Source,
            address: address.to_string(),
            short_name,
            pin: pin.to_string(),
        })
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn is_native(&self) -> bool {
        self.namespace == Namespace::Native
    }

    pub fn is_source(&self) -> bool {
        self.namespace == Namespace::Source
    }

    /// Short name for Native, `host/owner/repo` for Source
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Last path segment of the address; the name the host manager sees
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Requested tag, branch or commit; empty means default-branch head
    pub fn pin(&self) -> &str {
        &self.pin
    }

    pub fn has_pin(&self) -> bool {
        !self.pin.is_empty()
    }

    /// Identity used for visited sets and installed-map keys
    pub fn key(&self) -> String {
        if self.pin.is_empty() {
            self.address.clone()
        } else {
            format!("{}@{}", self.address, self.pin)
        }
    }

    /// URL handed to the version control client
    pub fn clone_url(&self, scheme: &str) -> String {
        format!("{}://{}", scheme, self.address)
    }
}

impl std::fmt::Display for PackageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for PackageReference {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// References partitioned by namespace, order preserved within each group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageGroups {
    pub native: Vec<PackageReference>,
    pub source: Vec<PackageReference>,
}

impl PackageGroups {
    /// Classify every token and partition. Duplicates are kept.
    pub fn classify<S: AsRef<str>>(raw: &[S]) -> BridgeResult<Self> {
        let refs = raw
            .iter()
            .map(|r| PackageReference::parse(r.as_ref()))
            .collect::<BridgeResult<Vec<_>>>()?;
        Ok(Self::split(refs))
    }

    pub fn split(refs: impl IntoIterator<Item = PackageReference>) -> Self {
        let mut groups = Self::default();
        for r in refs {
            match r.namespace() {
                Namespace::Native => groups.native.push(r),
                Namespace::Source => groups.source.push(r),
            }
        }
        groups
    }

    pub fn is_empty(&self) -> bool {
        self.native.is_empty() && self.source.is_empty()
    }

    pub fn native_names(&self) -> Vec<String> {
        self.native.iter().map(|r| r.address().to_string()).collect()
    }
}

fn strip_scheme(s: &str) -> &str {
    match s.find("://") {
        Some(idx) if !s[..idx].contains('/') => &s[idx + 3..],
        _ => s,
    }
}

fn classification(input: &str, reason: &str) -> BridgeError {
    BridgeError::Classification {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}
