//! Uploader port - moves one signed artifact to a registry

use std::path::PathBuf;

use crate::error::BridgeResult;

/// Everything the registry push endpoint needs for one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// `<protocol>://<registry><endpoint>`
    pub url: String,
    /// Local artifact to stream
    pub path: PathBuf,
    /// Bare artifact file name, sent as the `file` header
    pub filename: String,
    /// Signer e-mail, sent as the `email` header
    pub email: String,
    /// Base64 detached signature, sent as the `sign` header
    pub signature: String,
    /// Optional `owner` header
    pub owner: Option<String>,
    /// Sends `force: true`
    pub force: bool,
}

pub trait Uploader: Send + Sync {
    /// Upload and report `(sent, total)` as the body is consumed.
    /// A non-200 answer is an error carrying status and body.
    fn upload(&self, request: &UploadRequest, progress: &(dyn Fn(u64, u64) + Send + Sync)) -> BridgeResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploader_is_object_safe() {
        fn _assert_object_safe(_: &dyn Uploader) {}
    }
}
