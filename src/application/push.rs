//! Push Use Case
//!
//! Matches locally built artifacts to `registry/owner/name` targets and
//! uploads each one with its base64 detached signature. Every target is
//! resolved to a file before the first byte goes over the network.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::domain::entities::{RegistryArtifact, ARTIFACT_SUFFIX, SIGNATURE_SUFFIX};
use crate::domain::ports::{BridgeEvent, EventSink, Signer, UploadRequest, Uploader};
use crate::error::{BridgeError, BridgeResult};
use crate::infrastructure::fs::files_with_suffix;

use super::signing::signing_email;

/// Where one package goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTarget {
    /// Host (and optional port) of the registry; empty when not given
    pub registry: String,
    /// Segments between registry and name, possibly empty
    pub owner: String,
    pub name: String,
}

impl PushTarget {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().trim_matches('/');
        let segments: Vec<&str> = raw.split('/').collect();
        match segments.as_slice() {
            [] | [_] => Self {
                registry: String::new(),
                owner: String::new(),
                name: raw.to_string(),
            },
            [registry, middle @ .., name] => Self {
                registry: registry.to_string(),
                owner: middle.join("/"),
                name: name.to_string(),
            },
        }
    }
}

/// Options for the push use case
#[derive(Debug, Clone)]
pub struct PushOptions {
    /// Directory holding built artifacts and their signatures
    pub artifact_dir: PathBuf,
    /// `https` or `http`
    pub protocol: String,
    /// Path of the push endpoint, e.g. `/api/push`
    pub endpoint: String,
    /// Ask the registry to accept a downgrade
    pub force: bool,
}

pub struct PushUseCase<'a> {
    signer: &'a dyn Signer,
    uploader: &'a dyn Uploader,
    events: &'a dyn EventSink,
}

impl<'a> PushUseCase<'a> {
    pub fn new(signer: &'a dyn Signer, uploader: &'a dyn Uploader, events: &'a dyn EventSink) -> Self {
        Self {
            signer,
            uploader,
            events,
        }
    }

    /// Upload every target in order. Returns the uploaded file names.
    pub fn push<S: AsRef<str>>(&self, refs: &[S], options: &PushOptions) -> BridgeResult<Vec<String>> {
        let targets: Vec<PushTarget> = refs.iter().map(|r| PushTarget::parse(r.as_ref())).collect();
        if let Some(target) = targets.iter().find(|t| t.registry.is_empty()) {
            return Err(BridgeError::Push(format!(
                "provide registry to push package: {}",
                target.name
            )));
        }

        let email = signing_email(self.signer).map_err(|e| match e {
            BridgeError::Key(reason) => BridgeError::Push(reason),
            other => other,
        })?;

        let candidates = files_with_suffix(&options.artifact_dir, ARTIFACT_SUFFIX)?;
        let mut requests = Vec::with_capacity(targets.len());
        for target in &targets {
            requests.push(self.request(target, &candidates, &email, options)?);
        }

        self.events.on_event(BridgeEvent::Started {
            command: "push".to_string(),
            packages: requests.iter().map(|r| r.filename.clone()).collect(),
        });
        let mut uploaded = Vec::with_capacity(requests.len());
        for request in &requests {
            self.upload(request)?;
            uploaded.push(request.filename.clone());
        }
        self.events.on_event(BridgeEvent::Completed {
            command: "push".to_string(),
        });
        Ok(uploaded)
    }

    fn request(
        &self,
        target: &PushTarget,
        candidates: &[PathBuf],
        email: &str,
        options: &PushOptions,
    ) -> BridgeResult<UploadRequest> {
        let (path, filename) = newest_match(candidates, &target.name)
            .ok_or_else(|| BridgeError::Push(format!("unable to find package {}", target.name)))?;

        let signature_path = path.with_file_name(format!("{filename}{SIGNATURE_SUFFIX}"));
        let signature = fs::read(&signature_path).map_err(|e| {
            BridgeError::Push(format!(
                "unable to read signature {}: {e}",
                signature_path.display()
            ))
        })?;

        Ok(UploadRequest {
            url: format!("{}://{}{}", options.protocol, target.registry, options.endpoint),
            path: path.to_path_buf(),
            filename,
            email: email.to_string(),
            signature: STANDARD.encode(signature),
            owner: (!target.owner.is_empty()).then(|| target.owner.clone()),
            force: options.force,
        })
    }

    fn upload(&self, request: &UploadRequest) -> BridgeResult<()> {
        let size = fs::metadata(&request.path)?.len();
        self.events.on_event(BridgeEvent::UploadStarted {
            file: request.filename.clone(),
            url: request.url.clone(),
            size,
        });

        let detailed = self.events.wants_detailed_events();
        let progress = |sent: u64, total: u64| {
            if detailed {
                self.events.on_event(BridgeEvent::UploadProgress {
                    file: request.filename.clone(),
                    sent,
                    total,
                });
            }
        };
        self.uploader.upload(request, &progress)?;

        self.events.on_event(BridgeEvent::Uploaded {
            file: request.filename.clone(),
        });
        Ok(())
    }
}

/// Candidate for `name` with the highest version. Equal versions (another
/// arch) go to the later name.
fn newest_match<'p>(candidates: &'p [PathBuf], name: &str) -> Option<(&'p Path, String)> {
    candidates
        .iter()
        .filter_map(|path| {
            let filename = path.file_name()?.to_str()?;
            let artifact = RegistryArtifact::from_filename(filename).ok()?;
            (artifact.name() == name).then_some((path.as_path(), artifact))
        })
        .max_by(|(_, a), (_, b)| a.version().cmp(b.version()))
        .map(|(path, artifact)| (path, artifact.filename().to_string()))
}
