//! `PUT /api/push` handler
//!
//! Headers: `file` (bare artifact name), `sign` (base64 detached
//! signature), optional `force`, `email` and `owner`. The body is the
//! artifact. Nothing reaches the serve directory before the signature
//! verifies.

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::header::HeaderMap;
use hyper::{Request, Response, StatusCode};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::domain::entities::{is_artifact_name, IndexChange, SIGNATURE_SUFFIX};
use crate::error::BridgeError;
use crate::infrastructure::fs::move_file;

use super::body::ResponseBody;
use super::router::respond;
use super::RegistryState;

/// Standard alphabet, padding optional
const SIGNATURE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Validated request headers
#[derive(Debug, PartialEq, Eq)]
pub struct PushHeaders {
    pub file: String,
    pub signature: Vec<u8>,
    pub force: bool,
    pub email: Option<String>,
    pub owner: Option<String>,
}

impl PushHeaders {
    pub fn parse(headers: &HeaderMap) -> Result<Self, String> {
        let file = header(headers, "file").ok_or("missing file header")?;
        if !is_bare_name(&file) || !is_artifact_name(&file) {
            return Err(format!("invalid package file name: {file}"));
        }
        let sign = header(headers, "sign").ok_or("missing sign header")?;
        let signature = SIGNATURE_ENGINE
            .decode(sign.trim())
            .map_err(|e| format!("invalid signature encoding: {e}"))?;
        let force = header(headers, "force").is_some_and(|v| v.eq_ignore_ascii_case("true"));
        Ok(Self {
            file,
            signature,
            force,
            email: header(headers, "email"),
            owner: header(headers, "owner"),
        })
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .filter(|v| !v.is_empty())
}

/// A single path component with no separators or dot segments
pub fn is_bare_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

pub async fn handle<B>(state: Arc<RegistryState>, req: Request<B>) -> Response<ResponseBody>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: std::fmt::Display,
{
    let headers = match PushHeaders::parse(req.headers()) {
        Ok(h) => h,
        Err(reason) => return respond(StatusCode::BAD_REQUEST, reason),
    };
    info!(
        "push of {} from {} (owner {})",
        headers.file,
        headers.email.as_deref().unwrap_or("unknown"),
        headers.owner.as_deref().unwrap_or("-")
    );

    let staging = match tempfile::Builder::new()
        .prefix(".push-")
        .tempdir_in(&state.dir)
    {
        Ok(dir) => dir,
        Err(e) => return internal(format!("unable to stage upload: {e}")),
    };
    let artifact = staging.path().join(&headers.file);
    let signature = staging
        .path()
        .join(format!("{}{SIGNATURE_SUFFIX}", headers.file));

    match receive(req.into_body(), &artifact).await {
        Ok(()) => {}
        Err(e @ ReceiveError::Body(_)) => {
            warn!("upload of {} aborted: {}", headers.file, e);
            return respond(StatusCode::BAD_REQUEST, e.to_string());
        }
        Err(e @ ReceiveError::Stage(_)) => return internal(e.to_string()),
    }
    if let Err(e) = tokio::fs::write(&signature, &headers.signature).await {
        return internal(format!("unable to stage signature: {e}"));
    }

    let verified = {
        let signer = Arc::clone(&state.signer);
        let (artifact, signature) = (artifact.clone(), signature.clone());
        tokio::task::spawn_blocking(move || signer.verify(&artifact, &signature)).await
    };
    match verified {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => {
            warn!("signature of {} rejected: {}", headers.file, e.output.trim());
            return respond(StatusCode::UNAUTHORIZED, "signature verification failed");
        }
        Err(e) => return internal(e.to_string()),
    }

    let target = state.dir.join(&headers.file);
    let target_signature = state
        .dir
        .join(format!("{}{SIGNATURE_SUFFIX}", headers.file));
    // Signature first: the watcher reacts to the artifact.
    if let Err(e) = publish(&signature, &target_signature).and_then(|_| publish(&artifact, &target)) {
        return internal(format!("unable to store {}: {e}", headers.file));
    }

    let indexed = {
        let indexer = Arc::clone(&state.indexer);
        let force = headers.force;
        let target = target.clone();
        tokio::task::spawn_blocking(move || indexer.add(&target, force)).await
    };
    match indexed {
        Ok(Ok(change)) => {
            let verb = match change {
                IndexChange::Unchanged => "already in",
                _ => "added to",
            };
            info!(
                "package {} {} db {} in dir {}",
                headers.file,
                verb,
                state.indexer.repo(),
                state.dir.display()
            );
            respond(
                StatusCode::OK,
                format!("{} {} {}", headers.file, verb, state.indexer.repo()),
            )
        }
        Ok(Err(e @ (BridgeError::Downgrade { .. } | BridgeError::Index { .. }))) => {
            warn!("unable to add package {}: {}", headers.file, e);
            respond(StatusCode::CONFLICT, e.to_string())
        }
        Ok(Err(e)) => internal(e.to_string()),
        Err(e) => internal(e.to_string()),
    }
}

/// Why an upload could not be staged
#[derive(Debug)]
enum ReceiveError {
    /// The client's body failed; their fault
    Body(String),
    /// Writing the staged copy failed; ours
    Stage(io::Error),
}

impl fmt::Display for ReceiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body(reason) => write!(f, "unable to read request body: {reason}"),
            Self::Stage(e) => write!(f, "unable to stage upload: {e}"),
        }
    }
}

async fn receive<B>(mut body: B, path: &Path) -> Result<(), ReceiveError>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: std::fmt::Display,
{
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(ReceiveError::Stage)?;
    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(|e| ReceiveError::Body(e.to_string()))?;
        if let Ok(data) = frame.into_data() {
            file.write_all(&data).await.map_err(ReceiveError::Stage)?;
        }
    }
    file.flush().await.map_err(ReceiveError::Stage)
}

fn publish(from: &Path, to: &Path) -> std::io::Result<()> {
    move_file(from, to)
}

fn internal(reason: String) -> Response<ResponseBody> {
    warn!("{}", reason);
    respond(StatusCode::INTERNAL_SERVER_ERROR, reason)
}
