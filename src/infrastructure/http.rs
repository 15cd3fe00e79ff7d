//! HTTP uploader for the push client
//!
//! A `hyper-util` legacy client over a `hyper-rustls` connector, driven by
//! a private current-thread tokio runtime so callers stay synchronous.
//! The artifact is streamed in 64 KiB frames; each frame handed to the
//! connection is reported through the progress callback.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes, Frame, SizeHint};
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Method, Request, StatusCode};
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use crate::domain::ports::{UploadRequest, Uploader};
use crate::error::{BridgeError, BridgeResult};

/// Frame size of the streamed upload body
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Request body reading a file frame by frame
pub struct ProgressBody {
    file: File,
    sent: u64,
    total: u64,
    progress: UnboundedSender<u64>,
}

impl ProgressBody {
    pub fn open(path: &Path, progress: UnboundedSender<u64>) -> io::Result<Self> {
        let file = File::open(path)?;
        let total = file.metadata()?.len();
        Ok(Self {
            file,
            sent: 0,
            total,
            progress,
        })
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

impl Body for ProgressBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, io::Error>>> {
        let mut chunk = vec![0u8; CHUNK_SIZE];
        match self.file.read(&mut chunk) {
            Ok(0) => Poll::Ready(None),
            Ok(n) => {
                chunk.truncate(n);
                self.sent += n as u64;
                // The receiver is gone only once the upload is over.
                let _ = self.progress.send(self.sent);
                Poll::Ready(Some(Ok(Frame::data(Bytes::from(chunk)))))
            }
            Err(e) => Poll::Ready(Some(Err(e))),
        }
    }

    fn is_end_stream(&self) -> bool {
        self.sent >= self.total
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.total.saturating_sub(self.sent))
    }
}

pub struct HttpUploader {
    runtime: Runtime,
}

impl HttpUploader {
    pub fn new() -> BridgeResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { runtime })
    }
}

impl Uploader for HttpUploader {
    fn upload(
        &self,
        request: &UploadRequest,
        progress: &(dyn Fn(u64, u64) + Send + Sync),
    ) -> BridgeResult<()> {
        let (tx, mut rx) = unbounded_channel();
        let body = ProgressBody::open(&request.path, tx)?;
        let total = body.total();
        let http_request = build_request(request, body)?;

        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();

        let (status, text) = self.runtime.block_on(async {
            let client: Client<_, ProgressBody> =
                Client::builder(TokioExecutor::new()).build(connector);
            let send = async {
                let response = client.request(http_request).await.map_err(push_error)?;
                let status = response.status();
                let bytes = response
                    .into_body()
                    .collect()
                    .await
                    .map_err(push_error)?
                    .to_bytes();
                Ok::<_, BridgeError>((status, String::from_utf8_lossy(&bytes).into_owned()))
            };
            tokio::pin!(send);
            let result = loop {
                tokio::select! {
                    biased;
                    Some(sent) = rx.recv() => progress(sent, total),
                    result = &mut send => break result,
                }
            };
            while let Ok(sent) = rx.try_recv() {
                progress(sent, total);
            }
            result
        })?;

        if status != StatusCode::OK {
            return Err(BridgeError::Push(format!(
                "{status}, {} - {}",
                text.trim(),
                request.filename
            )));
        }
        Ok(())
    }
}

fn build_request(request: &UploadRequest, body: ProgressBody) -> BridgeResult<Request<ProgressBody>> {
    let mut builder = Request::builder()
        .method(Method::PUT)
        .uri(request.url.as_str())
        .header(CONTENT_TYPE, "application/octet-stream")
        .header(CONTENT_LENGTH, body.total())
        .header("file", request.filename.as_str())
        .header("email", request.email.as_str())
        .header("sign", request.signature.as_str());
    if let Some(owner) = &request.owner {
        builder = builder.header("owner", owner.as_str());
    }
    if request.force {
        builder = builder.header("force", "true");
    }
    builder.body(body).map_err(push_error)
}

fn push_error(e: impl std::fmt::Display) -> BridgeError {
    BridgeError::Push(e.to_string())
}
