//! Response bodies
//!
//! Every handler answers with [`ResponseBody`]: either a small in-memory
//! text body or a [`FileBody`] streaming a served file frame by frame.

use std::convert::Infallible;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::{Body, Bytes, Frame, SizeHint};
use tokio::fs::File;
use tokio::io::{AsyncRead, ReadBuf};

use crate::infrastructure::http::CHUNK_SIZE;

pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

pub fn full(bytes: impl Into<Bytes>) -> ResponseBody {
    Full::new(bytes.into())
        .map_err(|never: Infallible| -> io::Error { match never {} })
        .boxed_unsync()
}

pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never: Infallible| -> io::Error { match never {} })
        .boxed_unsync()
}

/// Streams `remaining` bytes of an open file
pub struct FileBody {
    file: File,
    remaining: u64,
    buf: Box<[u8]>,
}

impl FileBody {
    pub fn new(file: File, len: u64) -> Self {
        Self {
            file,
            remaining: len,
            buf: vec![0u8; CHUNK_SIZE].into_boxed_slice(),
        }
    }

    pub fn boxed(self) -> ResponseBody {
        BodyExt::boxed_unsync(self)
    }
}

impl Body for FileBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, io::Error>>> {
        if self.remaining == 0 {
            return Poll::Ready(None);
        }
        let this = &mut *self;
        let mut buf = ReadBuf::new(&mut this.buf);
        match Pin::new(&mut this.file).poll_read(cx, &mut buf) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Err(e)) => Poll::Ready(Some(Err(e))),
            Poll::Ready(Ok(())) => {
                let filled = buf.filled();
                if filled.is_empty() {
                    // Truncated while being served; the announced length can't be met.
                    return Poll::Ready(Some(Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "file shrank while being served",
                    ))));
                }
                let n = filled.len().min(usize::try_from(this.remaining).unwrap_or(usize::MAX));
                let chunk = Bytes::copy_from_slice(&filled[..n]);
                this.remaining -= n as u64;
                Poll::Ready(Some(Ok(Frame::data(chunk))))
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.remaining == 0
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn file_body_streams_in_frames() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big");
        let content: Vec<u8> = (0..CHUNK_SIZE * 2 + 17).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &content).unwrap();

        let file = File::open(&path).await.unwrap();
        let mut body = FileBody::new(file, content.len() as u64);
        assert_eq!(body.size_hint().exact(), Some(content.len() as u64));

        let mut received = Vec::new();
        let mut frames = 0;
        while let Some(frame) = body.frame().await {
            received.extend_from_slice(&frame.unwrap().into_data().unwrap());
            frames += 1;
        }
        assert!(frames >= 3, "{frames} frames");
        assert_eq!(received, content);
        assert!(body.is_end_stream());
    }

    #[tokio::test]
    async fn file_body_stops_at_the_announced_length() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grown");
        fs::write(&path, b"0123456789").unwrap();

        let file = File::open(&path).await.unwrap();
        let collected = FileBody::new(file, 4).collect().await.unwrap().to_bytes();
        assert_eq!(&collected[..], b"0123");
    }

    #[tokio::test]
    async fn truncated_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short");
        fs::write(&path, b"abc").unwrap();

        let file = File::open(&path).await.unwrap();
        match FileBody::new(file, 10).collect().await {
            Err(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            Ok(_) => panic!("truncated file was served whole"),
        }
    }
}
