//! Request routing
//!
//! - `PUT /api/push` - signed artifact upload
//! - `GET|HEAD /repo/<file>` - static files of the serve directory

use std::sync::Arc;

use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};

use super::body::{self, ResponseBody};
use super::{files, push, RegistryState};

pub const PUSH_PATH: &str = "/api/push";
pub const REPO_PREFIX: &str = "/repo/";

pub async fn route<B>(state: Arc<RegistryState>, req: Request<B>) -> Response<ResponseBody>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: std::fmt::Display,
{
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    if path == PUSH_PATH {
        return if method == Method::PUT {
            push::handle(state, req).await
        } else {
            respond(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
        };
    }
    if let Some(name) = path.strip_prefix(REPO_PREFIX) {
        return match method {
            Method::GET => files::serve(&state, name, false).await,
            Method::HEAD => files::serve(&state, name, true).await,
            _ => respond(StatusCode::METHOD_NOT_ALLOWED, "method not allowed"),
        };
    }
    respond(StatusCode::NOT_FOUND, "not found")
}

/// Plain-text response with `status`
pub fn respond(status: StatusCode, text: impl Into<String>) -> Response<ResponseBody> {
    let mut response = Response::new(body::full(text.into()));
    *response.status_mut() = status;
    response
}
