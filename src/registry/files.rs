//! Static file serving under `/repo/`

use std::io::ErrorKind;

use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderValue};
use hyper::{Response, StatusCode};

use super::body::{self, FileBody, ResponseBody};
use super::push::is_bare_name;
use super::router::respond;
use super::RegistryState;

/// Serve one file of the serve directory. `name` is the raw path remainder
/// after `/repo/`; anything that is not a single plain file name is 404.
/// The file is streamed, never buffered whole.
pub async fn serve(state: &RegistryState, name: &str, head_only: bool) -> Response<ResponseBody> {
    let Some(name) = percent_decode(name) else {
        return not_found();
    };
    if !is_bare_name(&name) || name.starts_with('.') {
        return not_found();
    }

    let path = state.dir.join(&name);
    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return not_found(),
        Err(e) => return respond(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    let length = match file.metadata().await {
        Ok(meta) if meta.is_file() => meta.len(),
        Ok(_) => return not_found(),
        Err(e) => return respond(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    let body = if head_only {
        body::empty()
    } else {
        FileBody::new(file, length).boxed()
    };
    let mut response = Response::new(body);
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
    response
}

fn not_found() -> Response<ResponseBody> {
    respond(StatusCode::NOT_FOUND, "not found")
}

/// Decode `%XX` escapes; `None` on malformed escapes or non UTF-8 output
pub fn percent_decode(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let hex = std::str::from_utf8(hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_escapes() {
        assert_eq!(
            percent_decode("tool-1%3A2.0-1-any.pkg.tar.zst").as_deref(),
            Some("tool-1:2.0-1-any.pkg.tar.zst")
        );
        assert_eq!(percent_decode("%2e%2e").as_deref(), Some(".."));
        assert_eq!(percent_decode("plain").as_deref(), Some("plain"));
        assert_eq!(percent_decode("bad%2"), None);
        assert_eq!(percent_decode("bad%zz"), None);
    }
}
