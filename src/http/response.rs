//! HTTP response building module
//!
//! Builders for every response shape the server emits. File bodies are
//! streamed; everything else is a small in-memory body. Both are unified
//! behind [`ResponseBody`] so the connection service has a single type.

use futures::TryStreamExt;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::Response;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

/// Unified response body type: either a buffered message or a file stream.
pub type ResponseBody = BoxBody<Bytes, std::io::Error>;

/// Wrap a complete in-memory body
pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Empty body (OPTIONS, HEAD)
pub fn empty_body() -> ResponseBody {
    full_body(Bytes::new())
}

/// Body streaming a file's bytes in chunks
pub fn file_body(file: File) -> ResponseBody {
    let stream = ReaderStream::new(file).map_ok(Frame::data);
    StreamBody::new(stream).boxed()
}

/// Build the 200 response for a resolved file.
///
/// `Content-Encoding` is omitted entirely when the file is served
/// uncompressed; an empty header value would break browsers.
pub fn build_file_response(
    body: ResponseBody,
    content_type: &str,
    content_encoding: Option<&str>,
    content_length: u64,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Access-Control-Allow-Origin", "*")
        .header("Cache-Control", "no-cache, no-store, must-revalidate");

    if let Some(encoding) = content_encoding {
        builder = builder.header("Content-Encoding", encoding);
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(empty_body())
    })
}

/// Build 404 Not Found response with a short reason in the body
pub fn build_404_response(reason: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .header("Access-Control-Allow-Origin", "*")
        .body(full_body(format!("404 Not Found: {reason}")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(full_body("404 Not Found"))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(full_body("405 Method Not Allowed"))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(full_body("405 Method Not Allowed"))
        })
}

/// Build CORS preflight response: 200 with the permissive header set and
/// no body, for any path.
pub fn build_options_response() -> Response<ResponseBody> {
    Response::builder()
        .status(200)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(empty_body())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(empty_body())
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
