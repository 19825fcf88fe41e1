//! Request handling module
//!
//! Entry point for HTTP request processing: method dispatch, access logging,
//! and delegation to the static file resolver.

pub mod static_files;

use crate::config::AppState;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Main entry point for HTTP request handling.
///
/// Always returns `Ok`: every error becomes an HTTP error response so a bad
/// request can never take down the connection loop.
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let version = req.version();

    let response = match method {
        Method::GET => static_files::serve(&state, &path, false).await,
        Method::HEAD => static_files::serve(&state, &path, true).await,
        // Preflight succeeds for any path, existing or not
        Method::OPTIONS => http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response()
        }
    };

    if state.config.logging.access_log {
        let entry = AccessLogEntry::new(
            peer_addr.to_string(),
            method.to_string(),
            path,
            version,
            response.status().as_u16(),
        );
        logger::log_access(&entry, &state.config.logging.format);
    }

    Ok(response)
}
