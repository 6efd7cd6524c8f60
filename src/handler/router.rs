//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, file serving,
//! error mapping, and the final header decoration every response receives.

use crate::config::AppState;
use crate::error::RequestError;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, CONTENT_LENGTH, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) request path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    // The body of a GET/HEAD is never read
    let (parts, _) = req.into_parts();
    let method = &parts.method;
    let is_head = *method == Method::HEAD;

    let ctx = RequestContext {
        path: parts.uri.path(),
        query: parts.uri.query(),
        is_head,
        if_none_match: header_string(&parts.headers, "if-none-match"),
        if_modified_since: header_string(&parts.headers, "if-modified-since"),
    };

    let result = match method {
        &Method::GET | &Method::HEAD => static_files::serve(&ctx, &state).await,
        &Method::OPTIONS => Ok(http::build_options_response()),
        other => Err(RequestError::MethodNotAllowed(other.clone())),
    };

    let mut response = result.unwrap_or_else(|err| error_response(&err, &ctx));
    finalize_response(&mut response, &state);

    if state.access_log() {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            ctx.path.to_string(),
        );
        entry.query = ctx.query.map(ToString::to_string);
        entry.http_version = version_label(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = if is_head { 0 } else { body_length(&response) };
        entry.referer = header_string(&parts.headers, REFERER.as_str());
        entry.user_agent = header_string(&parts.headers, USER_AGENT.as_str());
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Map a request error to its status response and log it at a fitting level
fn error_response(err: &RequestError, ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    let status = err.status();
    match err {
        RequestError::NotFound => tracing::debug!("{} not found", ctx.path),
        RequestError::Io(e) if status.is_server_error() => {
            logger::log_error(&format!("Failed to serve '{}': {e}", ctx.path));
        }
        other => logger::log_warning(&format!("{} -> {status}: {other}", ctx.path)),
    }
    http::build_error_response(status, ctx.is_head)
}

/// Stamp the `Server` header and append the configured header set.
///
/// Runs last so the header set never displaces a base header.
pub fn finalize_response<B>(response: &mut Response<B>, state: &AppState) {
    response
        .headers_mut()
        .entry(SERVER)
        .or_insert_with(|| state.server_name.clone());
    state.header_set.apply(response);
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn body_length<B>(response: &Response<B>) -> usize {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

const fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
}
