//! Static file serving module
//!
//! Resolves a request under the document root and builds the base response:
//! file bytes, index documents, directory listings and trailing-slash
//! redirects. Profile headers are added later by the router.

use crate::config::AppState;
use crate::error::{RequestError, RequestResult};
use crate::handler::listing;
use crate::handler::path::{self, Resolved};
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, Validators};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::fs::Metadata;
use std::path::Path;
use tokio::fs;

/// Serve whatever the request path names under the document root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> RequestResult<Response<Full<Bytes>>> {
    let resolved = path::resolve(&state.root, ctx.path).await?;
    let metadata = fs::metadata(&resolved.target).await?;

    if metadata.is_dir() {
        return serve_directory(ctx, state, &resolved).await;
    }

    // A trailing slash, encoded or not, promises a directory
    if resolved.wants_directory() || !metadata.is_file() {
        return Err(RequestError::NotFound);
    }

    serve_file(ctx, &resolved.requested, &resolved.target, &metadata).await
}

/// `Location` for the slash-terminated form of a directory path.
///
/// Leading slashes are collapsed so the value can never read as a
/// scheme-relative URL (`//host/...`).
fn directory_location(raw_path: &str, query: Option<&str>) -> String {
    let path = raw_path.trim_start_matches('/');
    match query {
        Some(query) => format!("/{path}/?{query}"),
        None => format!("/{path}/"),
    }
}

/// Serve a directory: redirect, index document, listing, or 404
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    resolved: &Resolved,
) -> RequestResult<Response<Full<Bytes>>> {
    // Relative links in a listing resolve against the URL as sent
    if !ctx.path.ends_with('/') {
        let location = directory_location(ctx.path, ctx.query);
        return Ok(http::build_redirect_response(&location));
    }

    for index_file in &state.config.http.index_files {
        let requested = resolved.requested.join(index_file);
        let candidate = match path::canonical_within(&state.root, &requested, ctx.path).await {
            Ok(p) => p,
            Err(RequestError::NotFound) => continue,
            Err(e) => return Err(e),
        };
        let metadata = fs::metadata(&candidate).await?;
        if metadata.is_file() {
            return serve_file(ctx, &requested, &candidate, &metadata).await;
        }
    }

    if !state.config.http.directory_listing {
        return Err(RequestError::NotFound);
    }

    let entries = listing::read_entries(&resolved.target).await?;
    let html = listing::render_listing(&resolved.decoded, &entries);
    Ok(http::build_html_response(html, ctx.is_head))
}

/// Serve a regular file, honouring conditional request headers
///
/// The Content-Type follows the requested name; the bytes come from the
/// canonical `file_path`.
async fn serve_file(
    ctx: &RequestContext<'_>,
    requested: &Path,
    file_path: &Path,
    metadata: &Metadata,
) -> RequestResult<Response<Full<Bytes>>> {
    let content = fs::read(file_path).await?;
    let modified = metadata.modified().ok();

    let validators = Validators {
        etag: cache::generate_etag(&content),
        last_modified: modified.map(cache::format_http_date),
    };

    // If-None-Match takes precedence; If-Modified-Since only applies without it
    let not_modified = match ctx.if_none_match.as_deref() {
        Some(_) => cache::check_etag_match(ctx.if_none_match.as_deref(), &validators.etag),
        None => modified.is_some_and(|m| cache::check_not_modified(ctx.if_modified_since.as_deref(), m)),
    };
    if not_modified {
        return Ok(http::build_304_response(&validators));
    }

    let content_type = mime::content_type_for(requested);
    Ok(http::build_file_response(
        Bytes::from(content),
        content_type,
        &validators,
        ctx.is_head,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_location() {
        assert_eq!(directory_location("/assets", None), "/assets/");
        assert_eq!(directory_location("/assets", Some("v=2")), "/assets/?v=2");
        assert_eq!(
            directory_location("//evil.example/..", None),
            "/evil.example/../"
        );
        assert_eq!(directory_location("///a//b", Some("x")), "/a//b/?x");
    }
}
