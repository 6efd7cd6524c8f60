//! HTTP validator module
//!
//! Provides `ETag` and `Last-Modified` generation and conditional request
//! handling. The server never emits `Cache-Control` itself; freshness policy
//! belongs to the configured header profiles.

use chrono::{DateTime, Utc};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Generate `ETag` using fast hashing
///
/// # Arguments
/// * `content` - File content
///
/// # Returns
/// Quoted `ETag` string, e.g., `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Weak validators: `W/"abc123"`
/// - Wildcard: `*`
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag.split(',').any(|e| {
            let e = e.trim();
            e == "*" || e.trim_start_matches("W/") == etag
        })
    })
}

/// Format a file modification time as an HTTP date
pub fn format_http_date(time: SystemTime) -> String {
    let utc: DateTime<Utc> = time.into();
    utc.format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP date as sent in `If-Modified-Since`
///
/// Accepts RFC 2822 dates, which cover IMF-fixdate; unparsable values yield `None`.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Check `If-Modified-Since` against the file modification time
///
/// Comparison is done at second precision since HTTP dates carry no fraction.
/// Returns true if the client copy is current (should return 304).
pub fn check_not_modified(if_modified_since: Option<&str>, modified: SystemTime) -> bool {
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    let modified: DateTime<Utc> = modified.into();
    modified.timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(b"hello world");
        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert!(etag.len() > 2);
    }

    #[test]
    fn test_etag_consistency() {
        assert_eq!(generate_etag(b"same content"), generate_etag(b"same content"));
        assert_ne!(generate_etag(b"content a"), generate_etag(b"content b"));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(check_etag_match(Some("W/\"abc123\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }

    #[test]
    fn test_http_date_round_trip() {
        let time = UNIX_EPOCH + Duration::from_secs(784_111_777);
        let formatted = format_http_date(time);
        assert_eq!(formatted, "Sun, 06 Nov 1994 08:49:37 GMT");
        let parsed = parse_http_date(&formatted).unwrap();
        assert_eq!(parsed.timestamp(), 784_111_777);
    }

    #[test]
    fn test_not_modified() {
        let modified = UNIX_EPOCH + Duration::from_millis(784_111_777_250);
        assert!(check_not_modified(
            Some("Sun, 06 Nov 1994 08:49:37 GMT"),
            modified
        ));
        assert!(check_not_modified(
            Some("Mon, 07 Nov 1994 08:49:37 GMT"),
            modified
        ));
        assert!(!check_not_modified(
            Some("Sat, 05 Nov 1994 08:49:37 GMT"),
            modified
        ));
        assert!(!check_not_modified(Some("yesterday"), modified));
        assert!(!check_not_modified(None, modified));
    }
}
