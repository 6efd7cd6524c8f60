//! Request path resolution
//!
//! Maps a URL path onto the document root. Resolution is lexical first
//! (percent-decoding, `.`/`..` handling) and then checked again after
//! symlinks are followed, so neither form of escape can reach a file outside
//! the root.

use crate::error::{RequestError, RequestResult};
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Percent-decode a URL path
pub fn decode_path(raw: &str) -> RequestResult<String> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| RequestError::BadRequest("path is not valid UTF-8".to_string()))?;
    if decoded.contains('\0') {
        return Err(RequestError::BadRequest("path contains a NUL byte".to_string()));
    }
    Ok(decoded.into_owned())
}

/// Join a decoded URL path onto `root` without touching the filesystem
///
/// `..` may only cancel segments that the path itself added; climbing above
/// the root is [`RequestError::Forbidden`].
pub fn join_within_root(root: &Path, decoded: &str) -> RequestResult<PathBuf> {
    let mut resolved = root.to_path_buf();
    let mut depth = 0usize;

    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if depth == 0 {
                    return Err(RequestError::Forbidden);
                }
                resolved.pop();
                depth -= 1;
            }
            s if is_unsafe_segment(s) => {
                return Err(RequestError::BadRequest(format!(
                    "invalid path segment '{s}'"
                )));
            }
            s => {
                resolved.push(s);
                depth += 1;
            }
        }
    }

    Ok(resolved)
}

/// Backslashes (and drive prefixes on Windows) would be read as separators
fn is_unsafe_segment(segment: &str) -> bool {
    segment.contains('\\') || (cfg!(windows) && segment.contains(':'))
}

/// A request path mapped onto the document root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Percent-decoded request path
    pub decoded: String,
    /// Location named by the request, before symlinks are followed
    pub requested: PathBuf,
    /// Canonical location on disk
    pub target: PathBuf,
}

impl Resolved {
    /// The decoded path ends in `/`, so only a directory may answer it
    pub fn wants_directory(&self) -> bool {
        self.decoded.ends_with('/')
    }
}

/// Resolve a raw request path to an existing location under `root`
///
/// `root` must already be canonical. Missing targets are
/// [`RequestError::NotFound`]; targets whose canonical form lies outside the
/// root (e.g. via a symlink) are [`RequestError::Forbidden`].
pub async fn resolve(root: &Path, raw_path: &str) -> RequestResult<Resolved> {
    let decoded = decode_path(raw_path)?;
    let requested = join_within_root(root, &decoded)?;
    let target = canonical_within(root, &requested, raw_path).await?;

    Ok(Resolved {
        decoded,
        requested,
        target,
    })
}

/// Canonicalize `candidate` and require the result to stay under `root`
pub async fn canonical_within(root: &Path, candidate: &Path, raw_path: &str) -> RequestResult<PathBuf> {
    let canonical = match fs::canonicalize(candidate).await {
        Ok(p) => p,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(RequestError::NotFound),
        Err(e) => return Err(RequestError::Io(e)),
    };

    if !canonical.starts_with(root) {
        tracing::warn!(
            "Path traversal attempt blocked: {} -> {}",
            raw_path,
            canonical.display()
        );
        return Err(RequestError::Forbidden);
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/a%20b/c.txt").unwrap(), "/a b/c.txt");
        assert_eq!(decode_path("/%2e%2e/etc").unwrap(), "/../etc");
        assert!(matches!(
            decode_path("/bad%00name"),
            Err(RequestError::BadRequest(_))
        ));
        assert!(matches!(decode_path("/%ff"), Err(RequestError::BadRequest(_))));
    }

    #[test]
    fn test_join_within_root() {
        let root = Path::new("/srv/web");
        assert_eq!(
            join_within_root(root, "/assets/app.js").unwrap(),
            PathBuf::from("/srv/web/assets/app.js")
        );
        assert_eq!(
            join_within_root(root, "/assets/../index.html").unwrap(),
            PathBuf::from("/srv/web/index.html")
        );
        assert_eq!(
            join_within_root(root, "//./index.html").unwrap(),
            PathBuf::from("/srv/web/index.html")
        );
        assert_eq!(join_within_root(root, "/").unwrap(), PathBuf::from("/srv/web"));
    }

    #[test]
    fn test_join_rejects_escape() {
        let root = Path::new("/srv/web");
        assert!(matches!(
            join_within_root(root, "/../../etc/passwd"),
            Err(RequestError::Forbidden)
        ));
        assert!(matches!(
            join_within_root(root, "/assets/../../secret"),
            Err(RequestError::Forbidden)
        ));
        assert!(matches!(
            join_within_root(root, "/..\\..\\boot.ini"),
            Err(RequestError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_existing_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::write(root.join("app.js"), "x").unwrap();

        let resolved = resolve(&root, "/app.js").await.unwrap();
        assert_eq!(resolved.target, root.join("app.js"));
        assert!(!resolved.wants_directory());

        let encoded_slash = resolve(&root, "/app.js%2F").await.unwrap();
        assert_eq!(encoded_slash.decoded, "/app.js/");
        assert!(encoded_slash.wants_directory());
        assert!(matches!(
            resolve(&root, "/missing.js").await,
            Err(RequestError::NotFound)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_blocks_symlink_escape() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "secret").unwrap();

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("link")).unwrap();

        assert!(matches!(
            resolve(&root, "/link/secret.txt").await,
            Err(RequestError::Forbidden)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_keeps_requested_name_of_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::write(root.join("main.dart.js"), "x").unwrap();
        std::os::unix::fs::symlink(root.join("main.dart.js"), root.join("main.txt")).unwrap();

        let resolved = resolve(&root, "/main.txt").await.unwrap();
        assert_eq!(resolved.requested, root.join("main.txt"));
        assert_eq!(resolved.target, root.join("main.dart.js"));
    }
}
