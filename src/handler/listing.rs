//! Directory listing module
//!
//! Renders a plain HTML index for directories that have no index document.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::io;
use std::path::Path;
use tokio::fs;

/// Characters left unescaped in listing links
const HREF_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Link target relative to the listed directory
    fn href(&self) -> String {
        let encoded = utf8_percent_encode(&self.name, HREF_SAFE).to_string();
        if self.is_dir {
            format!("{encoded}/")
        } else {
            encoded
        }
    }

    /// Display name: `/` marks directories, `@` marks symlinks
    fn display_name(&self) -> String {
        let mut name = self.name.clone();
        if self.is_dir {
            name.push('/');
        }
        if self.is_symlink {
            name.push('@');
        }
        name
    }
}

/// Read directory entries, sorted case-insensitively by name
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let Ok(name) = entry.file_name().into_string() else {
            tracing::debug!("Skipping non UTF-8 entry in {}", dir.display());
            continue;
        };
        let is_symlink = entry.file_type().await?.is_symlink();
        // Follows symlinks, so a link to a directory lists as a directory
        let is_dir = fs::metadata(entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

        entries.push(ListingEntry {
            name,
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Render the listing page for the decoded request path
pub fn render_listing(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));

    let mut html = String::with_capacity(256 + entries.len() * 64);
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for entry in entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape_html(&entry.href()),
            escape_html(&entry.display_name())
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

/// Escape text for HTML element content and quoted attributes
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_render_listing() {
        let entries = vec![
            entry("assets", true, false),
            entry("main.dart.js", false, false),
            entry("my file.txt", false, false),
        ];
        let html = render_listing("/web/", &entries);
        assert!(html.contains("<title>Directory listing for /web/</title>"));
        assert!(html.contains("<li><a href=\"assets/\">assets/</a></li>"));
        assert!(html.contains("<li><a href=\"main.dart.js\">main.dart.js</a></li>"));
        assert!(html.contains("<li><a href=\"my%20file.txt\">my file.txt</a></li>"));
    }

    #[test]
    fn test_render_escapes_names() {
        let entries = vec![entry("<script>.js", false, true)];
        let html = render_listing("/a&b/", &entries);
        assert!(html.contains("Directory listing for /a&amp;b/"));
        assert!(html.contains("href=\"%3Cscript%3E.js\""));
        assert!(html.contains("&lt;script&gt;.js@"));
        assert!(!html.contains("<script>"));
    }

    #[tokio::test]
    async fn test_read_entries_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(dir.path().join("A.txt"), "a").unwrap();
        std::fs::create_dir(dir.path().join("canvaskit")).unwrap();

        let entries = read_entries(dir.path()).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A.txt", "b.txt", "canvaskit"]);
        assert!(entries[2].is_dir);
        assert!(!entries[0].is_symlink);
    }
}
