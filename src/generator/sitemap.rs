//! URL registry and gzipped sitemap.
//!
//! Every rendered page registers its output path during the walk. After the
//! walk the registry is written as `sitemap.xml.gz`:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/foo</loc>
//!   </url>
//! </urlset>
//! ```

use crate::{
    error::{BuildError, BuildResult},
    log,
};
use flate2::{Compression, write::GzEncoder};
use std::{collections::HashSet, fs::File, io::Write, path::Path};

// ============================================================================
// Constants
// ============================================================================

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

// ============================================================================
// URL Registry
// ============================================================================

/// Absolute URLs of rendered pages, in registration order.
#[derive(Debug, Default)]
pub struct UrlRegistry {
    hostname: String,
    index: String,
    hidden: HashSet<String>,
    urls: Vec<String>,
}

impl UrlRegistry {
    /// `index` is the directory index file name (`index.html`); `hidden`
    /// lists output paths that never appear in the sitemap.
    pub fn new(hostname: &str, index: &str, hidden: &[String]) -> Self {
        Self {
            hostname: hostname.trim_end_matches('/').to_owned(),
            index: index.to_owned(),
            hidden: hidden
                .iter()
                .map(|path| path.trim_start_matches('/').to_owned())
                .collect(),
            urls: Vec::new(),
        }
    }

    /// Register a rendered page by its `/`-separated output path.
    /// Returns false for hidden pages.
    pub fn register(&mut self, path: &str) -> bool {
        if self.hidden.contains(path) {
            return false;
        }
        self.urls.push(self.url_for(path));
        true
    }

    /// `foo/index.html` → `<hostname>/foo`, `foo/bar.html` → `<hostname>/foo/bar.html`
    pub fn url_for(&self, path: &str) -> String {
        let path = if path == self.index {
            ""
        } else {
            path.strip_suffix(&self.index)
                .filter(|dir| dir.ends_with('/'))
                .unwrap_or(path)
        };
        let url = format!("{}/{}", self.hostname, path);
        url.trim_end_matches('/').to_owned()
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }
}

// ============================================================================
// Sitemap
// ============================================================================

/// Write the registry as a gzip-compressed sitemap.
pub fn write_sitemap(registry: &UrlRegistry, path: &Path) -> BuildResult<()> {
    let xml = into_xml(registry.urls());
    let file = File::create(path).map_err(|err| BuildError::io(path, err))?;

    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder
        .write_all(xml.as_bytes())
        .map_err(|err| BuildError::io(path, err))?;
    encoder.finish().map_err(|err| BuildError::io(path, err))?;

    log!("sitemap"; "{} ({} urls)", path.display(), registry.urls().len());
    Ok(())
}

/// Generate sitemap XML string.
fn into_xml(urls: &[String]) -> String {
    let mut xml = String::with_capacity(128 + urls.len() * 64);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
    xml.push('\n');

    for url in urls {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(url)));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn registry() -> UrlRegistry {
        UrlRegistry::new("http://x.test", "index.html", &[])
    }

    #[test]
    fn test_url_for_index_pages() {
        let reg = registry();
        assert_eq!(reg.url_for("foo/index.html"), "http://x.test/foo");
        assert_eq!(reg.url_for("a/b/index.html"), "http://x.test/a/b");
        assert_eq!(reg.url_for("index.html"), "http://x.test");
    }

    #[test]
    fn test_url_for_regular_pages() {
        let reg = registry();
        assert_eq!(reg.url_for("foo/bar.html"), "http://x.test/foo/bar.html");
        assert_eq!(reg.url_for("a.html"), "http://x.test/a.html");
        // only a whole path component counts as the index file
        assert_eq!(reg.url_for("foo/myindex.html"), "http://x.test/foo/myindex.html");
    }

    #[test]
    fn test_hostname_trailing_slash() {
        let reg = UrlRegistry::new("http://x.test/", "index.html", &[]);
        assert_eq!(reg.url_for("a.html"), "http://x.test/a.html");
    }

    #[test]
    fn test_custom_index_name() {
        let reg = UrlRegistry::new("http://x.test", "default.htm", &[]);
        assert_eq!(reg.url_for("docs/default.htm"), "http://x.test/docs");
        assert_eq!(reg.url_for("docs/index.html"), "http://x.test/docs/index.html");
    }

    #[test]
    fn test_register_keeps_order_and_skips_hidden() {
        let mut reg = UrlRegistry::new("http://x.test", "index.html", &["/404.html".to_owned()]);
        assert!(reg.register("b.html"));
        assert!(!reg.register("404.html"));
        assert!(reg.register("a/index.html"));

        assert_eq!(reg.urls(), ["http://x.test/b.html", "http://x.test/a"]);
    }

    #[test]
    fn test_xml_structure() {
        let xml = into_xml(&["http://x.test/search?q=a&b=c".to_owned()]);
        let lines: Vec<&str> = xml.lines().collect();
        assert_eq!(lines[0], r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        assert_eq!(lines[1], format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        assert!(xml.contains("<loc>http://x.test/search?q=a&amp;b=c</loc>"));
        assert_eq!(lines.last().copied(), Some("</urlset>"));
    }

    #[test]
    fn test_empty_sitemap() {
        let xml = into_xml(&[]);
        assert!(xml.contains("</urlset>"));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn test_write_sitemap_is_gzipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.xml.gz");
        let mut reg = registry();
        reg.register("foo/index.html");
        write_sitemap(&reg, &path).unwrap();

        let mut xml = String::new();
        GzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut xml)
            .unwrap();
        assert!(xml.contains("<loc>http://x.test/foo</loc>"));
    }
}
