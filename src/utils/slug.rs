//! Slugs and output path derivation.

use regex::Regex;
use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

/// Convert text to a lowercase, hyphen-joined ASCII slug.
///
/// Non-ASCII characters are transliterated first (`"Grüße"` → `"grusse"`),
/// then every run of non-alphanumeric characters collapses into one hyphen.
pub fn slugify(text: &str) -> String {
    static RE_SEPARATORS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

    let ascii = deunicode::deunicode(text).to_ascii_lowercase();
    RE_SEPARATORS
        .replace_all(&ascii, "-")
        .trim_matches('-')
        .to_owned()
}

/// Rewrite the extension of a converted file to `.html`.
///
/// `blog/post.md` → `blog/post.html`
pub fn html_path(path: &Path) -> PathBuf {
    path.with_extension("html")
}

/// Join a relative path into a `/`-separated URL path without leading slash.
pub fn url_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lowercased extension of a path, if any.
pub fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_simple() {
        assert_eq!(slugify("hello"), "hello");
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  My_Article (2024) -- Part #1  "), "my-article-2024-part-1");
        assert_eq!(slugify("a.b.c"), "a-b-c");
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify("Grüße aus Köln"), "grusse-aus-koln");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("<>?"), "");
    }

    #[test]
    fn test_html_path() {
        assert_eq!(html_path(Path::new("blog/post.md")), PathBuf::from("blog/post.html"));
        assert_eq!(html_path(Path::new("about.yaml")), PathBuf::from("about.html"));
        assert_eq!(html_path(Path::new("index.html")), PathBuf::from("index.html"));
    }

    #[test]
    fn test_url_path() {
        assert_eq!(url_path(Path::new("foo/bar.html")), "foo/bar.html");
        assert_eq!(url_path(Path::new("index.html")), "index.html");
    }

    #[test]
    fn test_extension_is_lowercased() {
        assert_eq!(extension(Path::new("README.MD")).as_deref(), Some("md"));
        assert_eq!(extension(Path::new("Makefile")), None);
    }
}
