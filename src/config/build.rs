//! `[build]` section configuration.
//!
//! Contains source/output paths, content parsing and site aggregate settings.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Main BuildConfig
// ============================================================================

/// `[build]` section in supernum.toml - build pipeline configuration.
///
/// Paths are relative to the working directory until the config is resolved.
///
/// # Example
/// ```toml
/// [build]
/// root = "root"            # Source directory
/// output = "build"         # Output directory
/// marker = "%%"            # Block separator in content files
///
/// [build.sitemap]
/// hidden = ["404.html"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Source tree to walk.
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: PathBuf,

    /// Build directory; mirrors the source tree.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Template directory.
    #[serde(default = "defaults::build::templates")]
    #[educe(Default = defaults::build::templates())]
    pub templates: PathBuf,

    /// Global context file (YAML mapping).
    #[serde(default = "defaults::build::context")]
    #[educe(Default = defaults::build::context())]
    pub context: PathBuf,

    /// Directory index file name, stripped from sitemap URLs.
    #[serde(default = "defaults::build::index")]
    #[educe(Default = defaults::build::index())]
    pub index: String,

    /// Ignore file in gitignore syntax. Missing file means no rules.
    #[serde(default = "defaults::build::ignore")]
    #[educe(Default = defaults::build::ignore())]
    pub ignore: PathBuf,

    /// Separator between front matter and blocks.
    #[serde(default = "defaults::build::marker")]
    #[educe(Default = defaults::build::marker())]
    pub marker: String,

    /// Parent template used when a page has no `template` key.
    #[serde(default = "defaults::build::template")]
    #[educe(Default = defaults::build::template())]
    pub template: String,

    /// Blog directory, relative to `root`.
    #[serde(default = "defaults::build::blog")]
    #[educe(Default = defaults::build::blog())]
    pub blog: PathBuf,

    /// Maximum number of feed items.
    #[serde(default = "defaults::build::feed_len")]
    #[educe(Default = defaults::build::feed_len())]
    pub feed_len: usize,

    /// Delete an existing output directory without asking.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub force: bool,

    /// Collect per-file failures instead of aborting on the first one.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub keep_going: bool,

    /// Sitemap generation.
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// RSS feed generation.
    #[serde(default)]
    pub feed: FeedConfig,
}

// ============================================================================
// Sub-configurations
// ============================================================================

/// `[build.sitemap]` section
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SitemapConfig {
    /// Output path, relative to the build directory.
    #[serde(default = "defaults::build::sitemap::path")]
    #[educe(Default = defaults::build::sitemap::path())]
    pub path: PathBuf,

    /// Output paths never listed in the sitemap, e.g. `404.html`.
    #[serde(default = "defaults::build::sitemap::hidden")]
    #[educe(Default = defaults::build::sitemap::hidden())]
    pub hidden: Vec<String>,
}

/// `[build.feed]` section
///
/// The feed itself is enabled by an `rss` mapping in the global context.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    /// Output path, relative to the build directory.
    #[serde(default = "defaults::build::feed::path")]
    #[educe(Default = defaults::build::feed::path())]
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_build_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();
        let build = &config.build;

        assert_eq!(build.root, PathBuf::from("root"));
        assert_eq!(build.output, PathBuf::from("build"));
        assert_eq!(build.templates, PathBuf::from("templates"));
        assert_eq!(build.context, PathBuf::from("context.yaml"));
        assert_eq!(build.index, "index.html");
        assert_eq!(build.ignore, PathBuf::from(".supernumignore"));
        assert_eq!(build.marker, "%%");
        assert_eq!(build.template, "base.html");
        assert_eq!(build.blog, PathBuf::from("blog"));
        assert_eq!(build.feed_len, 10);
        assert!(!build.force);
        assert!(!build.keep_going);
        assert_eq!(build.sitemap.path, PathBuf::from("sitemap.xml.gz"));
        assert!(build.sitemap.hidden.is_empty());
        assert_eq!(build.feed.path, PathBuf::from("feed.xml"));
    }

    #[test]
    fn test_build_config_full() {
        let config = r#"
            [build]
            root = "src"
            output = "public"
            marker = "@@"
            template = "page.html"
            feed_len = 3
            keep_going = true

            [build.sitemap]
            path = "sitemap.xml.gz"
            hidden = ["404.html", "drafts/index.html"]

            [build.feed]
            path = "rss.xml"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.root, PathBuf::from("src"));
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.marker, "@@");
        assert_eq!(config.build.template, "page.html");
        assert_eq!(config.build.feed_len, 3);
        assert!(config.build.keep_going);
        assert_eq!(config.build.sitemap.hidden.len(), 2);
        assert_eq!(config.build.feed.path, PathBuf::from("rss.xml"));
        // untouched fields keep defaults
        assert_eq!(config.build.index, "index.html");
    }

    #[test]
    fn test_unknown_field_rejection() {
        let result: Result<SiteConfig, _> = toml::from_str("[build]\nminify = true\n");
        assert!(result.is_err());

        let result: Result<SiteConfig, _> = toml::from_str("[build.feed]\nenable = true\n");
        assert!(result.is_err());
    }
}
