//! Ignore rules for the source tree.
//!
//! The ignore file uses gitignore syntax and is matched case-insensitively
//! against paths relative to the source root.

use crate::error::{BuildError, BuildResult};
use gix::{bstr::ByteSlice, glob::wildmatch};
use std::{fs, io::ErrorKind, path::Path};

// Constants for gix::ignore::search::pattern::Mode (which is private)
// See: https://github.com/Byron/gitoxide/blob/main/gix-ignore/src/search/pattern.rs
const MODE_NO_SUB_DIR: u32 = 1 << 0; // Pattern has no internal slash (matches basename unless absolute)
const MODE_MUST_MATCH_DIR: u32 = 1 << 2; // Pattern ends with slash (must match directory)
const MODE_NEGATIVE: u32 = 1 << 3; // Pattern starts with ! (negation)
const MODE_ABSOLUTE: u32 = 1 << 4; // Pattern starts with / (rooted at the source root)

/// Matches source paths against ignore patterns.
#[derive(Default)]
pub struct IgnoreMatcher {
    // (pattern_text, mode_bits)
    patterns: Vec<(gix::bstr::BString, u32)>,
}

impl IgnoreMatcher {
    /// Parse ignore file bytes into patterns.
    pub fn new(content: &[u8]) -> Self {
        let patterns = gix::ignore::parse(content)
            .map(|(pattern, _, _)| (pattern.text, pattern.mode.bits()))
            .collect();
        Self { patterns }
    }

    /// Load rules from a file. A missing file means no rules.
    pub fn from_path(path: &Path) -> BuildResult<Self> {
        match fs::read(path) {
            Ok(content) => Ok(Self::new(&content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(BuildError::ConfigLoad(path.to_path_buf(), err.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Check if a relative path is ignored.
    ///
    /// Patterns are applied in order and the last match wins, so a later
    /// `!pattern` can re-include a file.
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        let mut is_ignored = false;
        for (text, mode) in &self.patterns {
            // "drafts/" must not match a file named "drafts"
            if (mode & MODE_MUST_MATCH_DIR != 0) && !is_dir {
                continue;
            }

            let is_absolute = mode & MODE_ABSOLUTE != 0;
            let has_internal_slash = mode & MODE_NO_SUB_DIR == 0;

            // "*.bak" matches "blog/old.bak" through its basename
            let match_path = if !has_internal_slash && !is_absolute {
                path.rsplit_once('/').map_or(path, |(_, name)| name)
            } else {
                path
            };

            let is_match = wildmatch(
                text.as_bstr(),
                match_path.into(),
                wildmatch::Mode::NO_MATCH_SLASH_LITERAL | wildmatch::Mode::IGNORE_CASE,
            );

            if is_match {
                is_ignored = mode & MODE_NEGATIVE == 0;
            }
        }
        is_ignored
    }

    /// Check a path relative to the source root.
    pub fn is_ignored(&self, rel: &Path, is_dir: bool) -> bool {
        !self.is_empty() && self.matches(&crate::utils::slug::url_path(rel), is_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignore_matcher() {
        let rules = b"drafts/**\n*.swp\n.DS_Store\n!keep.swp\nprivate/\n/TODO";
        let matcher = IgnoreMatcher::new(rules);

        assert!(matcher.matches("drafts/post.md", false));
        assert!(matcher.matches("page.swp", false));
        assert!(matcher.matches("blog/.DS_Store", false));
        assert!(!matcher.matches("keep.swp", false));

        assert!(matcher.matches("private", true));
        assert!(!matcher.matches("private", false));

        assert!(matcher.matches("TODO", false));
        assert!(!matcher.matches("blog/TODO", false));

        assert!(!matcher.matches("index.md", false));
    }

    #[test]
    fn test_ignore_matcher_case_insensitive() {
        let matcher = IgnoreMatcher::new(b"*.bak\nsecret.md\n/Notes");

        assert!(matcher.matches("old.BAK", false));
        assert!(matcher.matches("blog/Old.Bak", false));
        assert!(matcher.matches("SECRET.md", false));
        assert!(matcher.matches("blog/Secret.MD", false));
        assert!(matcher.matches("notes", false));
        assert!(matcher.matches("NOTES", true));
    }

    #[test]
    fn test_ignore_matcher_precedence() {
        // Last one wins.
        let matcher = IgnoreMatcher::new(b"*.md\n!readme.md\nreadme.md");
        assert!(matcher.matches("readme.md", false));
    }

    #[test]
    fn test_ignore_matcher_comments_and_blank_lines() {
        let matcher = IgnoreMatcher::new(b"# comment\n\n*.tmp\n");
        assert!(!matcher.matches("# comment", false));
        assert!(matcher.matches("a.tmp", false));
    }

    #[test]
    fn test_from_path_missing_file_is_empty() {
        let matcher = IgnoreMatcher::from_path(Path::new("/nonexistent/.supernumignore")).unwrap();
        assert!(matcher.is_empty());
        assert!(!matcher.is_ignored(Path::new("anything.md"), false));
    }

    #[test]
    fn test_is_ignored_uses_slash_paths() {
        let matcher = IgnoreMatcher::new(b"blog/draft-*");
        assert!(matcher.is_ignored(Path::new("blog").join("Draft-1.md").as_path(), false));
        assert!(!matcher.is_ignored(Path::new("draft-1.md"), false));
    }
}
