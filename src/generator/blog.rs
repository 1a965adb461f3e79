//! Blog index.
//!
//! Scans the blog subdirectory of the source root before the main walk and
//! collects the front matter of every post with a usable `published` date.
//! The list is sorted newest first and exposed to templates as `posts`.

use crate::{
    context::{Mapping, Value},
    decoder::DecoderRegistry,
    document::{as_text, parse_metadata, split_metadata},
    error::{BuildError, BuildResult},
    render::is_data_page,
    utils::{date::parse_published, ignore::IgnoreMatcher, slug},
};
use chrono::NaiveDate;
use std::{fs, path::Path};
use walkdir::WalkDir;

/// One entry of the blog index.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub metadata: Mapping,
    /// Site-absolute link to the rendered post, e.g. `/blog/hello.html`.
    pub href: String,
    pub published: NaiveDate,
}

impl BlogPost {
    /// Post metadata plus `href`, as seen by templates.
    pub fn to_value(&self) -> Value {
        let mut map = self.metadata.clone();
        map.insert("href".to_owned(), Value::String(self.href.clone()));
        Value::Mapping(map)
    }

    /// Text of a metadata field, if present and scalar.
    pub fn field(&self, key: &str) -> Option<String> {
        self.metadata
            .get(key)
            .and_then(Value::to_text)
            .filter(|s| !s.is_empty())
    }
}

/// Settings the blog index needs from the build.
pub struct BlogSource<'a> {
    pub root: &'a Path,
    pub blog_dir: &'a Path,
    pub ignore: &'a IgnoreMatcher,
    pub decoders: &'a DecoderRegistry,
    pub marker: &'a str,
}

/// Collect posts under `<root>/<blog_dir>`, newest first.
///
/// A missing blog directory yields an empty list. Posts without a parseable
/// `published` date are skipped; equal dates keep walk order.
pub fn collect_posts(source: &BlogSource) -> BuildResult<Vec<BlogPost>> {
    let dir = source.root.join(source.blog_dir);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let walker = WalkDir::new(&dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let rel = entry.path().strip_prefix(source.root).unwrap_or(entry.path());
            !source.ignore.is_ignored(rel, entry.file_type().is_dir())
        });

    let mut posts = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(&dir).to_path_buf();
            BuildError::io(path, err.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let rel = path.strip_prefix(source.root).unwrap_or(path);
        let Some(ext) = slug::extension(path) else {
            continue;
        };
        let metadata = if source.decoders.contains(&ext) {
            let raw = fs::read(path).map_err(|err| BuildError::io(path, err))?;
            parse_metadata(split_metadata(as_text(&raw, path)?, source.marker), path)?
        } else if is_data_page(&ext) {
            let raw = fs::read(path).map_err(|err| BuildError::io(path, err))?;
            parse_metadata(as_text(&raw, path)?, path)?
        } else {
            continue;
        };

        let Some(published) = metadata.get("published").and_then(parse_published) else {
            continue;
        };

        posts.push(BlogPost {
            href: format!("/{}", slug::url_path(&slug::html_path(rel))),
            metadata,
            published,
        });
    }

    sort_posts(&mut posts);
    Ok(posts)
}

/// Newest first. The sort is stable, so ties keep encounter order.
pub fn sort_posts(posts: &mut [BlogPost]) {
    posts.sort_by(|a, b| b.published.cmp(&a.published));
}

/// Template value for the `posts` context key.
pub fn posts_value(posts: &[BlogPost]) -> Value {
    Value::Sequence(posts.iter().map(BlogPost::to_value).collect())
}
