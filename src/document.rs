//! Front matter and named content blocks.
//!
//! A content file is split on a marker string (default `%%`):
//!
//! ```text
//! template: page.html        ┐
//! title: Hello               ┘ front matter (YAML mapping)
//! %% body                    ┐
//! # Hello                    │ block "body", decoded to HTML
//! Some *markdown*.           ┘
//! %% sidebar                 ┐
//! - a link                   ┘ block "sidebar"
//! ```
//!
//! The first line of every segment after the front matter is the block name;
//! the rest of the segment is the block text.

use crate::{
    context::{Mapping, Value},
    decoder::Decoder,
    error::{BuildError, BuildResult},
};
use std::path::Path;

/// Default block marker.
pub const DEFAULT_MARKER: &str = "%%";

/// One parsed content file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub metadata: Mapping,
    /// `(name, html)` pairs in file order.
    pub blocks: Vec<(String, String)>,
}

/// Split a content file into front matter and decoded blocks.
pub fn parse_document(
    raw: &[u8],
    marker: &str,
    decoder: &dyn Decoder,
    path: &Path,
) -> BuildResult<Document> {
    let text = as_text(raw, path)?;
    let mut segments = text.split(marker);

    let metadata = parse_metadata(segments.next().unwrap_or_default(), path)?;
    let blocks = segments
        .map(|segment| {
            let (name, body) = segment.split_once('\n').unwrap_or((segment, ""));
            (name.trim().to_owned(), decoder.decode(body.trim()))
        })
        .collect();

    Ok(Document { metadata, blocks })
}

/// Front matter only: the first segment of a content file.
pub fn split_metadata<'a>(text: &'a str, marker: &str) -> &'a str {
    text.split(marker).next().unwrap_or_default()
}

/// Parse a YAML document that must be a mapping (or empty).
pub fn parse_metadata(yaml: &str, path: &Path) -> BuildResult<Mapping> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml)
        .map_err(|err| BuildError::Parse(path.to_path_buf(), err.to_string()))?;

    match Value::from(value) {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(map) => Ok(map),
        _ => Err(BuildError::Parse(
            path.to_path_buf(),
            "front matter must be a mapping".into(),
        )),
    }
}

/// Decode raw file bytes as UTF-8.
pub fn as_text<'a>(raw: &'a [u8], path: &Path) -> BuildResult<&'a str> {
    std::str::from_utf8(raw).map_err(|err| BuildError::Parse(path.to_path_buf(), err.to_string()))
}
