//! Content renderer.
//!
//! Two paths, picked by file extension:
//!
//! ```text
//! md/rst/html  ─► parse_document ─► page_context ─► synthesize ─► render_str
//! yaml/yml     ─► parse_metadata ─► page_context ─────────────► render_named
//! ```
//!
//! Anything else is a static asset and never reaches the renderer.

use crate::{
    context::{Mapping, PageRef, Value, page_context},
    decoder::{Decoder, DecoderRegistry},
    document::{as_text, parse_document, parse_metadata},
    error::{BuildError, BuildResult},
    template::{TemplateEngine, synthesize},
};
use std::path::Path;

/// Extensions rendered directly against their named template.
const DATA_PAGE_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Whether a (lowercase) extension marks a YAML data page.
pub fn is_data_page(ext: &str) -> bool {
    DATA_PAGE_EXTENSIONS.contains(&ext)
}

/// How the walker treats one source file.
pub enum FileKind<'a> {
    /// Front matter plus blocks, decoded by the given decoder.
    Content(&'a dyn Decoder),
    /// Pure YAML, rendered against the named template.
    Data,
    /// Copied verbatim.
    Asset,
}

/// Everything needed to turn source files into HTML.
pub struct Renderer {
    engine: TemplateEngine,
    decoders: DecoderRegistry,
    marker: String,
    default_template: String,
}

impl Renderer {
    pub fn new(
        engine: TemplateEngine,
        decoders: DecoderRegistry,
        marker: impl Into<String>,
        default_template: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            decoders,
            marker: marker.into(),
            default_template: default_template.into(),
        }
    }

    pub fn decoders(&self) -> &DecoderRegistry {
        &self.decoders
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Classify a file by its lowercase extension.
    pub fn classify(&self, ext: Option<&str>) -> FileKind<'_> {
        match ext {
            Some(ext) if is_data_page(ext) => FileKind::Data,
            Some(ext) => self.decoders.get(ext).map_or(FileKind::Asset, FileKind::Content),
            None => FileKind::Asset,
        }
    }

    /// Render a content file: its blocks fill the regions of the parent
    /// template named by the `template` key.
    pub fn render_blocks(
        &self,
        raw: &[u8],
        decoder: &dyn Decoder,
        path: &Path,
        global: &Mapping,
        page: PageRef,
    ) -> BuildResult<String> {
        let document = parse_document(raw, &self.marker, decoder, path)?;
        let parent = self.template_name(&document.metadata, path)?;
        let context = page_context(global, &document.metadata, page);

        let source = synthesize(parent, &document.blocks);
        self.engine.render_str(&source, parent, &context)
    }

    /// Render a YAML page: the whole file is metadata and the `template` key
    /// names the template to render.
    pub fn render_data(
        &self,
        raw: &[u8],
        path: &Path,
        global: &Mapping,
        page: PageRef,
    ) -> BuildResult<String> {
        let metadata = parse_metadata(as_text(raw, path)?, path)?;
        let name = self.template_name(&metadata, path)?;
        let context = page_context(global, &metadata, page);
        self.engine.render_named(name, &context)
    }

    /// The `template` key, or the default when it is absent or null.
    fn template_name<'a>(&'a self, metadata: &'a Mapping, path: &Path) -> BuildResult<&'a str> {
        match metadata.get("template") {
            None | Some(Value::Null) => Ok(self.default_template.as_str()),
            Some(Value::String(name)) => Ok(name.as_str()),
            Some(_) => Err(BuildError::Parse(
                path.to_path_buf(),
                "`template` must be a string".into(),
            )),
        }
    }
}
