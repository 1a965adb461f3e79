//! Content decoders: text of one block → HTML.
//!
//! Decoders are looked up by file extension. A file whose extension has no
//! decoder (and is not a YAML data page) is a static asset and gets copied.
//!
//! | Extension         | Decoder             |
//! |-------------------|---------------------|
//! | `html`, `htm`     | [`HtmlDecoder`]     |
//! | `md`, `markdown`  | [`MarkdownDecoder`] |
//! | `rst`             | [`RstDecoder`]      |

mod rst;

pub use rst::RstDecoder;

use pulldown_cmark::{Options, Parser, html};
use std::{collections::HashMap, sync::Arc};

/// Converts the text of a content block into HTML.
pub trait Decoder: Send + Sync {
    fn decode(&self, text: &str) -> String;
}

/// HTML passes through untouched.
pub struct HtmlDecoder;

impl Decoder for HtmlDecoder {
    fn decode(&self, text: &str) -> String {
        text.to_owned()
    }
}

/// CommonMark with the usual extensions.
pub struct MarkdownDecoder {
    options: Options,
}

impl Default for MarkdownDecoder {
    fn default() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        Self { options }
    }
}

impl Decoder for MarkdownDecoder {
    fn decode(&self, text: &str) -> String {
        let parser = Parser::new_ext(text, self.options);
        let mut output = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }
}

/// Table from lowercase extension to decoder.
pub struct DecoderRegistry {
    decoders: HashMap<String, Arc<dyn Decoder>>,
}

impl DecoderRegistry {
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register a decoder for one or more extensions, replacing earlier ones.
    pub fn register<D: Decoder + 'static>(&mut self, extensions: &[&str], decoder: D) {
        let decoder: Arc<dyn Decoder> = Arc::new(decoder);
        for ext in extensions {
            self.decoders
                .insert(ext.to_ascii_lowercase(), Arc::clone(&decoder));
        }
    }

    pub fn get(&self, extension: &str) -> Option<&dyn Decoder> {
        self.decoders
            .get(&extension.to_ascii_lowercase())
            .map(Arc::as_ref)
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.get(extension).is_some()
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(&["html", "htm"], HtmlDecoder);
        registry.register(&["md", "markdown"], MarkdownDecoder::default());
        registry.register(&["rst"], RstDecoder);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_heading() {
        let html = MarkdownDecoder::default().decode("# Hi");
        assert_eq!(html.trim(), "<h1>Hi</h1>");
    }

    #[test]
    fn test_markdown_table_extension() {
        let html = MarkdownDecoder::default().decode("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_html_is_identity() {
        let text = "<p>{{ title }}</p>";
        assert_eq!(HtmlDecoder.decode(text), text);
    }

    #[test]
    fn test_registry_defaults() {
        let registry = DecoderRegistry::default();
        assert!(registry.contains("md"));
        assert!(registry.contains("MD"));
        assert!(registry.contains("markdown"));
        assert!(registry.contains("rst"));
        assert!(registry.contains("html"));
        assert!(!registry.contains("css"));
        assert!(!registry.contains("yaml"));
    }

    #[test]
    fn test_registry_custom_decoder() {
        struct Shout;
        impl Decoder for Shout {
            fn decode(&self, text: &str) -> String {
                text.to_uppercase()
            }
        }

        let mut registry = DecoderRegistry::empty();
        registry.register(&["txt", "text"], Shout);
        assert_eq!(registry.get("txt").unwrap().decode("hi"), "HI");
        assert_eq!(registry.get("TEXT").unwrap().decode("yo"), "YO");
        assert!(registry.get("md").is_none());
    }
}
