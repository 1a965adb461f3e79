//! Template synthesis: a child template built on the fly from named blocks.
//!
//! ```text
//! parent = "page.html", blocks = [("body", "<h1>Hi</h1>")]
//!
//! {% extends "page.html" %}
//! {% block body %}<h1>Hi</h1>{% endblock %}
//! ```
//!
//! Block content is inserted verbatim, so template expressions inside a
//! content file are evaluated like any other template code. Block names are
//! not validated; a name the engine cannot parse surfaces as a template error.

/// Build inheritance markup extending `parent` with one region per block.
///
/// A block name that appears more than once keeps its first position and the
/// content of its last occurrence.
pub fn synthesize(parent: &str, blocks: &[(String, String)]) -> String {
    let mut regions: Vec<(&str, &str)> = Vec::with_capacity(blocks.len());
    for (name, content) in blocks {
        match regions.iter_mut().find(|(existing, _)| *existing == name.as_str()) {
            Some(region) => region.1 = content.as_str(),
            None => regions.push((name.as_str(), content.as_str())),
        }
    }

    let mut template = format!("{{% extends {} %}}\n", quote(parent));
    for (name, content) in regions {
        template.push_str(&format!("{{% block {name} %}}{content}{{% endblock %}}\n"));
    }
    template
}

/// Quote a template name as a string literal.
fn quote(name: &str) -> String {
    serde_json::to_string(name).unwrap_or_else(|_| format!("\"{name}\""))
}
