//! Template engine wrapper around `minijinja`.
//!
//! Named templates are loaded from the template directory; synthesized child
//! templates are compiled from strings and may `extend` any named template.
//! Auto-escaping is off: block content is already HTML.

use crate::{
    context::Mapping,
    error::{BuildError, BuildResult},
};
use minijinja::{AutoEscape, Environment, Error, ErrorKind, Value as JinjaValue, path_loader};
use regex::Regex;
use std::path::Path;

pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create an engine loading named templates from `dir`.
    pub fn new(dir: &Path) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(dir));
        env.set_auto_escape_callback(|_| AutoEscape::None);
        register_filters(&mut env);
        Self { env }
    }

    /// Render the template named `name` from the template directory.
    ///
    /// Only a missing `name` becomes [`BuildError::TemplateNotFound`]; errors
    /// raised while rendering, missing includes among them, pass through.
    pub fn render_named(&self, name: &str, context: &Mapping) -> BuildResult<String> {
        let template = self
            .env
            .get_template(name)
            .map_err(|err| BuildError::from_template(err, name))?;
        Ok(template.render(context)?)
    }

    /// Compile `source` and render it immediately.
    ///
    /// `parent` names the template `source` extends. It is looked up first so
    /// that a missing parent is reported by name.
    pub fn render_str(&self, source: &str, parent: &str, context: &Mapping) -> BuildResult<String> {
        self.env
            .get_template(parent)
            .map_err(|err| BuildError::from_template(err, parent))?;
        Ok(self.env.render_str(source, context)?)
    }
}

// ============================================================================
// Filters
// ============================================================================

fn register_filters(env: &mut Environment<'static>) {
    env.add_filter("regex_replace", regex_replace);
    env.add_filter("pprint", pprint);
}

/// `{{ value | regex_replace("\\s+", "-") }}`
fn regex_replace(value: String, pattern: String, replacement: String) -> Result<String, Error> {
    let re = Regex::new(&pattern).map_err(|err| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("invalid pattern `{pattern}`: {err}"),
        )
    })?;
    Ok(re.replace_all(&value, replacement.as_str()).into_owned())
}

/// `{{ value | pprint }}`: indented JSON, handy for debugging contexts.
fn pprint(value: JinjaValue) -> Result<String, Error> {
    serde_json::to_string_pretty(&value)
        .map_err(|err| Error::new(ErrorKind::InvalidOperation, err.to_string()))
}
