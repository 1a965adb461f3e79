//! Rendering context: global site data, per-file metadata and page reference.
//!
//! ```text
//! global (context.yaml + now/today/posts)
//!    ⊕ front matter of the page
//!    ⊕ page reference (filename/path/slug)
//!    = context handed to the template engine
//! ```
//!
//! Later layers replace colliding top-level keys whole; nested mappings are
//! not merged.
//! The global layer is only ever read: each page gets its own deep copy.

mod value;

pub use value::{Mapping, Value};

use crate::{
    error::{BuildError, BuildResult},
    utils::{date, slug::slugify},
};
use std::{fs, path::Path};

// ============================================================================
// Page Reference
// ============================================================================

/// Identity of one rendered output file.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRef {
    /// Base name of the output file, e.g. `hello-world.html`.
    pub filename: String,
    /// Output path relative to the build directory, `/`-separated.
    pub path: String,
    pub slug: String,
}

impl PageRef {
    /// Derive the reference from an output path relative to the build directory.
    pub fn new(rel_output: &Path) -> Self {
        let path = rel_output
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let filename = rel_output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = rel_output
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            slug: slugify(&stem),
            filename,
            path,
        }
    }

    fn into_mapping(self) -> Mapping {
        Mapping::from([
            ("filename".to_owned(), Value::String(self.filename)),
            ("path".to_owned(), Value::String(self.path)),
            ("slug".to_owned(), Value::String(self.slug)),
        ])
    }
}

// ============================================================================
// Merging
// ============================================================================

/// Build the context for one page.
///
/// `global` is cloned before anything is merged into it, so per-page values
/// never leak into the next page.
pub fn page_context(global: &Mapping, meta: &Mapping, page: PageRef) -> Mapping {
    let mut context = global.clone();
    merge_into(&mut context, meta.clone());
    merge_into(&mut context, page.into_mapping());
    context
}

/// Copy every top-level key of `overlay` into `base`, replacing existing values.
pub fn merge_into(base: &mut Mapping, overlay: Mapping) {
    base.extend(overlay);
}

// ============================================================================
// Global Context
// ============================================================================

/// Load the global context file and add the computed entries.
///
/// An empty file is an empty context. Anything other than a mapping at the
/// top level is rejected.
pub fn load_global(path: &Path) -> BuildResult<Mapping> {
    let content = fs::read_to_string(path)
        .map_err(|err| BuildError::ConfigLoad(path.to_path_buf(), err.to_string()))?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
        .map_err(|err| BuildError::ConfigLoad(path.to_path_buf(), err.to_string()))?;

    let mut global = match Value::from(yaml) {
        Value::Null => Mapping::new(),
        Value::Mapping(map) => map,
        _ => {
            return Err(BuildError::ConfigLoad(
                path.to_path_buf(),
                "top level must be a mapping".into(),
            ));
        }
    };

    global.insert("now".to_owned(), Value::String(date::now_rfc3339()));
    global.insert("today".to_owned(), Value::String(date::today()));
    Ok(global)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn mapping(src: &str) -> Mapping {
        match Value::from(serde_yaml::from_str::<serde_yaml::Value>(src).unwrap()) {
            Value::Mapping(map) => map,
            other => panic!("not a mapping: {other:?}"),
        }
    }

    #[test]
    fn test_page_ref_from_output_path() {
        let page = PageRef::new(Path::new("blog/My First Post.html"));
        assert_eq!(page.filename, "My First Post.html");
        assert_eq!(page.path, "blog/My First Post.html");
        assert_eq!(page.slug, "my-first-post");
    }

    #[test]
    fn test_page_context_precedence() {
        let global = mapping("title: Site\nhostname: http://x.test\nslug: global\n");
        let meta = mapping("title: Page\nslug: meta\n");
        let ctx = page_context(&global, &meta, PageRef::new(Path::new("a.html")));

        assert_eq!(ctx["title"], Value::from("Page"));
        assert_eq!(ctx["hostname"], Value::from("http://x.test"));
        // page reference is the last layer
        assert_eq!(ctx["slug"], Value::from("a"));
        assert_eq!(ctx["path"], Value::from("a.html"));
    }

    #[test]
    fn test_colliding_key_replaces_whole_value() {
        let global = mapping("site:\n  name: S\n  nav: [a]\ntitle: Site\n");
        let meta = mapping("site:\n  nav: [b]\n");
        let ctx = page_context(&global, &meta, PageRef::new(Path::new("x.html")));

        let site = ctx["site"].as_mapping().unwrap();
        assert_eq!(site.len(), 1);
        assert!(!site.contains_key("name"));
        assert_eq!(site["nav"], Value::from(vec!["b"]));
        assert_eq!(ctx["title"], Value::from("Site"));
    }

    #[test]
    fn test_merge_does_not_mutate_global() {
        let global = mapping("title: Site\nsite:\n  name: S\n  nested:\n    deep: 1\n");
        let before = serde_json::to_string(&Value::Mapping(global.clone())).unwrap();

        let meta = mapping("title: Changed\nsite:\n  name: T\n  nested:\n    deep: 2\n");
        let _ = page_context(&global, &meta, PageRef::new(Path::new("a.html")));
        let _ = page_context(&global, &Mapping::new(), PageRef::new(Path::new("b.html")));

        let after = serde_json::to_string(&Value::Mapping(global)).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_load_global_adds_computed_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("context.yaml");
        fs::write(&path, "hostname: http://x.test\n").unwrap();

        let global = load_global(&path).unwrap();
        assert_eq!(global["hostname"], Value::from("http://x.test"));
        assert!(global.contains_key("now"));
        assert!(global.contains_key("today"));
    }

    #[test]
    fn test_load_global_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("context.yaml");
        fs::write(&path, "").unwrap();

        let global = load_global(&path).unwrap();
        assert_eq!(global.len(), 2);
    }

    #[test]
    fn test_load_global_errors() {
        let missing = load_global(&PathBuf::from("/nonexistent/context.yaml"));
        assert!(matches!(missing, Err(BuildError::ConfigLoad(..))));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("context.yaml");
        fs::write(&path, "- just\n- a list\n").unwrap();
        assert!(matches!(load_global(&path), Err(BuildError::ConfigLoad(..))));
    }
}
