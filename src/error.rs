//! Build error taxonomy.
//!
//! Every variant aborts the build by default. In keep-going mode file-level
//! failures are collected and reported together as [`BuildError::Failures`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the render pipeline and the build orchestration.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Global context file missing or not a YAML mapping.
    #[error("failed to load `{0}`: {1}")]
    ConfigLoad(PathBuf, String),

    /// Malformed front matter, data page or non UTF-8 content.
    #[error("parse error in `{0}`: {1}")]
    Parse(PathBuf, String),

    /// A parent or page template does not exist in the template directory.
    #[error("template not found: `{0}`")]
    TemplateNotFound(String),

    /// Any other template engine failure, passed through unchanged.
    #[error("template error")]
    Template(#[from] minijinja::Error),

    #[error("IO error at `{0}`")]
    Filesystem(PathBuf, #[source] std::io::Error),

    /// Accumulated file failures (keep-going mode only).
    #[error("{} file(s) failed to build", .0.len())]
    Failures(Vec<FileFailure>),
}

/// A single failed source file in keep-going mode.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

impl BuildError {
    /// Wrap an IO error with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Filesystem(path.into(), err)
    }

    /// Translate the error of looking up the template `name`, lifting a
    /// missing template into [`BuildError::TemplateNotFound`].
    pub fn from_template(err: minijinja::Error, name: &str) -> Self {
        match err.kind() {
            minijinja::ErrorKind::TemplateNotFound => Self::TemplateNotFound(name.to_owned()),
            _ => Self::Template(err),
        }
    }
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;
