//! Site configuration management for `supernum.toml`.
//!
//! # Sections
//!
//! | Section           | Purpose                                      |
//! |-------------------|----------------------------------------------|
//! | `[build]`         | Source/output paths, marker, templates       |
//! | `[build.sitemap]` | Sitemap file name and hidden pages           |
//! | `[build.feed]`    | Feed file name                               |
//! | `[serve]`         | Development server (interface, port)         |
//!
//! The file is optional. CLI arguments override file values, and every path
//! is resolved against the working directory.
//!
//! # Example
//!
//! ```toml
//! [build]
//! root = "root"
//! output = "build"
//! feed_len = 20
//!
//! [build.sitemap]
//! hidden = ["404.html"]
//!
//! [serve]
//! port = 8000
//! ```

mod build;
pub mod defaults;
mod error;
mod serve;

// Internal imports used in this module
use build::BuildConfig;
use error::ConfigError;
use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Context, Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing supernum.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute working directory (set after loading)
    #[serde(skip)]
    pub workdir: PathBuf,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content).with_context(|| format!("Invalid config `{}`", path.display()))
    }

    /// Load `supernum.toml` from the CLI working directory (if present),
    /// apply CLI overrides, resolve paths and validate.
    pub fn load(cli: &Cli) -> Result<Self> {
        let workdir = Self::normalize_path(&cli.workdir);
        let config_path = workdir.join(&cli.config);

        let mut config = if config_path.is_file() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.config_path = config_path;

        config.update_with_cli(cli);
        config.update_path_with_root(&workdir);
        config.validate()?;
        Ok(config)
    }

    /// Update configuration with CLI arguments
    fn update_with_cli(&mut self, cli: &Cli) {
        Self::update_option(&mut self.build.context, cli.context.as_ref());
        Self::update_option(&mut self.build.templates, cli.templates.as_ref());
        Self::update_option(&mut self.build.index, cli.index.as_ref());
        Self::update_option(&mut self.build.root, cli.root.as_ref());
        Self::update_option(&mut self.build.output, cli.build.as_ref());

        self.build.force |= cli.force;
        self.build.keep_going |= cli.keep_going;

        if let Some(Commands::Serve { interface, port }) = &cli.command {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve all paths against the working directory
    fn update_path_with_root(&mut self, workdir: &Path) {
        self.workdir = workdir.to_path_buf();

        self.build.root = Self::normalize_path(&workdir.join(&self.build.root));
        self.build.output = Self::normalize_path(&workdir.join(&self.build.output));
        self.build.templates = Self::normalize_path(&workdir.join(&self.build.templates));
        self.build.context = Self::normalize_path(&workdir.join(&self.build.context));
        self.build.ignore = Self::normalize_path(&workdir.join(&self.build.ignore));

        // Aggregates live inside the build directory
        self.build.sitemap.path = self.build.output.join(&self.build.sitemap.path);
        self.build.feed.path = self.build.output.join(&self.build.feed.path);
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.build.marker.is_empty() {
            bail!(ConfigError::Validation(
                "[build.marker] must not be empty".into()
            ));
        }

        if self.build.feed_len == 0 {
            bail!(ConfigError::Validation(
                "[build.feed_len] must be greater than zero".into()
            ));
        }

        if self.build.output == self.build.root {
            bail!(ConfigError::Validation(
                "[build.output] must differ from [build.root]".into()
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
