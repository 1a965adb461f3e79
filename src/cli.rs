//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// supernum static site generator CLI
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Working directory; every other path is relative to it
    #[arg(default_value = ".")]
    pub workdir: PathBuf,

    /// Global context file (default: context.yaml)
    #[arg(short, long)]
    pub context: Option<PathBuf>,

    /// Template directory (default: templates)
    #[arg(short, long)]
    pub templates: Option<PathBuf>,

    /// Directory index file name (default: index.html)
    #[arg(short, long)]
    pub index: Option<String>,

    /// Source root directory (default: root)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Build output directory (default: build)
    #[arg(short, long)]
    pub build: Option<PathBuf>,

    /// Config file name (default: supernum.toml)
    #[arg(short = 'C', long, default_value = "supernum.toml")]
    pub config: PathBuf,

    /// Delete an existing build directory without asking
    #[arg(short, long)]
    pub force: bool,

    /// Keep building after a file fails and report all failures at the end
    #[arg(short, long)]
    pub keep_going: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Deletes the output directory if there is one and rebuilds the site
    Build,

    /// Build the site, then serve the output directory
    Serve {
        /// Interface to bind on
        #[arg(long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Cli {
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Some(Commands::Serve { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("supernum").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.workdir, PathBuf::from("."));
        assert_eq!(cli.config, PathBuf::from("supernum.toml"));
        assert!(cli.command.is_none());
        assert!(!cli.force);
        assert!(!cli.keep_going);
        assert!(!cli.is_serve());
    }

    #[test]
    fn test_path_overrides() {
        let cli = parse(&[
            "site", "-c", "ctx.yml", "-t", "tpl", "-i", "default.htm", "-r", "src", "-b", "out", "-f", "-k",
        ]);
        assert_eq!(cli.workdir, PathBuf::from("site"));
        assert_eq!(cli.context, Some(PathBuf::from("ctx.yml")));
        assert_eq!(cli.templates, Some(PathBuf::from("tpl")));
        assert_eq!(cli.index.as_deref(), Some("default.htm"));
        assert_eq!(cli.root, Some(PathBuf::from("src")));
        assert_eq!(cli.build, Some(PathBuf::from("out")));
        assert!(cli.force);
        assert!(cli.keep_going);
    }

    #[test]
    fn test_serve_command() {
        let cli = parse(&["site", "serve", "--interface", "0.0.0.0", "-p", "9000"]);
        assert!(cli.is_serve());
        let Some(Commands::Serve { interface, port }) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(interface.as_deref(), Some("0.0.0.0"));
        assert_eq!(port, Some(9000));
    }

    #[test]
    fn test_build_command() {
        let cli = parse(&["build"]);
        // a bare word is taken as the subcommand, not the workdir
        assert!(matches!(cli.command, Some(Commands::Build)));
    }
}
