//! supernum - A static site generator driven by YAML front matter and
//! template inheritance.

mod build;
mod cli;
mod config;
mod context;
mod decoder;
mod document;
mod error;
mod generator;
mod render;
mod serve;
mod template;
mod utils;

use anyhow::Result;
use build::{BuildOutcome, build_site, prompt_overwrite};
use clap::Parser;
use cli::Cli;
use config::SiteConfig;
use serve::serve_site;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

/// Build, then serve if asked to. A declined overwrite prompt ends the run
/// successfully without serving.
fn run(cli: &Cli) -> Result<()> {
    let config = SiteConfig::load(cli)?;

    match build_site(&config, prompt_overwrite)? {
        BuildOutcome::Declined => Ok(()),
        BuildOutcome::Built(_) if cli.is_serve() => serve_site(&config),
        BuildOutcome::Built(_) => Ok(()),
    }
}

/// Print the error chain, listing every failed file in keep-going mode.
fn report(err: &anyhow::Error) {
    if let Some(error::BuildError::Failures(failures)) = err.downcast_ref::<error::BuildError>() {
        for failure in failures {
            log!("error"; "{}: {}", failure.path.display(), failure.message);
        }
    }
    log!("error"; "{:#}", err);
}
