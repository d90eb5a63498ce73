//! vizindex - keeps an index page of rendered visualizations up to date.

mod build;
mod cli;
mod config;
mod deploy;
mod index;
mod logger;
mod utils;

use anyhow::Result;
use build::build_index;
use clap::Parser;
use cli::{Cli, Commands};
use config::IndexConfig;
use deploy::{deploy_index, open_repo};

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static IndexConfig = Box::leak(Box::new(load_config(cli)?));

    match &cli.command {
        Commands::Build { .. } => build(config),
        Commands::Deploy { .. } => {
            // fail before touching the page if there is nowhere to publish it
            let repo = open_repo(config)?;
            build(config)?;
            deploy_index(&repo, config)
        }
    }
}

fn build(config: &'static IndexConfig) -> Result<()> {
    let report = build_index(config)?;
    let summary = report.summary;
    log!(
        "build";
        "{} sections written to {} ({} new, {} updated today, {} kept)",
        report.groups, report.output.display(), summary.new, summary.updated, summary.kept
    );
    Ok(())
}

/// Load the optional config file, apply CLI overrides and validate.
fn load_config(cli: &'static Cli) -> Result<IndexConfig> {
    let config = IndexConfig::load(cli)?;
    config.validate()?;
    Ok(config)
}
