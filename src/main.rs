//! Sitemill - an asset build pipeline for static widget sites.

mod asset;
mod cli;
mod config;
mod core;
mod logger;
mod pipeline;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{PipelineConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let config = init_config(PipelineConfig::load(cli)?);

    match &cli.command {
        Commands::Build {} => pipeline::run_default(&config),
        Commands::Run { steps } => pipeline::run_requested(steps, &config),
        Commands::Watch {} => watch::run(&config),
    }
}
