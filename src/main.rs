//! blockbuild - Build the Blockly loaders, compressed bundles and message files.

mod cli;
mod compiler;
mod config;
mod freshness;
mod graph;
mod langfiles;
mod logger;
mod output;
mod target;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, build::build_all};
use config::BuildConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = BuildConfig::load(&cli)?;

    // Failed targets are reported individually; only planning errors abort.
    build_all(&config, &cli)?;
    Ok(())
}
