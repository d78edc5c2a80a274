//! tola-icons - Font Awesome icon sprites for generated HTML.

mod bundle;
mod cli;
mod config;
mod icon;
mod logger;
mod pipeline;
mod transform;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::IconsConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = IconsConfig::load(&cli)?;
    debug!("config"; "{} (root {})", config.config_path.display(), config.root.display());

    match &cli.command {
        Commands::Build { args } => cli::build::build_pages(&config, args.quiet).map(|_| ()),
        Commands::Lookup { selector } => cli::lookup::lookup_icon(selector, &config),
    }
}
