//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `extract`: metadata extraction to JSON
//! - `rules`: rule table listing and config bootstrap

mod extract;
mod rules;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{self, Config};

pub use extract::cmd_extract;
pub use rules::{cmd_init_config, cmd_rules};

/// Extract title, artist, store provenance and jacket fingerprints from audio files
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: OS config dir/music-info/config.toml)
    #[arg(long, global = true, env = "MUSIC_INFO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Extract metadata and print it as JSON
    Extract {
        /// Audio files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,
        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
        /// Write each jacket's original image to this directory as <sha1>.<ext>
        #[arg(long, value_name = "DIR")]
        export_jackets: Option<PathBuf>,
    },
    /// List the active provenance rules in priority order
    Rules,
    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the parsed CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Extract {
            paths,
            recursive,
            pretty,
            export_jackets,
        } => {
            let mut config = load_config(cli)?;
            config.output.pretty |= *pretty;
            if export_jackets.is_some() {
                config.jackets.export_dir = export_jackets.clone();
            }
            cmd_extract(paths, *recursive, &config)
        }
        Commands::Rules => cmd_rules(&load_config(cli)?),
        Commands::InitConfig { force } => cmd_init_config(cli.config.as_deref(), *force),
    }
}

/// Explicit `--config` must load; the default location falls back to defaults.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    match &cli.config {
        Some(path) => config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(config::load()),
    }
}
