//! CLI for the mfetch model fetcher.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mfetch_core::config::{self, FetchConfig};
use std::path::{Path, PathBuf};

use commands::{run_config_path, run_fetch, run_sources, FetchOverrides};

/// Top-level CLI for the mfetch model fetcher.
#[derive(Debug, Parser)]
#[command(name = "mfetch")]
#[command(about = "mfetch: download a model file from the first working source", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/mfetch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Defaults to `fetch` when omitted.
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Try each source in order until one yields a large enough file.
    Fetch {
        /// Source URL to try; repeat to give several (replaces the configured list).
        #[arg(long = "source", value_name = "URL")]
        sources: Vec<String>,
        /// Destination path (its directory must already exist).
        #[arg(long, value_name = "PATH")]
        dest: Option<PathBuf>,
        /// Accept a download only if it is larger than this many bytes.
        #[arg(long, value_name = "BYTES")]
        min_size: Option<u64>,
        /// Move undersized downloads into the destination even though they are rejected.
        #[arg(long)]
        keep_undersized: bool,
        /// Exit with status 1 when no source succeeds.
        #[arg(long)]
        strict: bool,
    },

    /// List the configured sources in trial order.
    Sources,

    /// Print the location of the configuration file.
    ConfigPath,
}

impl Default for CliCommand {
    fn default() -> Self {
        CliCommand::Fetch {
            sources: Vec::new(),
            dest: None,
            min_size: None,
            keep_undersized: false,
            strict: false,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<FetchConfig> {
    let cfg = match path {
        Some(p) => config::load_from(p)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let config_file = cli.config.as_deref();

        match cli.command.unwrap_or_default() {
            CliCommand::Fetch {
                sources,
                dest,
                min_size,
                keep_undersized,
                strict,
            } => {
                let overrides = FetchOverrides {
                    sources,
                    dest,
                    min_size,
                    keep_undersized,
                };
                run_fetch(load_config(config_file)?, overrides, strict)?;
            }
            CliCommand::Sources => run_sources(&load_config(config_file)?),
            CliCommand::ConfigPath => run_config_path(config_file)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
