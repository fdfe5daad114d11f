//! CLI for tlefetch.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tlefetch_core::config::{self, FetchConfig, RetryConfig};
use tlefetch_core::source;

use commands::{run_checksum, run_config, run_fetch};

/// Top-level CLI. With no subcommand, fetches using the configured values.
#[derive(Debug, Parser)]
#[command(name = "tlefetch")]
#[command(about = "Fetch satellite TLE elements and save them with Unix line endings", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the XDG config dir.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download elements, normalize line endings, and write the output file.
    Fetch(FetchArgs),

    /// Show the config file path and the effective configuration.
    Config,

    /// Compute SHA-256 of a file (e.g. a previously fetched element set).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },
}

/// Per-run overrides of the configured values.
#[derive(Debug, Default, Args)]
pub struct FetchArgs {
    /// URL to fetch (overrides `url` from the config).
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Satellite catalog number; sets the CATNR query parameter of the URL.
    #[arg(long, value_name = "N")]
    pub catnr: Option<u32>,

    /// Destination file (overrides `output_path` from the config).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Retry transient failures up to N times with backoff (0 disables retry).
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Write the body even when the server answers with a non-2xx status.
    #[arg(long)]
    pub allow_error_status: bool,
}

impl FetchArgs {
    /// Layer these flags on top of `cfg`.
    pub fn apply(&self, mut cfg: FetchConfig) -> Result<FetchConfig> {
        if let Some(url) = &self.url {
            cfg.url = url.clone();
        }
        if let Some(catnr) = self.catnr {
            cfg.url = source::catalog_url(&cfg.url, catnr)?;
        }
        if let Some(output) = &self.output {
            cfg.output_path = output.clone();
        }
        match self.retries {
            Some(0) => cfg.retry = None,
            Some(n) => {
                let base = cfg.retry.unwrap_or_default();
                cfg.retry = Some(RetryConfig {
                    max_attempts: n.saturating_add(1),
                    ..base
                });
            }
            None => {}
        }
        if self.allow_error_status {
            cfg.require_success = false;
        }
        Ok(cfg)
    }
}

fn load_config(explicit: Option<&Path>) -> Result<FetchConfig> {
    let cfg = match explicit {
        Some(path) => config::load_from(path)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        Cli::parse().run()
    }

    /// Dispatch a parsed command line. Only the commands that use the
    /// configuration load it (and create the default file on first run).
    pub fn run(self) -> Result<()> {
        let explicit = self.config.as_deref();
        match self.command {
            None => run_fetch(&FetchArgs::default().apply(load_config(explicit)?)?)?,
            Some(CliCommand::Fetch(args)) => run_fetch(&args.apply(load_config(explicit)?)?)?,
            Some(CliCommand::Config) => run_config(explicit, &load_config(explicit)?)?,
            Some(CliCommand::Checksum { path }) => run_checksum(&path)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
