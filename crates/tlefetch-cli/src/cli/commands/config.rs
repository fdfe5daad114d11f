//! `tlefetch config` – show where the config lives and what it resolves to.

use anyhow::Result;
use std::path::Path;
use tlefetch_core::config::{self, FetchConfig};

pub fn run_config(explicit: Option<&Path>, cfg: &FetchConfig) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
