//! Logging init: append to a file under the XDG state dir, or stderr.
//!
//! Filter comes from `RUST_LOG` when set, otherwise `DEFAULT_FILTER`.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,tlefetch=debug,tlefetch_core=debug";

const LOG_FILE: &str = "tlefetch.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `~/.local/state/tlefetch/tlefetch.log` (honours `XDG_STATE_HOME`).
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tlefetch")?;
    Ok(xdg_dirs.get_state_home().join("tlefetch").join(LOG_FILE))
}

/// Initialize logging to the state-dir log file.
/// Returns Err when the file cannot be opened so the caller can fall back to stderr.
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log dir {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    // One handle shared by every event; tracing-subscriber locks it per write.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!("tlefetch logging initialized at {}", path.display());
    Ok(())
}

/// Initialize logging to stderr only. Used when `init_logging` fails.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_lives_in_tlefetch_state_dir() {
        let path = log_file_path().unwrap();
        assert!(path.ends_with("tlefetch/tlefetch.log"));
    }

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
