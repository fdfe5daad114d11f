use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::http::HttpOptions;
use crate::retry::RetryPolicy;
use crate::source;

/// Retry policy parameters (optional `[retry]` section in config.toml).
/// When the section is absent the fetch is attempted exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.5,
            max_delay_secs: 30,
        }
    }
}

/// Configuration loaded from `~/.config/tlefetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Resource to GET.
    pub url: String,
    /// Destination file; relative paths resolve against the working directory.
    pub output_path: PathBuf,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout in seconds.
    pub timeout_secs: u64,
    /// Write only when the server answers 2xx. `false` keeps whatever body came back.
    pub require_success: bool,
    /// Optional retry policy; if missing, a single attempt is made.
    pub retry: Option<RetryConfig>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: source::default_url(),
            output_path: PathBuf::from(source::DEFAULT_OUTPUT),
            connect_timeout_secs: 15,
            timeout_secs: 60,
            require_success: true,
            retry: None,
        }
    }
}

impl FetchConfig {
    /// Convenience constructor for a given target and destination, other values default.
    pub fn new(url: impl Into<String>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            require_success: self.require_success,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .map(RetryPolicy::from)
            .unwrap_or_else(RetryPolicy::single_attempt)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tlefetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from `path`. Missing keys take their defaults.
pub fn load_from(path: &Path) -> Result<FetchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: FetchConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}
