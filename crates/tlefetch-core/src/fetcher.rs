//! Fetch-normalize-persist.
//!
//! One synchronous pass: GET the configured URL (retrying only when a retry
//! policy is configured), rewrite `\r\n` to `\n`, and replace the output file
//! with the result. A failed GET never creates or touches the output file.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::checksum;
use crate::config::FetchConfig;
use crate::http;
use crate::normalize::{count_crlf, normalize_line_endings};
use crate::retry::run_with_retry;
use crate::storage;

/// What a successful run fetched and wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub url: String,
    pub output_path: PathBuf,
    /// Payload size as received.
    pub bytes_received: u64,
    /// Size written after normalization.
    pub bytes_written: u64,
    /// Number of `\r\n` pairs rewritten to `\n`.
    pub line_endings_replaced: usize,
    /// SHA-256 (hex) of the written bytes.
    pub sha256: String,
}

/// GET `config.url`, normalize line endings, and write to `config.output_path`.
pub fn fetch_and_write(config: &FetchConfig) -> Result<FetchReport> {
    let url = config.url.as_str();
    let opts = config.http_options();
    let policy = config.retry_policy();

    tracing::info!(url, max_attempts = policy.max_attempts, "fetching elements");
    let payload = run_with_retry(&policy, || http::fetch_body(url, &opts))
        .with_context(|| format!("GET {} failed", url))?;

    let replaced = count_crlf(&payload);
    let normalized = normalize_line_endings(&payload);
    tracing::debug!(
        received = payload.len(),
        replaced,
        "normalized line endings"
    );

    storage::write_output(&config.output_path, &normalized)
        .with_context(|| format!("failed to write {}", config.output_path.display()))?;

    let report = FetchReport {
        url: config.url.clone(),
        output_path: config.output_path.clone(),
        bytes_received: payload.len() as u64,
        bytes_written: normalized.len() as u64,
        line_endings_replaced: replaced,
        sha256: checksum::sha256_bytes(&normalized),
    };
    tracing::info!(
        path = %report.output_path.display(),
        bytes = report.bytes_written,
        sha256 = %report.sha256,
        "wrote elements"
    );
    Ok(report)
}
