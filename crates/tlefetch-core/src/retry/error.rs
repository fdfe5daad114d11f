//! Fetch error type for retry classification.

use thiserror::Error;

/// Error returned by a single GET attempt (curl failure or HTTP error status).
/// Kept typed so the retry layer can classify it before it is turned into anyhow.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response carried a non-2xx status.
    #[error("HTTP {status}")]
    Http { status: u32 },
}
