//! Blocking HTTP GET.
//!
//! Uses the curl crate (libcurl) to fetch a whole response body into memory.
//! No custom headers and no request body are sent; redirects are followed.
//! Runs in the current thread.

use crate::retry::FetchError;
use std::time::Duration;

/// Maximum number of redirects followed before curl gives up.
const MAX_REDIRECTIONS: u32 = 10;

/// Transfer options for a single GET.
#[derive(Debug, Clone, Copy)]
pub struct HttpOptions {
    /// Time allowed for the TCP/TLS connect phase.
    pub connect_timeout: Duration,
    /// Time allowed for the whole transfer.
    pub timeout: Duration,
    /// Reject non-2xx responses instead of returning their body.
    pub require_success: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(60),
            require_success: true,
        }
    }
}

/// Status and full body of a completed GET.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u32,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a GET and returns the status and the full body, whatever the status.
pub fn get(url: &str, opts: &HttpOptions) -> Result<Response, FetchError> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(MAX_REDIRECTIONS)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    Ok(Response { status, body })
}

/// Performs a GET and returns the body. With `require_success`, a non-2xx
/// status becomes `FetchError::Http` and the body is discarded.
pub fn fetch_body(url: &str, opts: &HttpOptions) -> Result<Vec<u8>, FetchError> {
    let response = get(url, opts)?;
    tracing::debug!(url, status = response.status, bytes = response.body.len(), "GET completed");
    if opts.require_success && !response.is_success() {
        return Err(FetchError::Http {
            status: response.status,
        });
    }
    if !response.is_success() {
        tracing::warn!(url, status = response.status, "keeping body of non-success response");
    }
    Ok(response.body)
}
