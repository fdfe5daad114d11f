//! Retry and backoff policy.
//!
//! Error classification (timeouts, throttling, connection failures) and
//! exponential backoff decisions. Retry is opt-in: the fetcher only loops when
//! a `RetryPolicy` is configured, otherwise it makes a single attempt.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
