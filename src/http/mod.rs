pub mod traits;
pub mod client;
pub mod retry;

pub use traits::{FetchResponse, Fetcher};
pub use client::HttpFetcher;
pub use retry::{first_working_url, RetryingFetcher};

use crate::config::HttpConfig;
use crate::errors::ScanOutcome;

/// reqwest with retry and backoff on transport errors and retryable statuses.
///
/// Site checks use [`RetryingFetcher::transport_only`] on a clone of this.
pub fn make_fetcher(config: &HttpConfig) -> ScanOutcome<RetryingFetcher<HttpFetcher>> {
    Ok(RetryingFetcher::new(HttpFetcher::new(config)?))
}
