use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::errors::{ScanError, ScanOutcome, RETRYABLE_STATUS};
use crate::http::traits::{FetchResponse, Fetcher};

pub const MAX_ATTEMPTS: usize = 4;
pub const BASE_DELAY: Duration = Duration::from_millis(500);
pub const MAX_DELAY: Duration = Duration::from_secs(8);

/// Wraps a [`Fetcher`] with exponential backoff.
///
/// Transport failures and responses with a status in [`RETRYABLE_STATUS`] are
/// attempted again, up to `max_attempts` in total. The last error is returned
/// to the caller once attempts run out. Other statuses (404 and friends) come
/// back as ordinary responses on the first try.
///
/// [`RetryingFetcher::transport_only`] turns status retries off: every status
/// is then handed back as a response and only transport failures are retried.
#[derive(Debug, Clone)]
pub struct RetryingFetcher<F> {
    inner: F,
    max_attempts: usize,
    base_delay: Duration,
    max_delay: Duration,
    retry_status: bool,
}

impl<F: Fetcher> RetryingFetcher<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            max_attempts: MAX_ATTEMPTS,
            base_delay: BASE_DELAY,
            max_delay: MAX_DELAY,
            retry_status: true,
        }
    }

    pub fn with_delays(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay;
        self
    }

    pub fn transport_only(mut self) -> Self {
        self.retry_status = false;
        self
    }

    /// Delay before the attempt following `attempt` (1-based).
    fn delay_after(&self, attempt: usize) -> Duration {
        let factor = 1u32.checked_shl((attempt - 1) as u32).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    fn check_status(&self, response: FetchResponse) -> ScanOutcome<FetchResponse> {
        if self.retry_status && RETRYABLE_STATUS.contains(&response.status) {
            return Err(ScanError::HttpStatus(response.status));
        }
        Ok(response)
    }

    fn with_retry<R>(&self, url: &str, request: R) -> ScanOutcome<FetchResponse>
    where
        R: Fn() -> ScanOutcome<FetchResponse>,
    {
        let started = Instant::now();
        let mut attempt = 0usize;

        loop {
            attempt += 1;
            match request().and_then(|response| self.check_status(response)) {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    let delay = self.delay_after(attempt);
                    warn!(
                        url,
                        attempt,
                        max = self.max_attempts,
                        ?delay,
                        error = %e,
                        "request failed; backing off"
                    );
                    std::thread::sleep(delay);
                }
                Err(e) => {
                    debug!(
                        url,
                        attempt,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        error = %e,
                        "giving up"
                    );
                    return Err(e);
                }
            }
        }
    }
}

impl<F: Fetcher> Fetcher for RetryingFetcher<F> {
    fn fetch(&self, url: &str) -> ScanOutcome<FetchResponse> {
        self.with_retry(url, || self.inner.fetch(url))
    }

    fn fetch_accepting(&self, url: &str, accept: &str) -> ScanOutcome<FetchResponse> {
        self.with_retry(url, || self.inner.fetch_accepting(url, accept))
    }
}

/// First URL whose request completes, in order.
///
/// Only reachability is judged here: a 404 still counts as working. When every
/// URL fails the error is [`ScanError::Unreachable`] with the last failure.
pub fn first_working_url<F, S>(fetcher: &F, urls: &[S]) -> ScanOutcome<(String, FetchResponse)>
where
    F: Fetcher + ?Sized,
    S: AsRef<str>,
{
    let mut last_error: Option<ScanError> = None;
    for url in urls {
        let url = url.as_ref();
        match fetcher.fetch(url) {
            Ok(response) => return Ok((url.to_string(), response)),
            Err(e) => {
                debug!(url, error = %e, "unreachable");
                last_error = Some(e);
            }
        }
    }

    Err(ScanError::Unreachable(
        last_error.map_or_else(|| "no urls".to_string(), |e| e.to_string()),
    ))
}
