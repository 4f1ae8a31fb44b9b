use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::redirect::Policy;
use tracing::debug;

use crate::config::HttpConfig;
use crate::errors::{ScanError, ScanOutcome};
use crate::http::traits::{FetchResponse, Fetcher};

/// [`Fetcher`] backed by a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> ScanOutcome<Self> {
        let mut headers = HeaderMap::new();
        let accept = HeaderValue::from_str(&config.accept)
            .map_err(|e| ScanError::Config(format!("invalid accept header: {}", e)))?;
        headers.insert(ACCEPT, accept);

        let redirect = if config.follow_redirects {
            Policy::limited(10)
        } else {
            Policy::none()
        };

        if !config.timeout_s.is_finite() || config.timeout_s <= 0.0 {
            return Err(ScanError::Config(format!(
                "timeout must be a positive number of seconds, got {}",
                config.timeout_s
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs_f64(config.timeout_s))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .redirect(redirect)
            .build()
            .map_err(|e| ScanError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpFetcher {
    fn send(&self, request: RequestBuilder, url: &str) -> ScanOutcome<FetchResponse> {
        let response = request.send()?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes()?.to_vec();

        debug!(url, status, bytes = body.len(), "fetched");

        Ok(FetchResponse {
            url: final_url,
            status,
            content_type,
            body,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> ScanOutcome<FetchResponse> {
        self.send(self.client.get(url), url)
    }

    fn fetch_accepting(&self, url: &str, accept: &str) -> ScanOutcome<FetchResponse> {
        // Request headers take precedence over the client defaults.
        self.send(self.client.get(url).header(ACCEPT, accept), url)
    }
}
