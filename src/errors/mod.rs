use thiserror::Error;

/// Status codes that are worth another attempt.
pub const RETRYABLE_STATUS: &[u16] = &[408, 425, 429, 500, 502, 503, 504];

#[derive(Error, Debug)]
pub enum ScanError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    // Transport errors. Rendered as "<Kind>: <message>" so that records keep the error type.
    #[error("InvalidUrl: {0}")]
    InvalidUrl(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("ConnectError: {0}")]
    Connect(String),

    #[error("ProtocolError: {0}")]
    Protocol(String),

    #[error("RequestError: {0}")]
    Request(String),

    #[error("http {0}")]
    HttpStatus(u16),

    #[error("no URL reachable: {0}")]
    Unreachable(String),

    #[error("Source query failed: {0}")]
    Source(String),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// Whether the request that produced this error should be attempted again.
    pub fn is_transient(&self) -> bool {
        match self {
            ScanError::Timeout(_)
            | ScanError::Connect(_)
            | ScanError::Protocol(_)
            | ScanError::Request(_) => true,
            ScanError::HttpStatus(code) => RETRYABLE_STATUS.contains(code),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_builder() {
            ScanError::InvalidUrl(message)
        } else if err.is_timeout() {
            ScanError::Timeout(message)
        } else if err.is_connect() {
            ScanError::Connect(message)
        } else if err.is_body() || err.is_decode() || err.is_redirect() {
            ScanError::Protocol(message)
        } else {
            ScanError::Request(message)
        }
    }
}

pub type ScanOutcome<T> = Result<T, ScanError>;
