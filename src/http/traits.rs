use crate::errors::ScanOutcome;

/// Raw result of a GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// Final URL after redirects.
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status,
            content_type: None,
            body: Vec::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn is_error_status(&self) -> bool {
        self.status >= 400
    }

    /// Lower-cased content type, empty when the header is missing.
    pub fn content_type_lower(&self) -> String {
        self.content_type
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// The only network capability the scanner needs.
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> ScanOutcome<FetchResponse>;

    /// GET with `accept` replacing the default Accept header.
    fn fetch_accepting(&self, url: &str, _accept: &str) -> ScanOutcome<FetchResponse> {
        self.fetch(url)
    }
}
