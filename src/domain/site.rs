use serde::{Deserialize, Serialize};

use super::{null_as_default, FeedRecord};

pub const NO_VALID_FEEDS: &str = "no valid feeds found";

/// A site as emitted by a provider, before scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSite {
    pub name: String,
    pub site_url: String,
    pub source: String,
}

impl SourceSite {
    pub fn new(
        name: impl Into<String>,
        site_url: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            site_url: site_url.into(),
            source: source.into(),
        }
    }
}

/// Scan outcome for one website.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub site_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub feeds: Vec<FeedRecord>,
    #[serde(deserialize_with = "null_as_default")]
    pub discovered_candidates: Vec<String>,
    pub fetched_at: Option<String>,
    pub status_code: Option<u16>,
    pub error: Option<String>,
}

impl SiteRecord {
    pub fn new(name: impl Into<String>, site_url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            site_url: site_url.into(),
            source: source.into(),
            ..Self::default()
        }
    }

    /// Install the selected feeds and settle the error field.
    ///
    /// Sites with feeds never carry an error; sites without feeds always do.
    pub fn finish(&mut self, feeds: Vec<FeedRecord>) {
        self.feeds = feeds;
        if !self.feeds.is_empty() {
            self.error = None;
        } else if self.error.as_deref().map_or(true, str::is_empty) {
            self.error = Some(NO_VALID_FEEDS.to_string());
        }
    }

    pub fn has_feeds(&self) -> bool {
        !self.feeds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_without_feeds_sets_error() {
        let mut site = SiteRecord::new("Exemplo", "https://example.com/", "wikidata");
        site.finish(Vec::new());
        assert_eq!(site.error.as_deref(), Some(NO_VALID_FEEDS));
    }

    #[test]
    fn test_finish_without_feeds_keeps_homepage_error() {
        let mut site = SiteRecord::new("Exemplo", "https://example.com/", "wikidata");
        site.error = Some("ConnectError: connection refused".to_string());
        site.finish(Vec::new());
        assert_eq!(site.error.as_deref(), Some("ConnectError: connection refused"));
    }

    #[test]
    fn test_finish_with_feeds_clears_error() {
        let mut site = SiteRecord::new("Exemplo", "https://example.com/", "wikidata");
        site.error = Some("http 403".to_string());
        site.finish(vec![FeedRecord::new("https://example.com/feed")]);

        assert!(site.error.is_none());
        assert!(site.has_feeds());
    }
}
