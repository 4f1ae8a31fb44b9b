use serde::{Deserialize, Serialize};

use super::null_as_default;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Rss,
    Atom,
    Xml,
    #[default]
    Unknown,
}

impl FeedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Rss => "rss",
            FeedKind::Atom => "atom",
            FeedKind::Xml => "xml",
            FeedKind::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for FeedKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rss" => Ok(FeedKind::Rss),
            "atom" => Ok(FeedKind::Atom),
            "xml" => Ok(FeedKind::Xml),
            "unknown" => Ok(FeedKind::Unknown),
            _ => Err(format!("Unknown feed kind: {}", s)),
        }
    }
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One validated (or rejected) feed candidate.
///
/// A record either carries feed metadata or an `error`, never both. Updates
/// produce a new value through the `with_*` methods or struct update syntax.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub kind: FeedKind,
    pub title: Option<String>,
    pub homepage: Option<String>,
    pub language: Option<String>,
    pub entries: Option<usize>,
    #[serde(deserialize_with = "null_as_default")]
    pub topics: Vec<String>,
    pub fetched_at: Option<String>,
    pub status_code: Option<u16>,
    pub error: Option<String>,
}

impl FeedRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_fetched_at(mut self, fetched_at: impl Into<String>) -> Self {
        self.fetched_at = Some(fetched_at.into());
        self
    }

    pub fn is_valid(&self) -> bool {
        self.error.as_deref().map_or(true, str::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in [FeedKind::Rss, FeedKind::Atom, FeedKind::Xml, FeedKind::Unknown] {
            assert_eq!(kind.as_str().parse::<FeedKind>().unwrap(), kind);
        }
        assert!("json".parse::<FeedKind>().is_err());
    }

    #[test]
    fn test_new_record_is_blank() {
        let record = FeedRecord::new("https://example.com/rss");
        assert_eq!(record.kind, FeedKind::Unknown);
        assert!(record.title.is_none());
        assert!(record.topics.is_empty());
        assert!(record.is_valid());
    }

    #[test]
    fn test_with_error_keeps_url_and_status() {
        let record = FeedRecord::new("https://example.com/rss")
            .with_status(404)
            .with_error("http 404");

        assert_eq!(record.url, "https://example.com/rss");
        assert_eq!(record.status_code, Some(404));
        assert_eq!(record.error.as_deref(), Some("http 404"));
        assert!(!record.is_valid());
    }

    #[test]
    fn test_empty_error_counts_as_valid() {
        let record = FeedRecord::new("https://example.com/rss").with_error("");
        assert!(record.is_valid());
    }

    #[test]
    fn test_tolerates_nulls_and_missing_fields() {
        let json = r#"{"url": "https://example.com/feed", "kind": null, "topics": null}"#;
        let record: FeedRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.kind, FeedKind::Unknown);
        assert!(record.topics.is_empty());
        assert!(record.entries.is_none());
    }

    #[test]
    fn test_null_url_loads_as_empty() {
        let record: FeedRecord = serde_json::from_str(r#"{"url": null, "kind": "rss"}"#).unwrap();

        assert_eq!(record.url, "");
        assert_eq!(record.kind, FeedKind::Rss);
    }
}
