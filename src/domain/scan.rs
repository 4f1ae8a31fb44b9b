use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{null_as_default, SiteRecord};

pub const DEFAULT_SOURCE: &str = "wikidata";
pub const DEFAULT_MAX_WORKERS: usize = 20;

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn now_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Run-level parameters and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredScanMeta")]
pub struct ScanMeta {
    pub started_at: String,
    pub finished_at: Option<String>,
    pub source: String,
    pub max_sites: Option<usize>,
    pub max_workers: usize,
    pub timeout_s: f64,
}

impl Default for ScanMeta {
    fn default() -> Self {
        Self {
            started_at: String::new(),
            finished_at: None,
            source: DEFAULT_SOURCE.to_string(),
            max_sites: None,
            max_workers: DEFAULT_MAX_WORKERS,
            timeout_s: crate::config::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// On-disk shape of [`ScanMeta`]; every field may be missing or null.
#[derive(Deserialize)]
struct StoredScanMeta {
    #[serde(default)]
    started_at: Option<String>,
    #[serde(default)]
    finished_at: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    max_sites: Option<usize>,
    #[serde(default)]
    max_workers: Option<usize>,
    #[serde(default)]
    timeout_s: Option<f64>,
}

impl From<StoredScanMeta> for ScanMeta {
    fn from(stored: StoredScanMeta) -> Self {
        let defaults = ScanMeta::default();
        Self {
            started_at: stored.started_at.unwrap_or(defaults.started_at),
            finished_at: stored.finished_at,
            source: stored.source.unwrap_or(defaults.source),
            max_sites: stored.max_sites,
            max_workers: stored.max_workers.unwrap_or(defaults.max_workers),
            timeout_s: stored.timeout_s.unwrap_or(defaults.timeout_s),
        }
    }
}

impl ScanMeta {
    pub fn start(source: impl Into<String>, max_sites: Option<usize>, max_workers: usize, timeout_s: f64) -> Self {
        Self {
            started_at: now_iso(),
            finished_at: None,
            source: source.into(),
            max_sites,
            max_workers,
            timeout_s,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(now_iso());
    }
}

/// Aggregate root of one scan run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanResult {
    #[serde(deserialize_with = "null_as_default")]
    pub meta: ScanMeta,
    #[serde(deserialize_with = "null_as_default")]
    pub sites: Vec<SiteRecord>,
}

impl ScanResult {
    pub fn new(meta: ScanMeta, sites: Vec<SiteRecord>) -> Self {
        Self { meta, sites }
    }

    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            sites: self.sites.len(),
            sites_with_feeds: self.sites.iter().filter(|s| s.has_feeds()).count(),
            valid_feeds: self.sites.iter().map(|s| s.feeds.len()).sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub sites: usize,
    pub sites_with_feeds: usize,
    pub valid_feeds: usize,
}

impl std::fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sites processed: {} | with feeds: {} | valid feeds: {}",
            self.sites, self.sites_with_feeds, self.valid_feeds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeedRecord;

    #[test]
    fn test_now_iso_format() {
        let ts = now_iso();
        assert_eq!(ts.len(), 20);
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[10..11], "T");
    }

    #[test]
    fn test_meta_defaults_on_empty_object() {
        let meta: ScanMeta = serde_json::from_str("{}").unwrap();
        assert_eq!(meta.source, "wikidata");
        assert_eq!(meta.max_workers, 20);
        assert_eq!(meta.timeout_s, 15.0);
        assert!(meta.finished_at.is_none());
    }

    #[test]
    fn test_meta_defaults_on_null_fields() {
        let json = r#"{"started_at": null, "source": null, "max_workers": null, "timeout_s": null}"#;
        let meta: ScanMeta = serde_json::from_str(json).unwrap();
        assert_eq!(meta.started_at, "");
        assert_eq!(meta.source, "wikidata");
        assert_eq!(meta.max_workers, 20);
        assert_eq!(meta.timeout_s, 15.0);
    }

    #[test]
    fn test_result_tolerates_null_sections() {
        let result: ScanResult = serde_json::from_str(r#"{"meta": null, "sites": null}"#).unwrap();
        assert!(result.sites.is_empty());
        assert_eq!(result.meta.source, "wikidata");
    }

    #[test]
    fn test_summary_counts() {
        let mut with_feeds = SiteRecord::new("A", "https://a.example/", "wikidata");
        with_feeds.finish(vec![
            FeedRecord::new("https://a.example/feed"),
            FeedRecord::new("https://a.example/rss"),
        ]);
        let mut without_feeds = SiteRecord::new("B", "https://b.example/", "wikidata");
        without_feeds.finish(Vec::new());

        let result = ScanResult::new(ScanMeta::default(), vec![with_feeds, without_feeds]);
        let summary = result.summary();

        assert_eq!(summary.sites, 2);
        assert_eq!(summary.sites_with_feeds, 1);
        assert_eq!(summary.valid_feeds, 2);
        assert_eq!(
            summary.to_string(),
            "Sites processed: 2 | with feeds: 1 | valid feeds: 2"
        );
    }
}
