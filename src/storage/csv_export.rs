use std::path::Path;

use serde::Serialize;

use crate::domain::{FeedRecord, ScanResult, SiteRecord};
use crate::errors::ScanOutcome;
use crate::storage::json_store::ensure_parent;

pub const CSV_COLUMNS: &[&str] = &[
    "site_name",
    "site_url",
    "source",
    "site_error",
    "feed_url",
    "feed_kind",
    "feed_title",
    "feed_homepage",
    "feed_language",
    "feed_entries",
    "feed_topics",
    "feed_error",
];

/// Flat row: one per feed, or one blank-feed row for a site without feeds.
#[derive(Debug, Default, Serialize)]
struct FeedRow<'a> {
    site_name: &'a str,
    site_url: &'a str,
    source: &'a str,
    site_error: &'a str,
    feed_url: &'a str,
    feed_kind: &'a str,
    feed_title: &'a str,
    feed_homepage: &'a str,
    feed_language: &'a str,
    feed_entries: Option<usize>,
    feed_topics: String,
    feed_error: &'a str,
}

impl<'a> FeedRow<'a> {
    fn site(site: &'a SiteRecord) -> Self {
        Self {
            site_name: &site.name,
            site_url: &site.site_url,
            source: &site.source,
            site_error: site.error.as_deref().unwrap_or_default(),
            ..Self::default()
        }
    }

    fn feed(site: &'a SiteRecord, feed: &'a FeedRecord) -> Self {
        Self {
            feed_url: &feed.url,
            feed_kind: feed.kind.as_str(),
            feed_title: feed.title.as_deref().unwrap_or_default(),
            feed_homepage: feed.homepage.as_deref().unwrap_or_default(),
            feed_language: feed.language.as_deref().unwrap_or_default(),
            feed_entries: feed.entries,
            feed_topics: feed.topics.join(" | "),
            feed_error: feed.error.as_deref().unwrap_or_default(),
            ..Self::site(site)
        }
    }
}

pub fn write_scan_csv(path: &Path, result: &ScanResult) -> ScanOutcome<()> {
    ensure_parent(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(CSV_COLUMNS)?;

    for site in &result.sites {
        if site.feeds.is_empty() {
            writer.serialize(FeedRow::site(site))?;
        }
        for feed in &site.feeds {
            writer.serialize(FeedRow::feed(site, feed))?;
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeedKind, ScanMeta};
    use tempfile::TempDir;

    #[test]
    fn test_one_row_per_feed_plus_empty_sites() {
        let feed = FeedRecord {
            kind: FeedKind::Rss,
            title: Some("Exemplo, o jornal".to_string()),
            entries: Some(4),
            topics: vec!["Brasil".to_string(), "Economia".to_string()],
            ..FeedRecord::new("https://example.com/rss")
        };
        let mut ok_site = SiteRecord::new("Exemplo", "https://example.com/", "wikidata");
        ok_site.finish(vec![feed]);
        let mut empty_site = SiteRecord::new("Vazio", "https://empty.example/", "wikidata");
        empty_site.finish(Vec::new());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("feeds.csv");
        write_scan_csv(&path, &ScanResult::new(ScanMeta::default(), vec![ok_site, empty_site])).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, CSV_COLUMNS);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);

        assert_eq!(&rows[0][0], "Exemplo");
        assert_eq!(&rows[0][4], "https://example.com/rss");
        assert_eq!(&rows[0][5], "rss");
        assert_eq!(&rows[0][6], "Exemplo, o jornal");
        assert_eq!(&rows[0][9], "4");
        assert_eq!(&rows[0][10], "Brasil | Economia");

        assert_eq!(&rows[1][0], "Vazio");
        assert_eq!(&rows[1][3], "no valid feeds found");
        assert_eq!(&rows[1][4], "");
        assert_eq!(&rows[1][9], "");
    }

    #[test]
    fn test_header_written_for_empty_scan() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feeds.csv");
        write_scan_csv(&path, &ScanResult::default()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), CSV_COLUMNS.join(","));
    }
}
