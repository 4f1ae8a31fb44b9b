use std::collections::{HashMap, HashSet};

use crate::domain::{ScanResult, TopicReport, TopicRow};
use crate::services::validation_service::collapse_whitespace;

#[derive(Default)]
struct TopicTally<'a> {
    feeds: usize,
    sites: HashSet<&'a str>,
}

/// Count how many feeds and distinct sites carry each topic.
///
/// Only feeds without an error are considered, and a topic counts once per
/// feed. Rows come out by feed count, highest first; ties keep the order in
/// which topics were first seen. Rows below `min_count` are dropped.
pub fn topic_summary(result: &ScanResult, min_count: usize) -> TopicReport {
    let mut order: Vec<String> = Vec::new();
    let mut tallies: HashMap<String, TopicTally<'_>> = HashMap::new();

    for site in &result.sites {
        for feed in site.feeds.iter().filter(|f| f.is_valid()) {
            let mut counted = HashSet::new();
            for raw in &feed.topics {
                let topic = collapse_whitespace(raw);
                if topic.is_empty() || !counted.insert(topic.clone()) {
                    continue;
                }

                let tally = tallies.entry(topic.clone()).or_insert_with(|| {
                    order.push(topic);
                    TopicTally::default()
                });
                tally.feeds += 1;
                tally.sites.insert(site.site_url.as_str());
            }
        }
    }

    let mut rows: Vec<TopicRow> = order
        .into_iter()
        .filter_map(|topic| {
            let tally = tallies.get(&topic)?;
            Some(TopicRow {
                feeds: tally.feeds,
                sites: tally.sites.len(),
                topic,
            })
        })
        .filter(|row| row.feeds >= min_count)
        .collect();
    rows.sort_by(|a, b| b.feeds.cmp(&a.feeds));

    TopicReport::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeedRecord, ScanMeta, SiteRecord};

    fn feed(url: &str, topics: &[&str]) -> FeedRecord {
        FeedRecord {
            topics: topics.iter().map(|t| t.to_string()).collect(),
            entries: Some(1),
            ..FeedRecord::new(url)
        }
    }

    fn site(url: &str, feeds: Vec<FeedRecord>) -> SiteRecord {
        let mut site = SiteRecord::new(url, url, "wikidata");
        site.finish(feeds);
        site
    }

    fn fixture() -> ScanResult {
        ScanResult::new(
            ScanMeta::default(),
            vec![
                site(
                    "https://a.example/",
                    vec![
                        feed("https://a.example/feed", &["Brasil", "Política", "Esportes"]),
                        feed("https://a.example/rss", &["Brasil", "Economia"]),
                    ],
                ),
                site(
                    "https://b.example/",
                    vec![
                        feed("https://b.example/feed", &["Brasil", "Economia", "  Política  "]),
                        feed("https://b.example/bad", &["Brasil"]).with_error("http 500"),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_counts_feeds_and_sites() {
        let report = topic_summary(&fixture(), 1);

        let brasil = &report.topics[0];
        assert_eq!(brasil.topic, "Brasil");
        assert_eq!(brasil.feeds, 3);
        assert_eq!(brasil.sites, 2);

        let economia = report.topics.iter().find(|r| r.topic == "Economia").unwrap();
        assert_eq!((economia.feeds, economia.sites), (2, 2));

        let politica = report.topics.iter().find(|r| r.topic == "Política").unwrap();
        assert_eq!((politica.feeds, politica.sites), (2, 2));

        let esportes = report.topics.iter().find(|r| r.topic == "Esportes").unwrap();
        assert_eq!((esportes.feeds, esportes.sites), (1, 1));

        assert_eq!(report.total_topics, 4);
    }

    #[test]
    fn test_min_count_filters_rare_topics() {
        let report = topic_summary(&fixture(), 2);
        let topics: Vec<&str> = report.topics.iter().map(|r| r.topic.as_str()).collect();

        assert_eq!(topics, vec!["Brasil", "Política", "Economia"]);
        assert_eq!(report.total_topics, 3);
    }

    #[test]
    fn test_topic_counted_once_per_feed() {
        let result = ScanResult::new(
            ScanMeta::default(),
            vec![site("https://a.example/", vec![feed("https://a.example/feed", &["Rio", "Rio", " Rio "])])],
        );
        let report = topic_summary(&result, 1);
        assert_eq!(report.topics.len(), 1);
        assert_eq!(report.topics[0].feeds, 1);
    }

    #[test]
    fn test_empty_scan() {
        let report = topic_summary(&ScanResult::default(), 1);
        assert!(report.topics.is_empty());
        assert_eq!(report.total_topics, 0);
    }
}
