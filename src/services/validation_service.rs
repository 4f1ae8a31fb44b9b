use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

use feed_rs::model::{Feed, FeedType};
use feed_rs::parser;
use tracing::{debug, warn};

use crate::domain::{now_iso, FeedKind, FeedRecord};
use crate::errors::ScanError;
use crate::http::{FetchResponse, Fetcher};
use crate::util::panic_message;

pub const MIN_BODY_BYTES: usize = 50;
pub const MAX_TOPICS: usize = 50;
pub const MAX_TOPIC_ENTRIES: usize = 200;

/// Content types that mark a response as a feed even when `text/html` is also present.
const FEED_MIME_HINTS: &[&str] = &[
    "application/rss+xml",
    "application/atom+xml",
    "application/xml",
    "text/xml",
    "application/x-rss+xml",
];

/// Fetch `url` and decide whether it serves a usable feed.
///
/// Never fails: every problem ends up in the returned record's `error`,
/// including a panic raised while fetching or parsing this one candidate.
pub fn validate<F: Fetcher + ?Sized>(fetcher: &F, url: &str) -> FeedRecord {
    let record = FeedRecord::new(url).with_fetched_at(now_iso());
    let fallback = record.clone();

    let checked = catch_unwind(AssertUnwindSafe(|| fetch_and_check(fetcher, url, record)));
    checked.unwrap_or_else(|panic| {
        let message = panic_message(panic.as_ref());
        warn!(url, %message, "candidate check panicked");
        fallback.with_error(format!("panic: {}", message))
    })
}

fn fetch_and_check<F: Fetcher + ?Sized>(fetcher: &F, url: &str, record: FeedRecord) -> FeedRecord {
    let response = match fetcher.fetch(url) {
        Ok(response) => response,
        Err(ScanError::HttpStatus(code)) => {
            return record.with_status(code).with_error(ScanError::HttpStatus(code).to_string())
        }
        Err(e) => {
            debug!(url, error = %e, "candidate unreachable");
            return record.with_error(e.to_string());
        }
    };

    validate_response(record.with_status(response.status), &response)
}

/// Classify an already fetched response.
pub fn validate_response(record: FeedRecord, response: &FetchResponse) -> FeedRecord {
    if response.is_error_status() {
        return record.with_error(format!("http {}", response.status));
    }

    if response.body.len() < MIN_BODY_BYTES {
        return record.with_error("empty/too small response");
    }

    if looks_like_html(response) {
        return record.with_error("looks like html, not feed");
    }

    let feed = match parser::parse(response.body.as_slice()) {
        Ok(feed) => feed,
        Err(e) => {
            debug!(url = %record.url, error = %e, "feed parse failed");
            return record.with_error("not parseable as rss/atom");
        }
    };

    let kind = infer_kind(&feed);
    if kind == FeedKind::Unknown {
        return record.with_error("not parseable as rss/atom");
    }

    FeedRecord {
        kind,
        title: non_blank(feed.title.as_ref().map(|t| t.content.as_str())),
        homepage: homepage_link(&feed),
        language: non_blank(feed.language.as_deref()),
        entries: Some(feed.entries.len()),
        topics: extract_topics(&feed, MAX_TOPICS),
        ..record
    }
}

/// An HTML content type without any feed hint and a body that does not open like XML.
fn looks_like_html(response: &FetchResponse) -> bool {
    let content_type = response.content_type_lower();
    if !content_type.contains("text/html") || FEED_MIME_HINTS.iter().any(|h| content_type.contains(h)) {
        return false;
    }

    let start = response
        .body
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(response.body.len());
    let end = (start + MIN_BODY_BYTES).min(response.body.len());
    let head = response.body[start..end].to_ascii_lowercase();

    let contains = |needle: &[u8]| head.windows(needle.len()).any(|w| w == needle);
    !(head.starts_with(b"<?xml") || contains(b"<rss") || contains(b"<feed"))
}

pub fn infer_kind(feed: &Feed) -> FeedKind {
    match feed.feed_type {
        FeedType::RSS0 | FeedType::RSS1 | FeedType::RSS2 => FeedKind::Rss,
        FeedType::Atom => FeedKind::Atom,
        // Versionless but structurally a feed.
        _ if has_structure(feed) => FeedKind::Xml,
        _ => FeedKind::Unknown,
    }
}

fn has_structure(feed: &Feed) -> bool {
    feed.title.is_some() || !feed.links.is_empty() || !feed.entries.is_empty()
}

fn homepage_link(feed: &Feed) -> Option<String> {
    feed.links
        .iter()
        .find(|l| l.rel.as_deref().map_or(true, |r| r == "alternate"))
        .or_else(|| feed.links.iter().find(|l| l.rel.as_deref() != Some("self")))
        .and_then(|l| non_blank(Some(l.href.as_str())))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Collapse runs of whitespace into single spaces.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Distinct category terms from the first entries, first spelling wins.
pub fn extract_topics(feed: &Feed, max_topics: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut topics = Vec::new();

    let terms = feed
        .entries
        .iter()
        .take(MAX_TOPIC_ENTRIES)
        .flat_map(|entry| entry.categories.iter())
        .map(|category| {
            if category.term.trim().is_empty() {
                category.label.as_deref().unwrap_or_default()
            } else {
                category.term.as_str()
            }
        });

    for term in terms {
        let topic = collapse_whitespace(term);
        if topic.is_empty() || !seen.insert(topic.to_lowercase()) {
            continue;
        }
        topics.push(topic);
        if topics.len() >= max_topics {
            break;
        }
    }

    topics
}

/// Valid feeds only, most entries first, at most `max_feeds`.
pub fn select_best(feeds: Vec<FeedRecord>, max_feeds: usize) -> Vec<FeedRecord> {
    let mut good: Vec<FeedRecord> = feeds.into_iter().filter(FeedRecord::is_valid).collect();
    // sort_by is stable: equal counts keep their discovery order.
    good.sort_by(|a, b| b.entries.unwrap_or(0).cmp(&a.entries.unwrap_or(0)));
    good.truncate(max_feeds);
    good
}
