use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::util::{dedupe_preserve_order, resolve, strip_fragment};

/// Conventional feed locations (WordPress and generic), tried for every site.
pub const COMMON_FEED_PATHS: &[&str] = &[
    "/feed/",
    "/feed",
    "/rss",
    "/rss/",
    "/rss.xml",
    "/atom.xml",
    "/index.xml",
    "/feeds",
    "/feed/rss",
    "/feed/atom",
    "/?feed=rss",
    "/?feed=rss2",
    "/?feed=atom",
];

/// Social and media hosts that never serve a site's own feed.
const BLOCKED_DOMAINS: &[&str] = &[
    "facebook.com",
    "instagram.com",
    "twitter.com",
    "youtube.com",
    "tiktok.com",
];

static BINARY_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(pdf|jpe?g|png|gif|webp|mp4|zip)$").expect("valid extension regex")
});

static FEED_HINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)rss|atom|feed|xml").expect("valid hint regex"));

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("link[href]").expect("valid link selector"));

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Whether a URL could plausibly be a feed rather than social or media content.
pub fn looks_like_feed_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    if BLOCKED_DOMAINS.iter().any(|d| lower.contains(d)) {
        return false;
    }

    // "x.com" is too short to match as a substring.
    let on_x = Url::parse(&lower)
        .ok()
        .and_then(|u| u.host_str().map(|h| h == "x.com" || h.ends_with(".x.com")))
        .unwrap_or(false);
    if on_x {
        return false;
    }

    !BINARY_EXTENSION.is_match(&lower)
}

/// Candidate feed URLs for a site, most promising first.
///
/// Links from the homepage HTML come first (`<link rel="alternate">` then
/// anchors hinting at feeds), followed by [`COMMON_FEED_PATHS`] resolved
/// against `base_url`. The result is free of duplicates.
pub fn discover(base_url: &str, html: Option<&str>) -> Vec<String> {
    let mut candidates = Vec::new();

    if let Some(html) = html {
        candidates.extend(html_candidates(base_url, html));
    }

    for path in COMMON_FEED_PATHS {
        if let Ok(url) = resolve(base_url, path) {
            candidates.push(strip_fragment(&url).to_string());
        }
    }

    dedupe_preserve_order(candidates)
}

fn html_candidates(base_url: &str, html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut found = Vec::new();

    for link in document.select(&LINK_SELECTOR) {
        let rel = attr_lower(&link, "rel");
        let kind = attr_lower(&link, "type");
        let is_feed_type = kind.contains("rss") || kind.contains("atom") || kind.contains("xml");
        if rel.contains("alternate") && is_feed_type {
            push_candidate(&mut found, base_url, link.value().attr("href"));
        }
    }

    for anchor in document.select(&ANCHOR_SELECTOR) {
        let href = anchor.value().attr("href").unwrap_or_default();
        let text = anchor.text().collect::<Vec<_>>().join(" ");
        if FEED_HINT.is_match(href) || FEED_HINT.is_match(&text) {
            push_candidate(&mut found, base_url, Some(href));
        }
    }

    found
}

fn attr_lower(element: &ElementRef<'_>, name: &str) -> String {
    element
        .value()
        .attr(name)
        .unwrap_or_default()
        .to_lowercase()
}

fn push_candidate(found: &mut Vec<String>, base_url: &str, href: Option<&str>) {
    let href = href.map(str::trim).unwrap_or_default();
    if href.is_empty() {
        return;
    }
    if let Ok(url) = resolve(base_url, href) {
        let url = strip_fragment(&url);
        if looks_like_feed_url(url) {
            found.push(url.to_string());
        }
    }
}
