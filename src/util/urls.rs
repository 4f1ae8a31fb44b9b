//! URL helpers shared by discovery and scanning.

use std::collections::HashSet;

use url::Url;

use crate::errors::{ScanError, ScanOutcome};

/// Canonical absolute form of a raw site string.
///
/// Adds `https://` when no scheme is present, lower-cases the scheme, uses `/`
/// for an empty path and drops the fragment. Empty input yields an empty string.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    match Url::parse(&with_scheme) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            if parsed.path().is_empty() {
                parsed.set_path("/");
            }
            parsed.to_string()
        }
        // Keep unparseable input recognisable instead of dropping it.
        Err(_) => {
            let without_fragment = strip_fragment(&with_scheme);
            match without_fragment.split_once("://") {
                Some((scheme, rest)) => format!("{}://{}", scheme.to_lowercase(), rest),
                None => without_fragment.to_string(),
            }
        }
    }
}

/// `[https, http]` forms of a normalized URL, or a single entry when both coincide.
pub fn variants(raw: &str) -> Vec<String> {
    let normalized = normalize(raw);
    if normalized.is_empty() {
        return Vec::new();
    }

    let rest = match normalized.split_once("://") {
        Some((_, rest)) => rest,
        None => return vec![normalized],
    };

    let https = format!("https://{}", rest);
    let http = format!("http://{}", rest);
    if https == http {
        vec![https]
    } else {
        vec![https, http]
    }
}

/// Resolve `href` against `base` the way a browser would.
pub fn resolve(base: &str, href: &str) -> ScanOutcome<String> {
    let base = Url::parse(base).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base, e)))?;
    let joined = base
        .join(href)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", href, e)))?;
    Ok(joined.to_string())
}

/// Remove the fragment and leave every other component untouched.
pub fn strip_fragment(url: &str) -> &str {
    url.split_once('#').map_or(url, |(head, _)| head)
}

/// `scheme://host[:port]/` of a URL; the input is returned unchanged if it has no usable origin.
pub fn site_root(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) if parsed.has_host() => {
            let origin = parsed.origin();
            if origin.is_tuple() {
                format!("{}/", origin.ascii_serialization())
            } else {
                url.to_string()
            }
        }
        _ => url.to_string(),
    }
}

/// First occurrence of each distinct non-empty URL, in input order.
pub fn dedupe_preserve_order<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for url in urls {
        let url = url.into();
        if url.is_empty() || seen.contains(&url) {
            continue;
        }
        seen.insert(url.clone());
        out.push(url);
    }
    out
}
