use std::path::PathBuf;

use csv::{ReaderBuilder, Trim};
use tracing::info;

use crate::domain::SourceSite;
use crate::errors::ScanOutcome;
use crate::http::Fetcher;
use crate::sources::traits::SiteProvider;

/// Sites listed in a local file, one per line as `url` or `name,url`.
///
/// Blank lines and lines starting with `#` are skipped, as is a leading
/// `name,site_url` header.
pub struct SitesFileProvider {
    path: PathBuf,
}

impl SitesFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn is_header(name: &str, url: &str) -> bool {
    name.eq_ignore_ascii_case("name")
        && (url.eq_ignore_ascii_case("site_url") || url.eq_ignore_ascii_case("url"))
}

impl SiteProvider for SitesFileProvider {
    fn name(&self) -> &'static str {
        "file"
    }

    fn fetch_sites(
        &self,
        _fetcher: &dyn Fetcher,
        max_sites: Option<usize>,
    ) -> ScanOutcome<Vec<SourceSite>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(Trim::All)
            .from_path(&self.path)?;

        let mut sites = Vec::new();
        for record in reader.records() {
            if max_sites.is_some_and(|max| sites.len() >= max) {
                break;
            }

            let record = record?;
            let (name, url) = match (record.get(0), record.get(1)) {
                (Some(url), None) => (url, url),
                (Some(name), Some(url)) => (name, url),
                _ => continue,
            };
            if url.is_empty() || is_header(name, url) {
                continue;
            }
            let name = if name.is_empty() { url } else { name };

            sites.push(SourceSite::new(name, url, self.name()));
        }

        info!(path = %self.path.display(), count = sites.len(), "sites file loaded");
        Ok(sites)
    }
}
