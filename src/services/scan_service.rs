use std::panic::{catch_unwind, AssertUnwindSafe};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, instrument, warn};

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::domain::{now_iso, ScanMeta, ScanResult, SiteRecord, SourceSite};
use crate::errors::{ScanError, ScanOutcome};
use crate::http::Fetcher;
use crate::services::discovery_service::discover;
use crate::services::validation_service::{select_best, validate};
use crate::sources::SiteProvider;
use crate::util::{dedupe_preserve_order, normalize, panic_message, site_root, variants};

#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    pub max_sites: Option<usize>,
    pub max_workers: usize,
    pub max_candidates: usize,
    pub max_feeds: usize,
    /// Recorded in the scan metadata; the fetcher enforces the actual timeout.
    pub timeout_s: f64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_sites: Some(200),
            max_workers: 20,
            max_candidates: 25,
            max_feeds: 5,
            timeout_s: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// A homepage response that answered with a status below 400.
#[derive(Debug, Clone)]
pub struct Homepage {
    pub url: String,
    pub status: u16,
    pub body: String,
    /// Answered with an XML content type, so the page itself is also a feed candidate.
    pub is_feed: bool,
}

pub struct ScanService<F: Fetcher> {
    fetcher: F,
    options: ScanOptions,
}

impl<F: Fetcher> ScanService<F> {
    pub fn new(fetcher: F, options: ScanOptions) -> Self {
        Self { fetcher, options }
    }

    /// Query the provider through `source_fetcher`, scan every site, and stamp
    /// the run metadata.
    pub fn run(
        &self,
        provider: &dyn SiteProvider,
        source_fetcher: &dyn Fetcher,
    ) -> ScanOutcome<ScanResult> {
        let mut meta = ScanMeta::start(
            provider.name(),
            self.options.max_sites,
            self.options.max_workers,
            self.options.timeout_s,
        );

        let sites = provider.fetch_sites(source_fetcher, self.options.max_sites)?;
        info!(source = provider.name(), sites = sites.len(), "starting scan");

        let records = self.scan_all(&sites)?;
        meta.finish();

        Ok(ScanResult::new(meta, records))
    }

    /// Scan sites on a pool of `max_workers` threads, one site per task.
    ///
    /// Results keep the input order. A failure inside one site's pipeline only
    /// affects that site's record.
    pub fn scan_all(&self, sites: &[SourceSite]) -> ScanOutcome<Vec<SiteRecord>> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.options.max_workers.max(1))
            .thread_name(|i| format!("scan-worker-{}", i))
            .build()
            .map_err(|e| ScanError::Config(format!("failed to start worker pool: {}", e)))?;

        Ok(pool.install(|| sites.par_iter().map(|site| self.scan_site_isolated(site)).collect()))
    }

    fn scan_site_isolated(&self, site: &SourceSite) -> SiteRecord {
        catch_unwind(AssertUnwindSafe(|| self.scan_site(site))).unwrap_or_else(|panic| {
            let message = panic_message(panic.as_ref());
            warn!(site = %site.site_url, %message, "site pipeline panicked");

            let mut record = SiteRecord::new(&site.name, normalize(&site.site_url), &site.source);
            record.fetched_at = Some(now_iso());
            record.error = Some(format!("panic: {}", message));
            record.finish(Vec::new());
            record
        })
    }

    /// Full pipeline for one site: homepage, discovery, validation, selection.
    #[instrument(level = "info", skip_all, fields(site = %site.site_url))]
    pub fn scan_site(&self, site: &SourceSite) -> SiteRecord {
        let site_url = normalize(&site.site_url);
        let mut record = SiteRecord::new(&site.name, &site_url, &site.source);

        if site_url.is_empty() {
            record.error = Some("empty site url".to_string());
            record.finish(Vec::new());
            return record;
        }

        let homepage = self.fetch_homepage(&site_url);
        record.fetched_at = Some(now_iso());

        let root = site_root(&site_url);
        let mut candidates = match homepage {
            Ok(page) if page.is_feed => {
                record.status_code = Some(page.status);
                let mut candidates = vec![page.url];
                candidates.extend(discover(&root, Some(&page.body)));
                dedupe_preserve_order(candidates)
            }
            Ok(page) => {
                record.status_code = Some(page.status);
                discover(&root, Some(&page.body))
            }
            Err(last_error) => {
                debug!(error = %last_error, "homepage unavailable");
                record.error = Some(last_error);
                discover(&root, None)
            }
        };
        candidates.truncate(self.options.max_candidates);

        let feeds = candidates
            .iter()
            .map(|url| validate(&self.fetcher, url))
            .collect();
        record.discovered_candidates = candidates;
        record.finish(select_best(feeds, self.options.max_feeds));

        info!(
            candidates = record.discovered_candidates.len(),
            feeds = record.feeds.len(),
            error = record.error.as_deref().unwrap_or_default(),
            "site scanned"
        );
        record
    }

    /// Try the https form, the http form, then the domain root.
    ///
    /// Returns the first answer below 400, or the last error description.
    pub fn fetch_homepage(&self, site_url: &str) -> Result<Homepage, String> {
        let mut urls = variants(site_url);
        if let Some(first) = urls.first() {
            let root = site_root(first);
            urls.push(root);
        }
        let urls = dedupe_preserve_order(urls);

        let mut last_error = "no site url".to_string();
        for url in &urls {
            match self.fetcher.fetch(url) {
                Ok(response) if response.is_error_status() => {
                    last_error = format!("http {}", response.status);
                }
                Ok(response) => {
                    let content_type = response.content_type_lower();
                    let is_feed = content_type.contains("xml") && !content_type.contains("text/html");
                    return Ok(Homepage {
                        url: response.url.clone(),
                        status: response.status,
                        body: response.text(),
                        is_feed,
                    });
                }
                Err(e) => {
                    debug!(url = %url, error = %e, "homepage variant failed");
                    last_error = e.to_string();
                }
            }
        }

        Err(last_error)
    }
}
