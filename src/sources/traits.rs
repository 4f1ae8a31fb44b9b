use crate::domain::SourceSite;
use crate::errors::ScanOutcome;
use crate::http::Fetcher;

pub trait SiteProvider: Send + Sync {
    /// Source tag recorded on every site and in the scan metadata
    fn name(&self) -> &'static str;

    /// List candidate sites, at most `max_sites` when given
    fn fetch_sites(
        &self,
        fetcher: &dyn Fetcher,
        max_sites: Option<usize>,
    ) -> ScanOutcome<Vec<SourceSite>>;
}
