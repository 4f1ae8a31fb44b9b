use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::domain::SourceSite;
use crate::errors::{ScanError, ScanOutcome};
use crate::http::Fetcher;
use crate::sources::traits::SiteProvider;

pub const WIKIDATA_SPARQL_URL: &str = "https://query.wikidata.org/sparql";
pub const DEFAULT_PAGE_SIZE: usize = 300;
pub const SPARQL_ACCEPT: &str = "application/sparql-results+json";

#[derive(Debug, Default, Deserialize)]
struct SparqlResponse {
    #[serde(default)]
    results: SparqlResults,
}

#[derive(Debug, Default, Deserialize)]
struct SparqlResults {
    #[serde(default)]
    bindings: Vec<Binding>,
}

#[derive(Debug, Deserialize)]
struct Binding {
    #[serde(rename = "itemLabel")]
    item_label: Option<BindingValue>,
    site: Option<BindingValue>,
}

#[derive(Debug, Deserialize)]
struct BindingValue {
    value: Option<String>,
}

impl Binding {
    fn into_site(self) -> Option<SourceSite> {
        let name = self.item_label.and_then(|v| v.value)?;
        let site = self.site.and_then(|v| v.value)?;
        let (name, site) = (name.trim(), site.trim());
        if name.is_empty() || site.is_empty() {
            return None;
        }
        Some(SourceSite::new(name, site, "wikidata"))
    }
}

/// Brazilian newspapers with an official website, paged through the Wikidata SPARQL endpoint.
pub struct WikidataProvider {
    endpoint: String,
    page_size: usize,
}

impl WikidataProvider {
    pub fn new() -> Self {
        Self {
            endpoint: WIKIDATA_SPARQL_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Q11032 = newspaper, Q155 = Brazil, P856 = official website
    fn query(limit: usize, offset: usize) -> String {
        format!(
            r#"SELECT ?item ?itemLabel ?site WHERE {{
  ?item wdt:P31/wdt:P279* wd:Q11032 .
  ?item wdt:P17 wd:Q155 .
  ?item wdt:P856 ?site .
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "pt,en". }}
}}
LIMIT {}
OFFSET {}"#,
            limit, offset
        )
    }

    fn page_url(&self, offset: usize) -> ScanOutcome<String> {
        let query = Self::query(self.page_size, offset);
        let url = Url::parse_with_params(&self.endpoint, &[("format", "json"), ("query", query.as_str())])
            .map_err(|e| ScanError::InvalidUrl(e.to_string()))?;
        Ok(url.to_string())
    }

    fn fetch_page(&self, fetcher: &dyn Fetcher, offset: usize) -> ScanOutcome<Vec<Binding>> {
        let url = self.page_url(offset)?;
        let response = fetcher.fetch_accepting(&url, SPARQL_ACCEPT)?;
        if response.is_error_status() {
            return Err(ScanError::Source(format!(
                "wikidata returned http {}",
                response.status
            )));
        }

        let parsed: SparqlResponse = serde_json::from_slice(&response.body)?;
        Ok(parsed.results.bindings)
    }
}

impl Default for WikidataProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteProvider for WikidataProvider {
    fn name(&self) -> &'static str {
        "wikidata"
    }

    fn fetch_sites(
        &self,
        fetcher: &dyn Fetcher,
        max_sites: Option<usize>,
    ) -> ScanOutcome<Vec<SourceSite>> {
        let mut sites = Vec::new();
        let mut offset = 0;

        loop {
            if max_sites.is_some_and(|max| sites.len() >= max) {
                break;
            }

            let bindings = self.fetch_page(fetcher, offset)?;
            debug!(offset, rows = bindings.len(), "wikidata page");
            if bindings.is_empty() {
                break;
            }

            sites.extend(bindings.into_iter().filter_map(Binding::into_site));
            offset += self.page_size;
        }

        if let Some(max) = max_sites {
            sites.truncate(max);
        }

        info!(count = sites.len(), "wikidata sites loaded");
        Ok(sites)
    }
}
