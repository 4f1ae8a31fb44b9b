use std::path::PathBuf;

use crate::errors::{ScanError, ScanOutcome};
use crate::sources::traits::SiteProvider;
use crate::sources::{sites_file::SitesFileProvider, wikidata::WikidataProvider};

pub struct ProviderRegistry {
    providers: Vec<Box<dyn SiteProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            providers: Vec::new(),
        };
        registry.register(Box::new(WikidataProvider::new()));
        registry
    }

    /// Registry that can also read sites from a local file.
    pub fn with_sites_file(path: impl Into<PathBuf>) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SitesFileProvider::new(path)));
        registry
    }

    pub fn register(&mut self, provider: Box<dyn SiteProvider>) {
        self.providers.push(provider);
    }

    /// Find the provider for a source name
    pub fn find(&self, name: &str) -> ScanOutcome<&dyn SiteProvider> {
        self.providers
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .map(|p| p.as_ref())
            .ok_or_else(|| ScanError::UnsupportedSource(name.to_string()))
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
