pub mod traits;
pub mod wikidata;
pub mod sites_file;
pub mod registry;

pub use traits::SiteProvider;
pub use registry::ProviderRegistry;
pub use sites_file::SitesFileProvider;
pub use wikidata::WikidataProvider;
