pub mod discovery_service;
pub mod validation_service;
pub mod scan_service;
pub mod report_service;

pub use discovery_service::{discover, looks_like_feed_url};
pub use report_service::topic_summary;
pub use scan_service::{Homepage, ScanOptions, ScanService};
pub use validation_service::{select_best, validate};
