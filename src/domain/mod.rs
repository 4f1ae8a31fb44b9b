pub mod feed;
pub mod site;
pub mod scan;
pub mod topic;

pub use feed::{FeedKind, FeedRecord};
pub use site::{SiteRecord, SourceSite, NO_VALID_FEEDS};
pub use scan::{now_iso, ScanMeta, ScanResult, ScanSummary};
pub use topic::{TopicReport, TopicRow};

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default instead of failing.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
