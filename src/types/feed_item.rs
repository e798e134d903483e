use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNTITLED: &str = "Untitled";
pub const NO_LINK: &str = "#";

/// One normalized entry from any registered feed.
///
/// `date` serializes as an RFC 3339 string. `source` is always the registry
/// label of the feed the item came from.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub date: DateTime<Utc>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub source: String,
}
