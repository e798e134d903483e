pub mod aggregator;
pub mod extract;
pub mod parser;

pub use crate::config::FeedSource;
pub use aggregator::{FeedAggregator, merge_latest};
pub use extract::normalize_entry;
pub use parser::{RawFeedEntry, parse_feed};
