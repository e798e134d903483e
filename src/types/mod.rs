pub mod feed_item;
pub mod observation;
pub mod price_point;

pub use feed_item::FeedItem;
pub use observation::{MISSING_VALUE_SENTINEL, Observation, ObservationsResponse};
pub use price_point::PricePoint;
