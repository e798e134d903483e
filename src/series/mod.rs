pub mod fetcher;

pub use fetcher::{SeriesFetcher, normalize_observations};
