pub mod api;
pub mod config;
pub mod connectors;
pub mod error;
pub mod feeds;
pub mod observability;
pub mod series;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
