pub mod http;

use async_trait::async_trait;
use crate::error::Result;

pub use http::HttpConnector;

/// Outbound GET seam shared by both pipelines.
///
/// Implementations return the body of a 2xx response. Anything else is an
/// error: `Error::UpstreamStatus` for a non-success status, `Error::Transport`
/// when no response arrived.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>>;
}
