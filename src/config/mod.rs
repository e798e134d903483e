use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod feeds;
pub mod loader;
pub mod series;

pub use feeds::{FeedSource, FeedsConfig};
pub use loader::AppConfig;
pub use series::{MalformedValuePolicy, SeriesConfig};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_secs: 15,
            user_agent: concat!("feedhub/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Shared-cache windows attached to successful responses.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub fresh_secs: u64,
    pub stale_while_revalidate_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            fresh_secs: 14_400,                  // 4 hours
            stale_while_revalidate_secs: 28_800, // 8 hours
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}
