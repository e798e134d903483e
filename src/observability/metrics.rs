use std::sync::Once;
use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use crate::error::{Error, Result};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Upstream metrics
    pub static ref UPSTREAM_REQUESTS: IntCounterVec = IntCounterVec::new(
        Opts::new("upstream_requests_total", "Outbound upstream requests by pipeline"),
        &["pipeline"]
    ).unwrap();

    pub static ref UPSTREAM_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("upstream_failures_total", "Failed upstream requests by pipeline"),
        &["pipeline"]
    ).unwrap();

    // Feed metrics
    pub static ref FEED_SOURCE_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("feed_source_failures_total", "Feed sources that contributed no items because they failed"),
        &["source"]
    ).unwrap();

    // Response metrics
    pub static ref ITEMS_SERVED: IntCounterVec = IntCounterVec::new(
        Opts::new("items_served_total", "Normalized records returned to callers"),
        &["endpoint"]
    ).unwrap();
}

static REGISTER: Once = Once::new();

/// Safe to call more than once; later calls are no-ops.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        let collectors: [Box<dyn prometheus::core::Collector>; 4] = [
            Box::new(UPSTREAM_REQUESTS.clone()),
            Box::new(UPSTREAM_FAILURES.clone()),
            Box::new(FEED_SOURCE_FAILURES.clone()),
            Box::new(ITEMS_SERVED.clone()),
        ];
        for collector in collectors {
            if let Err(e) = REGISTRY.register(collector) {
                tracing::warn!(error = %e, "metric registration failed");
            }
        }
    });
}

/// Prometheus text exposition of everything in `REGISTRY`.
pub fn render() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| Error::MetricsEncoding(e.to_string()))
}
