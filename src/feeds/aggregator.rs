use std::sync::Arc;
use chrono::Utc;
use tracing::Instrument;
use crate::config::{FeedSource, FeedsConfig};
use crate::connectors::UpstreamClient;
use crate::error::Result;
use crate::feeds::extract::normalize_entry;
use crate::feeds::parser::parse_feed;
use crate::observability::metrics::{FEED_SOURCE_FAILURES, UPSTREAM_FAILURES, UPSTREAM_REQUESTS};
use crate::observability::tracing::trace_feed_source;
use crate::types::FeedItem;
use crate::utils::settle::settle_all;

const PIPELINE: &str = "feeds";

/// Fans out to every registered feed at once and merges the results into a
/// single newest-first list.
///
/// A source that fails for any reason contributes nothing; the aggregate
/// itself never fails.
pub struct FeedAggregator {
    client: Arc<dyn UpstreamClient>,
    sources: Vec<FeedSource>,
    max_items: usize,
}

impl FeedAggregator {
    pub fn new(client: Arc<dyn UpstreamClient>, config: &FeedsConfig) -> Self {
        FeedAggregator {
            client,
            sources: config.sources.clone(),
            max_items: config.max_items,
        }
    }

    pub async fn aggregate(&self) -> Vec<FeedItem> {
        let tasks = self.sources.iter().map(|source| {
            self.fetch_source(source)
                .instrument(trace_feed_source(&source.label))
        });
        let settled = settle_all(tasks).await;

        let mut combined = Vec::new();
        let mut failed = 0usize;
        for (source, outcome) in self.sources.iter().zip(settled) {
            match outcome {
                Ok(items) => combined.extend(items),
                Err(e) => {
                    failed += 1;
                    FEED_SOURCE_FAILURES.with_label_values(&[source.label.as_str()]).inc();
                    tracing::warn!(
                        source = %source.label,
                        url = %source.url,
                        error = %e,
                        "Error fetching feed"
                    );
                }
            }
        }

        tracing::info!(
            sources = self.sources.len(),
            failed,
            items = combined.len(),
            "feed aggregation settled"
        );
        merge_latest(combined, self.max_items)
    }

    /// Fetch, parse and normalize one source.
    pub async fn fetch_source(&self, source: &FeedSource) -> Result<Vec<FeedItem>> {
        UPSTREAM_REQUESTS.with_label_values(&[PIPELINE]).inc();
        let body = self.client.get(&source.url, &[]).await.inspect_err(|_| {
            UPSTREAM_FAILURES.with_label_values(&[PIPELINE]).inc();
        })?;

        let fetched_at = Utc::now();
        let entries = parse_feed(&body)?;
        tracing::debug!(entries = entries.len(), "feed parsed");

        Ok(entries
            .iter()
            .map(|entry| normalize_entry(entry, &source.label, fetched_at))
            .collect())
    }
}

/// Newest first, at most `limit` items. Items with equal dates keep their
/// concatenation order.
pub fn merge_latest(mut items: Vec<FeedItem>, limit: usize) -> Vec<FeedItem> {
    items.sort_by(|a, b| b.date.cmp(&a.date));
    items.truncate(limit);
    items
}
