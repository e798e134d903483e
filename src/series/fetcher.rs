use std::sync::Arc;
use tracing::Instrument;
use crate::config::{MalformedValuePolicy, SeriesConfig};
use crate::connectors::UpstreamClient;
use crate::error::{Error, Result};
use crate::observability::metrics::{UPSTREAM_FAILURES, UPSTREAM_REQUESTS};
use crate::observability::tracing::trace_series_fetch;
use crate::types::{Observation, ObservationsResponse, PricePoint};

const PIPELINE: &str = "series";

/// Retrieves one observation series and turns it into an ordered price
/// series. Exactly one upstream call per fetch, no retry.
pub struct SeriesFetcher {
    client: Arc<dyn UpstreamClient>,
    config: SeriesConfig,
}

impl SeriesFetcher {
    pub fn new(client: Arc<dyn UpstreamClient>, config: SeriesConfig) -> Self {
        SeriesFetcher { client, config }
    }

    /// Fetch the configured series from the configured start date.
    pub async fn fetch(&self) -> Result<Vec<PricePoint>> {
        self.fetch_series(&self.config.series_id, &self.config.observation_start)
            .await
    }

    pub async fn fetch_series(&self, series_id: &str, start_date: &str) -> Result<Vec<PricePoint>> {
        // Checked before anything touches the network.
        let api_key = self.config.credential().ok_or(Error::MissingCredential)?;

        let query = [
            ("series_id", series_id),
            ("api_key", api_key),
            ("file_type", "json"),
            ("frequency", self.config.frequency.as_str()),
            ("sort_order", "asc"),
            ("observation_start", start_date),
        ];

        UPSTREAM_REQUESTS.with_label_values(&[PIPELINE]).inc();
        let outcome: Result<Vec<PricePoint>> = async {
            let body = self.client.get(&self.config.base_url, &query).await?;
            let response: ObservationsResponse = serde_json::from_slice(&body)
                .map_err(|e| Error::Decode(e.to_string()))?;

            tracing::debug!(observations = response.observations.len(), "observations received");
            normalize_observations(response.observations, self.config.malformed_values)
        }
        .instrument(trace_series_fetch(series_id))
        .await;

        if outcome.is_err() {
            UPSTREAM_FAILURES.with_label_values(&[PIPELINE]).inc();
        }
        outcome
    }
}

/// Drop sentinel observations, coerce the rest to numbers and order by date.
///
/// Equal dates keep their upstream order; nothing is de-duplicated.
pub fn normalize_observations(
    observations: Vec<Observation>,
    policy: MalformedValuePolicy,
) -> Result<Vec<PricePoint>> {
    let mut points = Vec::with_capacity(observations.len());

    for obs in observations {
        if obs.is_missing() {
            continue;
        }

        let parsed = obs.value.trim().parse::<f64>().ok();
        match parsed {
            Some(price) if price.is_finite() => points.push(PricePoint::new(obs.date, price)),
            _ => match policy {
                MalformedValuePolicy::Skip => {
                    tracing::warn!(date = %obs.date, value = %obs.value, "skipping malformed observation");
                }
                MalformedValuePolicy::PassThrough => {
                    points.push(PricePoint::new(obs.date, parsed.unwrap_or(f64::NAN)));
                }
                MalformedValuePolicy::Reject => {
                    return Err(Error::MalformedObservation {
                        date: obs.date,
                        value: obs.value,
                    });
                }
            },
        }
    }

    // ISO dates order lexicographically; sort_by is stable.
    points.sort_by(|a, b| a.date.cmp(&b.date));
    Ok(points)
}
