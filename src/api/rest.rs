use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use axum::{
    Router,
    routing::get,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use crate::api::response::{ApiError, CachePolicy};
use crate::config::AppConfig;
use crate::connectors::UpstreamClient;
use crate::feeds::FeedAggregator;
use crate::observability::metrics::{self, ITEMS_SERVED};
use crate::series::SeriesFetcher;

pub struct ApiState {
    pub series: SeriesFetcher,
    pub feeds: FeedAggregator,
    pub cache: CachePolicy,
}

impl ApiState {
    /// Wire both pipelines to one upstream client.
    pub fn from_config(config: &AppConfig, client: Arc<dyn UpstreamClient>) -> Self {
        ApiState {
            series: SeriesFetcher::new(client.clone(), config.series.clone()),
            feeds: FeedAggregator::new(client, &config.feeds),
            cache: CachePolicy::new(&config.cache),
        }
    }
}

pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_text))
        .route("/api/prices", get(get_prices))
        .route("/api/rss-feeds", get(get_feeds))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics_text() -> Response {
    match metrics::render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "metrics encoding failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_prices(State(state): State<Arc<ApiState>>) -> Result<Response, ApiError> {
    let points = state.series.fetch().await.map_err(|e| {
        if e.is_configuration() {
            tracing::error!(error = %e, "series request rejected: configuration incomplete");
        } else {
            tracing::error!(error = %e, "Error fetching series");
        }
        ApiError::from(&e)
    })?;

    ITEMS_SERVED.with_label_values(&["prices"]).inc_by(points.len() as u64);
    Ok(state.cache.respond(points))
}

async fn get_feeds(State(state): State<Arc<ApiState>>) -> Result<Response, ApiError> {
    // Per-source failures never get here; only a defect in the merge itself.
    let items = AssertUnwindSafe(state.feeds.aggregate())
        .catch_unwind()
        .await
        .map_err(|_| {
            tracing::error!("Error processing feeds: aggregation panicked");
            ApiError::FeedOrchestration
        })?;

    ITEMS_SERVED.with_label_values(&["rss-feeds"]).inc_by(items.len() as u64);
    Ok(state.cache.respond(items))
}

fn panic_response(_payload: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("handler panicked");
    ApiError::Internal.into_response()
}
