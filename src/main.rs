use std::sync::Arc;
use feedhub::api::{ApiState, create_router};
use feedhub::config::AppConfig;
use feedhub::connectors::HttpConnector;
use feedhub::observability::metrics::register_metrics;
use feedhub::observability::tracing::init_tracing;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("FEEDHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env)?;

    init_tracing(&config.logging)?;
    register_metrics();

    if config.series.credential().is_none() {
        tracing::warn!("no series API key configured; /api/prices will fail until one is set");
    }
    tracing::info!(
        env = %env,
        series_id = %config.series.series_id,
        feed_sources = config.feeds.sources.len(),
        "configuration loaded"
    );

    let client = Arc::new(HttpConnector::new(&config.http)?);
    let state = Arc::new(ApiState::from_config(&config, client));
    let app = create_router(state);

    let listener = TcpListener::bind(&config.server.bind_addr).await?;
    tracing::info!(addr = %config.server.bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
