use tracing::Span;
use tracing_subscriber::EnvFilter;
use crate::config::{LogFormat, LoggingConfig};
use crate::error::{Error, Result};

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::ConfigError(format!("invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
    };

    installed.map_err(|e| Error::ConfigError(format!("tracing already initialized: {}", e)))
}

pub fn trace_series_fetch(series_id: &str) -> Span {
    tracing::info_span!(
        "series_fetch",
        series_id = %series_id,
    )
}

pub fn trace_feed_source(label: &str) -> Span {
    tracing::info_span!(
        "feed_source",
        source = %label,
    )
}
