use crate::config::*;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Conventional variable name for the series credential, honored when the
/// layered config leaves `series.api_key` unset.
pub const FRED_API_KEY_VAR: &str = "FRED_API_KEY";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub series: SeriesConfig,
    pub feeds: FeedsConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Layers `config/default`, `config/{env}` and `FEEDHUB_*` variables
    /// (`FEEDHUB_SERIES__API_KEY`, `FEEDHUB_FEEDS__MAX_ITEMS`, ...).
    pub fn load(env: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("FEEDHUB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        let mut app: AppConfig = config
            .try_deserialize()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        if app.series.credential().is_none() {
            app.series.api_key = std::env::var(FRED_API_KEY_VAR).ok();
        }

        app.validate()?;
        Ok(app)
    }

    /// Structural checks only. A missing credential is not a startup error;
    /// it is reported on each series request instead.
    pub fn validate(&self) -> Result<()> {
        if self.series.series_id.trim().is_empty() {
            return Err(Error::ConfigError("series.series_id must not be empty".into()));
        }
        if self.series.frequency.trim().is_empty() {
            return Err(Error::ConfigError("series.frequency must not be empty".into()));
        }
        NaiveDate::parse_from_str(&self.series.observation_start, "%Y-%m-%d").map_err(|e| {
            Error::ConfigError(format!(
                "series.observation_start {:?} is not a YYYY-MM-DD date: {}",
                self.series.observation_start, e
            ))
        })?;
        if self.feeds.max_items == 0 {
            return Err(Error::ConfigError("feeds.max_items must be at least 1".into()));
        }
        for (idx, source) in self.feeds.sources.iter().enumerate() {
            if source.url.trim().is_empty() || source.label.trim().is_empty() {
                return Err(Error::ConfigError(format!(
                    "feeds.sources[{}] needs both url and label",
                    idx
                )));
            }
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::ConfigError("http.timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = AppConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.feeds.sources.len(), 4);
        assert_eq!(cfg.feeds.max_items, 10);
        assert_eq!(cfg.cache.fresh_secs, 14_400);
        assert_eq!(cfg.cache.stale_while_revalidate_secs, 28_800);
    }

    #[test]
    fn rejects_bad_start_date() {
        let mut cfg = AppConfig::default();
        cfg.series.observation_start = "1980/01/01".into();
        assert!(matches!(cfg.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn rejects_zero_max_items() {
        let mut cfg = AppConfig::default();
        cfg.feeds.max_items = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_unlabelled_source() {
        let mut cfg = AppConfig::default();
        cfg.feeds.sources.push(FeedSource::new("https://example.com/feed", " "));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_key_is_not_a_startup_error() {
        let mut cfg = AppConfig::default();
        cfg.series.api_key = None;
        cfg.validate().unwrap();
        assert!(cfg.series.credential().is_none());
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut cfg = AppConfig::default();
        cfg.series.api_key = Some("   ".into());
        assert!(cfg.series.credential().is_none());
    }

    #[test]
    fn deserializes_partial_toml() {
        let raw = r#"
            [series]
            api_key = "abc"
            malformed_values = "reject"

            [feeds]
            max_items = 3

            [[feeds.sources]]
            url = "https://example.com/rss"
            label = "Example"
        "#;
        let cfg: AppConfig = Config::builder()
            .add_source(File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.series.credential(), Some("abc"));
        assert_eq!(cfg.series.malformed_values, MalformedValuePolicy::Reject);
        assert_eq!(cfg.series.series_id, "APU0000708111");
        assert_eq!(cfg.feeds.max_items, 3);
        assert_eq!(cfg.feeds.sources, vec![FeedSource::new("https://example.com/rss", "Example")]);
    }
}
