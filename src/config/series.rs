use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct SeriesConfig {
    pub base_url: String,
    pub series_id: String,
    pub observation_start: String,
    pub frequency: String,
    pub api_key: Option<String>,
    pub malformed_values: MalformedValuePolicy,
}

impl SeriesConfig {
    /// A blank key counts as absent.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

impl Default for SeriesConfig {
    fn default() -> Self {
        SeriesConfig {
            base_url: "https://api.stlouisfed.org/fred/series/observations".to_string(),
            series_id: "APU0000708111".to_string(), // eggs, grade A, large, per dozen
            observation_start: "1980-01-01".to_string(),
            frequency: "m".to_string(),
            api_key: None,
            malformed_values: MalformedValuePolicy::default(),
        }
    }
}

/// What to do with a non-sentinel observation whose value is not a number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedValuePolicy {
    /// Drop the observation and log it.
    #[default]
    Skip,
    /// Emit NaN, serialized as `null`.
    PassThrough,
    /// Fail the whole request.
    Reject,
}
