use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Configuration Errors
    #[error("Missing API key for series provider")]
    MissingCredential,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Upstream Errors
    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus {
        url: String,
        status: u16,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    // Parse Errors
    #[error("Response decoding failed: {0}")]
    Decode(String),

    #[error("Malformed observation value {value:?} on {date}")]
    MalformedObservation {
        date: String,
        value: String,
    },

    #[error("Feed parse error: {0}")]
    FeedParse(String),

    // Observability Errors
    #[error("Metrics encoding error: {0}")]
    MetricsEncoding(String),

    // Task Errors
    #[error("Task panicked: {0}")]
    TaskPanicked(String),
}

impl Error {
    /// Configuration problems are reported separately from data-fetch failures.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::MissingCredential | Error::ConfigError(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        // reqwest embeds the full URL (api_key included) in its Display output
        Error::Transport(e.without_url().to_string())
    }
}

impl From<prometheus::Error> for Error {
    fn from(e: prometheus::Error) -> Self {
        Error::MetricsEncoding(e.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Error::FeedParse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
