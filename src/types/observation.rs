use serde::{Deserialize, Serialize};

/// Marker the provider uses for "no reading this period".
pub const MISSING_VALUE_SENTINEL: &str = ".";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Observation {
    pub date: String,
    pub value: String,
}

impl Observation {
    pub fn new(date: impl Into<String>, value: impl Into<String>) -> Self {
        Observation {
            date: date.into(),
            value: value.into(),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.value == MISSING_VALUE_SENTINEL
    }
}

/// Envelope returned by the observations endpoint. Everything besides the
/// observation list (units, counts, paging) is ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct ObservationsResponse {
    pub observations: Vec<Observation>,
}
