use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PricePoint {
    pub date: String,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: impl Into<String>, price: f64) -> Self {
        PricePoint {
            date: date.into(),
            price,
        }
    }
}
