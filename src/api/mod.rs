pub mod response;
pub mod rest;

pub use response::{ApiError, CachePolicy};
pub use rest::{ApiState, create_router};
