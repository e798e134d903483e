use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use crate::config::CacheConfig;
use crate::error::Error;

/// `Cache-Control` for successful responses: shared caches may keep the body
/// fresh for `fresh_secs` and keep serving it while revalidating for
/// `stale_while_revalidate_secs` more.
#[derive(Clone, Debug)]
pub struct CachePolicy {
    header: HeaderValue,
}

impl CachePolicy {
    pub fn new(config: &CacheConfig) -> Self {
        let value = format!(
            "public, s-maxage={}, stale-while-revalidate={}",
            config.fresh_secs, config.stale_while_revalidate_secs
        );
        CachePolicy {
            // digits and ascii only, always a valid header value
            header: HeaderValue::from_str(&value).unwrap_or(HeaderValue::from_static("no-store")),
        }
    }

    pub fn header_value(&self) -> &HeaderValue {
        &self.header
    }

    pub fn respond<T: Serialize>(&self, body: T) -> Response {
        (
            [(header::CACHE_CONTROL, self.header.clone())],
            Json(body),
        )
            .into_response()
    }
}

/// Failures as callers see them. Detail stays in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    MissingConfiguration,
    UpstreamFailure,
    FeedOrchestration,
    Internal,
}

impl ApiError {
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::MissingConfiguration => "Missing API key",
            ApiError::UpstreamFailure => "Failed to fetch data",
            ApiError::FeedOrchestration => "Failed to fetch feeds",
            ApiError::Internal => "Internal server error",
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl From<&Error> for ApiError {
    fn from(e: &Error) -> Self {
        if e.is_configuration() {
            ApiError::MissingConfiguration
        } else {
            ApiError::UpstreamFailure
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorBody {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
