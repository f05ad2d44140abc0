/*
[INPUT]:  Configuration, I/O, body, upstream and API client failures
[OUTPUT]: ProxyError and the JSON error response browsers receive
[POS]:    Error handling layer - proxy crate
[UPDATE]: When adding failure sources or changing the error body
*/

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::cors;

/// Fixed `location` tag of forwarding error bodies
pub const ERROR_LOCATION: &str = "Proxy Forwarder";

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Inbound body could not be read
    #[error("Failed to read request body: {0}")]
    RequestBody(#[source] axum::Error),

    /// Translated target is not a valid URL
    #[error("Invalid upstream target {target}: {message}")]
    InvalidTarget { target: String, message: String },

    /// Network failure or unreadable upstream response
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error(transparent)]
    Ranger(#[from] green_ranger_adapter::RangerError),
}

pub type Result<T> = std::result::Result<T, ProxyError>;

/// Body of a failed forward
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub location: &'static str,
    pub timestamp: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            location: ERROR_LOCATION,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        error!(error = %self, "proxy error");
        let body = serde_json::to_vec(&ErrorBody::new(self.to_string()))
            .unwrap_or_else(|_| br#"{"error":"proxy error"}"#.to_vec());

        let mut response = (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        cors::apply(headers);
        response
    }
}
