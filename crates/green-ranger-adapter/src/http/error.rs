/*
[INPUT]:  Error sources (HTTP, upstream API envelope, serialization, auth, wallet)
[OUTPUT]: Structured error types with auth classification
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the Green Ranger adapter
#[derive(Error, Debug)]
pub enum RangerError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Authentication failed
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Session credentials were rejected upstream
    #[error("Session expired, please re-authenticate")]
    TokenExpired,

    /// Signing input was missing
    #[error("Cannot sign request: {0}")]
    Signing(&'static str),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Generation figures unusable for estimation
    #[error("Invalid energy data: {0}")]
    InvalidEnergy(String),

    /// Wallet capability failure or illegal connection transition
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RangerError {
    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            RangerError::Authentication { .. } | RangerError::TokenExpired | RangerError::Signing(_)
        )
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        RangerError::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }

    pub(crate) fn login_failed() -> Self {
        RangerError::Authentication {
            message: "login failed: no data returned".to_string(),
        }
    }
}

/// Result type alias for Green Ranger operations
pub type Result<T> = std::result::Result<T, RangerError>;
