/*
[INPUT]:  Outgoing response headers
[OUTPUT]: CORS headers and the preflight short-circuit
[POS]:    HTTP layer - browser cross-origin policy
[UPDATE]: When the allowed methods or custom headers change
*/

use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str =
    "Content-Type, Authorization, token, userId, secret, auth, sign, project";
pub const MAX_AGE_SECS: &str = "86400";

const CORS_PREFIX: &str = "access-control-";

/// Set the origin, method and header allow-lists
pub fn apply(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

/// `204` answer to an `OPTIONS` request; the upstream is never contacted
pub fn preflight() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    apply(headers);
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(MAX_AGE_SECS),
    );
    response
}

/// Header names are stored lowercase, so a prefix check is case-insensitive
pub fn is_cors_header(name: &HeaderName) -> bool {
    name.as_str().starts_with(CORS_PREFIX)
}
