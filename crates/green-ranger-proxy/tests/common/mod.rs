/*
[INPUT]:  Mock upstream server and proxy settings
[OUTPUT]: Shared fixtures for driving the proxy router
[POS]:    Test infrastructure - shared across proxy test modules
[UPDATE]: When adding new test patterns or fixtures
*/

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use green_ranger_proxy::config::{CredentialMode, CredentialSettings, RangerConfig};
use green_ranger_proxy::ProxyServer;
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::MockServer;

pub const ENERGY_DAY: &str = "/dcs/api/auth/web/solar/plants/energyDay";
pub const STATIC_KEY: &str = "k-123";

/// Configuration forwarding to `upstream`
pub fn config_for(upstream: &str) -> RangerConfig {
    let mut config = RangerConfig::default();
    config.proxy.upstream_base_url = upstream.to_string();
    config
}

pub fn static_key_config(upstream: &str) -> RangerConfig {
    let mut config = config_for(upstream);
    config.proxy.credentials = CredentialSettings {
        mode: CredentialMode::StaticApiKey,
        api_key: Some(STATIC_KEY.to_string()),
    };
    config
}

pub fn router(config: &RangerConfig) -> Router {
    ProxyServer::new(config).expect("proxy server").router()
}

pub async fn mock_router(server: &MockServer) -> Router {
    router(&config_for(&server.uri()))
}

/// Drive one request through the router
pub async fn send(router: Router, request: Request<Body>) -> Response<Body> {
    router.oneshot(request).await.expect("router is infallible")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("json body")
}
