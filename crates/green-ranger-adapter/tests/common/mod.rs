/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for green-ranger-adapter tests

#![allow(dead_code)]

use green_ranger_adapter::{ClientConfig, Credentials, RangerClient};
use wiremock::MockServer;

pub const TEST_SECRET: &str = "0f6c1e9d2b7a4c3e";
pub const TEST_AUTH: &str = "auth-header-value";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn mock_client(server: &MockServer) -> RangerClient {
    RangerClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
}

pub fn test_credentials() -> Credentials {
    Credentials {
        token: "token-abc".to_string(),
        secret: TEST_SECRET.to_string(),
        user_id: "10086".to_string(),
        auth: TEST_AUTH.to_string(),
    }
}

/// Successful login envelope
pub fn login_body(token: &str) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "code": 0,
        "data": {
            "token": token,
            "secret": TEST_SECRET,
            "userId": "10086"
        }
    })
}
