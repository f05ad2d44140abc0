/*
[INPUT]:  HTTP configuration (deployment, timeouts, project headers, credentials)
[OUTPUT]: Configured reqwest client ready for signed API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::http::signature::sign_path;
use crate::http::{RangerError, Result};
use crate::types::{ApiResponse, DEFAULT_PROJECT};

/// Upstream energy-monitoring API
pub const UPSTREAM_BASE_URL: &str = "https://api.valueclouds.com";
/// Local prefix under which the proxy forwarder serves the upstream
pub const PROXY_PREFIX: &str = "/api";

const DEFAULT_LANGUAGE: &str = "zh_CN";

/// Where requests are sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    /// Straight to the upstream host
    Direct,
    /// Through a proxy forwarder at `origin` (e.g. `http://localhost:3000`)
    Proxied { origin: String },
}

impl Deployment {
    pub fn base_url(&self) -> String {
        match self {
            Deployment::Direct => UPSTREAM_BASE_URL.to_string(),
            Deployment::Proxied { origin } => {
                format!("{}{}", origin.trim_end_matches('/'), PROXY_PREFIX)
            }
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub deployment: Deployment,
    /// `project` header value
    pub project: String,
    /// `i18n` header value
    pub language: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            deployment: Deployment::Direct,
            project: DEFAULT_PROJECT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Session credentials returned by login. Held in memory only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub secret: String,
    pub user_id: String,
    /// Taken from the login response's `auth` header
    pub auth: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token)
            .field("secret", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("auth", &self.auth)
            .finish()
    }
}

/// Main HTTP client for the energy API
#[derive(Debug, Clone)]
pub struct RangerClient {
    http_client: Client,
    base_url: String,
    project: String,
    language: String,
}

impl RangerClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = config.deployment.base_url();
        Self::with_config_and_base_url(config, &base_url)
    }

    /// Create a client against an explicit base URL (mock servers, staging hosts)
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        Url::parse(base_url)?;

        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project: config.project,
            language: config.language,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// Base URL and endpoint path are concatenated, not joined, so a
    /// proxied base such as `http://host/api` keeps its prefix.
    fn endpoint_url(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    /// Build an unsigned request
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint_url(path)?;
        Ok(self.http_client.request(method, url))
    }

    /// Build a GET carrying the session headers and the path signature
    pub(crate) fn signed_request(
        &self,
        credentials: &Credentials,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<RequestBuilder> {
        let sign = sign_path(&credentials.secret, path)?;
        let builder = self
            .request(Method::GET, path)?
            .query(query)
            .header("i18n", &self.language)
            .header("auth", &credentials.auth)
            .header("token", &credentials.token)
            .header("secret", &credentials.secret)
            .header("userId", &credentials.user_id)
            .header("sign", sign)
            .header("project", &self.project)
            .header(CONTENT_TYPE, "application/json");
        Ok(builder)
    }

    /// Issue a signed GET and unwrap the response envelope
    pub async fn signed_get<T: DeserializeOwned>(
        &self,
        credentials: &Credentials,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!(path, params = query.len(), "sending signed request");
        let builder = self.signed_request(credentials, path, query)?;
        let response = builder.send().await?;
        let envelope: ApiResponse<T> = Self::read_envelope(response).await?;
        envelope.into_result()
    }

    /// Check the HTTP status and parse the JSON envelope
    pub(crate) async fn read_envelope<T: DeserializeOwned>(
        response: Response,
    ) -> Result<ApiResponse<T>> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(RangerError::TokenExpired);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(RangerError::api_error(status, body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_base_urls() {
        assert_eq!(Deployment::Direct.base_url(), "https://api.valueclouds.com");
        let proxied = Deployment::Proxied {
            origin: "http://localhost:3000/".to_string(),
        };
        assert_eq!(proxied.base_url(), "http://localhost:3000/api");
    }

    #[test]
    fn test_proxied_endpoint_keeps_prefix() {
        let config = ClientConfig {
            deployment: Deployment::Proxied {
                origin: "http://localhost:3000".to_string(),
            },
            ..ClientConfig::default()
        };
        let client = RangerClient::with_config(config).unwrap();
        let url = client
            .endpoint_url("/dcs/api/auth/web/solar/plants/energyDay")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/dcs/api/auth/web/solar/plants/energyDay"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = RangerClient::with_config_and_base_url(ClientConfig::default(), "not a url");
        assert!(matches!(result, Err(RangerError::UrlParse(_))));
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let credentials = Credentials {
            token: "tok".to_string(),
            secret: "very-private".to_string(),
            user_id: "42".to_string(),
            auth: "auth".to_string(),
        };
        assert!(!format!("{credentials:?}").contains("very-private"));
    }
}
