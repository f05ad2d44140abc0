/*
[INPUT]:  Optional YAML configuration file, RANGER_* and API_KEY environment variables
[OUTPUT]: Validated proxy, login and estimation settings
[POS]:    Configuration layer - process setup
[UPDATE]: When adding new configuration options
*/

use config::{Config, Environment, File, FileFormat};
use green_ranger_adapter::carbon::{DEFAULT_GRID_EMISSION_FACTOR, DEFAULT_TOKEN_DECIMALS};
use green_ranger_adapter::http::{PROXY_PREFIX, UPSTREAM_BASE_URL};
use green_ranger_adapter::types::DEFAULT_PROJECT;
use reqwest::Url;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::error::{ProxyError, Result};

const ENV_PREFIX: &str = "RANGER";
const API_KEY_VAR: &str = "API_KEY";

/// Top-level configuration for the green-ranger binary
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RangerConfig {
    /// Address the proxy listens on
    pub listen: SocketAddr,
    pub proxy: ProxySettings,
    /// Upstream account used by `report`
    pub login: Option<LoginSettings>,
    pub estimation: EstimationSettings,
}

impl Default for RangerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 3000)),
            proxy: ProxySettings::default(),
            login: None,
            estimation: EstimationSettings::default(),
        }
    }
}

/// Forwarding rule and credential handling
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Local path prefix stripped before forwarding
    pub prefix: String,
    pub upstream_base_url: String,
    /// Inserted between the base URL and the stripped path, e.g. `/api/v1`
    pub upstream_base_path: String,
    pub credentials: CredentialSettings,
    /// Unset means upstream calls never time out
    pub upstream_timeout_secs: Option<u64>,
    pub max_body_bytes: usize,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            prefix: PROXY_PREFIX.to_string(),
            upstream_base_url: UPSTREAM_BASE_URL.to_string(),
            upstream_base_path: String::new(),
            credentials: CredentialSettings::default(),
            upstream_timeout_secs: None,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

/// How caller credentials reach the upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialMode {
    /// Caller headers are forwarded untouched
    #[default]
    Passthrough,
    /// `Authorization: Bearer <api_key>` is set server-side
    StaticApiKey,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CredentialSettings {
    pub mode: CredentialMode,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

/// Upstream account for the reporting command
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginSettings {
    pub account: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(default = "default_project")]
    pub project: String,
    /// Route calls through a proxy at this origin instead of the upstream host
    #[serde(default)]
    pub proxy_origin: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EstimationSettings {
    /// kg CO2 per kWh
    pub grid_emission_factor: Decimal,
    pub token_decimals: u32,
}

impl Default for EstimationSettings {
    fn default() -> Self {
        Self {
            grid_emission_factor: DEFAULT_GRID_EMISSION_FACTOR,
            token_decimals: DEFAULT_TOKEN_DECIMALS,
        }
    }
}

fn default_project() -> String {
    DEFAULT_PROJECT.to_string()
}

impl RangerConfig {
    /// Load from an optional YAML file, `RANGER_*` overrides and `API_KEY`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_api_key(path, std::env::var(API_KEY_VAR).ok())
    }

    pub fn load_with_api_key(path: Option<&Path>, api_key: Option<String>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        if let Some(api_key) = api_key.filter(|key| !key.is_empty()) {
            builder = builder.set_override("proxy.credentials.api_key", api_key)?;
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.proxy.validate()?;
        if self.estimation.grid_emission_factor.is_sign_negative() {
            return Err(ProxyError::InvalidConfig(
                "estimation.grid_emission_factor cannot be negative".into(),
            ));
        }
        if let Some(login) = &self.login {
            if login.account.is_empty() || login.password.is_empty() {
                return Err(ProxyError::InvalidConfig(
                    "login.account and login.password are required".into(),
                ));
            }
        }
        Ok(())
    }
}

impl ProxySettings {
    pub fn validate(&self) -> Result<()> {
        if !self.prefix.starts_with('/') || (self.prefix.len() > 1 && self.prefix.ends_with('/')) {
            return Err(ProxyError::InvalidConfig(format!(
                "proxy.prefix must start with '/' and not end with '/': {:?}",
                self.prefix
            )));
        }
        if !self.upstream_base_path.is_empty() && !self.upstream_base_path.starts_with('/') {
            return Err(ProxyError::InvalidConfig(format!(
                "proxy.upstream_base_path must be empty or start with '/': {:?}",
                self.upstream_base_path
            )));
        }
        Url::parse(&self.upstream_base_url).map_err(|err| {
            ProxyError::InvalidConfig(format!(
                "proxy.upstream_base_url {:?} is not a URL: {err}",
                self.upstream_base_url
            ))
        })?;
        if self.credentials.mode == CredentialMode::StaticApiKey
            && self.credentials.api_key.as_deref().is_none_or(str::is_empty)
        {
            return Err(ProxyError::InvalidConfig(format!(
                "static_api_key mode needs {API_KEY_VAR} or proxy.credentials.api_key"
            )));
        }
        Ok(())
    }
}
