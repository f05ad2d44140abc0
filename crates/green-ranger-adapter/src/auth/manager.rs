/*
[INPUT]:  Login settings, HTTP client and a caller-owned session
[OUTPUT]: Authenticated credentials and session-aware signed requests
[POS]:    Auth layer - orchestrates login and re-authentication
[UPDATE]: When auth endpoints or the re-authentication rule change
*/

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::http::{Credentials, RangerClient, RangerError, Result};
use crate::types::{ApiResponse, Endpoint, LoginData, LoginRequest};

use super::Session;

/// Response header carrying the `auth` credential
const AUTH_HEADER: &str = "auth";

/// Manages login and keeps sessions usable
#[derive(Debug, Clone)]
pub struct AuthManager {
    client: RangerClient,
    login: LoginRequest,
}

impl AuthManager {
    pub fn new(client: RangerClient, login: LoginRequest) -> Self {
        Self { client, login }
    }

    pub fn client(&self) -> &RangerClient {
        &self.client
    }

    /// Log in and collect the session credentials
    ///
    /// POST /ppr/web/login/login
    pub async fn login(&self) -> Result<Credentials> {
        let builder = self
            .client
            .request(Method::POST, Endpoint::Login.path())?
            .json(&self.login);
        let response = builder.send().await?;

        let auth = response
            .headers()
            .get(AUTH_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let envelope: ApiResponse<LoginData> = RangerClient::read_envelope(response).await?;
        let data = envelope.data.ok_or_else(RangerError::login_failed)?;

        let auth = auth.unwrap_or_else(|| {
            warn!("login response carried no auth header");
            String::new()
        });

        info!(user_id = %data.user_id, "login succeeded");
        Ok(Credentials {
            token: data.token,
            secret: data.secret,
            user_id: data.user_id,
            auth,
        })
    }

    /// Log in if the session holds no credentials yet
    pub async fn ensure_session(&self, session: &mut Session) -> Result<Credentials> {
        if let Some(credentials) = session.credentials() {
            return Ok(credentials.clone());
        }
        let credentials = self.login().await?;
        session.establish(credentials.clone());
        Ok(credentials)
    }

    /// Discard the session credentials and log in again
    pub async fn reauthenticate(&self, session: &mut Session) -> Result<Credentials> {
        session.invalidate();
        self.ensure_session(session).await
    }

    /// Signed GET that re-authenticates once when the upstream rejects the session
    pub async fn signed_get<T: DeserializeOwned>(
        &self,
        session: &mut Session,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let credentials = self.ensure_session(session).await?;
        match self.client.signed_get(&credentials, path, query).await {
            Err(RangerError::TokenExpired) => {
                warn!(path, "session rejected upstream, logging in again");
                let credentials = self.reauthenticate(session).await?;
                self.client.signed_get(&credentials, path, query).await
            }
            other => other,
        }
    }
}
