/*
[INPUT]:  Inbound request (method, path + query, headers, body) and proxy settings
[OUTPUT]: Upstream response relayed with normalized CORS headers
[POS]:    Proxy layer - path translation, header filtering, forwarding
[UPDATE]: When the translation rule or header policy changes
*/

use axum::body::{Body, to_bytes};
use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use axum::response::Response;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{CredentialMode, ProxySettings};
use crate::cors;
use crate::error::{ProxyError, Result};

/// Connection-scoped headers a proxy must not pass along (RFC 9110 section 7.6.1)
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

/// Strip `prefix` from `path` when it matches a whole leading segment.
///
/// `/api/dcs/x` becomes `/dcs/x`; `/apiary` and paths outside the prefix are
/// returned unchanged.
pub fn strip_prefix<'a>(path: &'a str, prefix: &str) -> &'a str {
    if prefix == "/" {
        return path;
    }
    match path.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}

/// Upstream target for an inbound path and raw query string.
///
/// Target = base URL + base path + stripped path, with the query appended verbatim.
pub fn upstream_target(settings: &ProxySettings, path: &str, query: Option<&str>) -> String {
    let mut upstream_path = format!(
        "{}{}",
        settings.upstream_base_path.trim_end_matches('/'),
        strip_prefix(path, &settings.prefix)
    );
    if upstream_path.is_empty() {
        upstream_path.push('/');
    }

    let mut target = format!(
        "{}{}",
        settings.upstream_base_url.trim_end_matches('/'),
        upstream_path
    );
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }
    target
}

/// Inbound headers minus `host`, hop-by-hop headers and `content-length`,
/// plus the static credential when configured
pub fn outbound_headers(inbound: &HeaderMap, bearer: Option<&HeaderValue>) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if name == header::HOST || name == header::CONTENT_LENGTH || is_hop_by_hop(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    if let Some(bearer) = bearer {
        headers.insert(header::AUTHORIZATION, bearer.clone());
    }
    headers
}

/// Proxy CORS headers first, then upstream headers that cannot override them
pub fn relay_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len() + 5);
    cors::apply(&mut headers);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::CONTENT_TYPE,
        upstream
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static("application/json")),
    );

    for (name, value) in upstream {
        if cors::is_cors_header(name)
            || name == header::CONTENT_TYPE
            || name == header::CONTENT_LENGTH
            || is_hop_by_hop(name)
        {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Forwards translated requests to the fixed upstream
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
    settings: ProxySettings,
    bearer: Option<HeaderValue>,
}

impl Forwarder {
    pub fn new(settings: ProxySettings) -> Result<Self> {
        settings.validate()?;

        let mut builder = Client::builder();
        if let Some(secs) = settings.upstream_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let bearer = match settings.credentials.mode {
            CredentialMode::Passthrough => None,
            CredentialMode::StaticApiKey => {
                let key = settings.credentials.api_key.as_deref().unwrap_or_default();
                let mut value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| {
                    ProxyError::InvalidConfig("API key is not a valid header value".into())
                })?;
                value.set_sensitive(true);
                Some(value)
            }
        };

        Ok(Self {
            client,
            settings,
            bearer,
        })
    }

    pub fn settings(&self) -> &ProxySettings {
        &self.settings
    }

    /// Translate, forward and relay one request. No retry.
    pub async fn forward(&self, request: Request) -> Result<Response> {
        let (parts, body) = request.into_parts();
        let target = upstream_target(&self.settings, parts.uri.path(), parts.uri.query());
        let url = Url::parse(&target).map_err(|err| ProxyError::InvalidTarget {
            target: target.clone(),
            message: err.to_string(),
        })?;

        let body = to_bytes(body, self.settings.max_body_bytes)
            .await
            .map_err(ProxyError::RequestBody)?;
        let headers = outbound_headers(&parts.headers, self.bearer.as_ref());

        info!(method = %parts.method, %target, "proxying request");
        let upstream = self
            .client
            .request(parts.method, url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = upstream.status();
        let headers = relay_headers(upstream.headers());
        let bytes = upstream.bytes().await?;
        debug!(%status, size = bytes.len(), "upstream responded");

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}
