/*
[INPUT]:  RangerConfig, inbound HTTP connections, shutdown token
[OUTPUT]: Axum router serving preflight answers, the self-check and forwarded responses
[POS]:    Server layer - Proxy Forwarder entry point
[UPDATE]: When changing request dispatch or server lifecycle
*/

use axum::extract::{Request, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::RangerConfig;
use crate::cors;
use crate::error::Result;
use crate::forward::Forwarder;

pub const SELF_CHECK_MESSAGE: &str = "Proxy forwarder is working!";

/// Proxy Forwarder HTTP server
#[derive(Debug)]
pub struct ProxyServer {
    listen: SocketAddr,
    forwarder: Arc<Forwarder>,
}

impl ProxyServer {
    pub fn new(config: &RangerConfig) -> Result<Self> {
        Ok(Self {
            listen: config.listen,
            forwarder: Arc::new(Forwarder::new(config.proxy.clone())?),
        })
    }

    /// `{prefix}/test` answers locally; every other path and method is forwarded
    pub fn router(&self) -> Router {
        let self_check = format!(
            "{}/test",
            self.forwarder.settings().prefix.trim_end_matches('/')
        );
        Router::new()
            .route(&self_check, get(handle_self_check).fallback(handle))
            .fallback(handle)
            .with_state(self.forwarder.clone())
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address and serve until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let listener = TcpListener::bind(self.listen).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener, shutdown: CancellationToken) -> Result<()> {
        let local_addr = listener.local_addr()?;
        info!(
            addr = %local_addr,
            upstream = %self.forwarder.settings().upstream_base_url,
            prefix = %self.forwarder.settings().prefix,
            "proxy forwarder listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await?;

        info!("proxy forwarder stopped");
        Ok(())
    }
}

/// Liveness answer; the upstream is not contacted
async fn handle_self_check() -> Response {
    let mut response = Json(serde_json::json!({
        "success": true,
        "message": SELF_CHECK_MESSAGE,
    }))
    .into_response();
    cors::apply(response.headers_mut());
    response
}

async fn handle(State(forwarder): State<Arc<Forwarder>>, request: Request) -> Response {
    if request.method() == Method::OPTIONS {
        return cors::preflight();
    }

    match forwarder.forward(request).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
