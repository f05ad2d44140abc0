/*
[INPUT]:  Serve arguments, configuration, shutdown token
[OUTPUT]: Running proxy forwarder until shutdown
[POS]:    CLI layer - `serve` subcommand
[UPDATE]: When changing startup flow of the proxy
*/

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::info;

use green_ranger_proxy::{ProxyServer, RangerConfig};

use super::ConfigArgs;

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    /// Overrides `listen` from the configuration
    #[arg(long = "listen", value_name = "ADDR")]
    pub listen: Option<SocketAddr>,
    /// Validate configuration and exit
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

pub async fn run(args: ServeArgs, shutdown: CancellationToken) -> Result<()> {
    let mut config =
        RangerConfig::load(args.config.config_path.as_deref()).context("load config")?;
    if let Some(listen) = args.listen {
        config.listen = listen;
    }
    info!(
        listen = %config.listen,
        upstream = %config.proxy.upstream_base_url,
        base_path = %config.proxy.upstream_base_path,
        mode = ?config.proxy.credentials.mode,
        "configuration loaded"
    );

    let server = ProxyServer::new(&config).context("build proxy server")?;
    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    server.run(shutdown).await.context("run proxy server")
}
