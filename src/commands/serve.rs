use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

use bannerwheel::config::Config;
use bannerwheel::feed::FeedServer;
use bannerwheel::metrics;

/// Configuration parameters for the feed server
pub struct ServeParams {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub catalog: Option<PathBuf>,
    pub seed: Option<u64>,
    pub size: Option<usize>,
    pub disable_cors: bool,
    pub disable_request_logging: bool,
}

/// Start the banner feed server
pub async fn serve(config: Config, params: ServeParams) -> Result<()> {
    let ServeParams {
        host,
        port,
        catalog,
        seed,
        size,
        disable_cors,
        disable_request_logging,
    } = params;

    let mut server_config = config.server;

    if host.is_some() || port.is_some() {
        let host = host.unwrap_or_else(|| server_config.bind_address.ip().to_string());
        let port = port.unwrap_or(server_config.bind_address.port());
        server_config.bind_address = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .context("Invalid bind address")?;
    }
    if catalog.is_some() {
        server_config.catalog_path = catalog;
    }
    if seed.is_some() {
        server_config.seed = seed;
    }
    if let Some(size) = size {
        server_config.selection_size = size;
    }
    if disable_cors {
        server_config.enable_cors = false;
    }
    if disable_request_logging {
        server_config.enable_request_logging = false;
    }

    if let Err(e) = metrics::init_metrics() {
        tracing::warn!(error = %e, "Metrics unavailable");
    }

    let bind_address = server_config.bind_address;
    let server = FeedServer::new(server_config).context("Failed to create feed server")?;

    println!("{}", server.info().display());
    println!();
    println!("Endpoints:");
    println!("  GET  /                - Landing page");
    println!("  GET  /api/banner-ads  - Random banner selection");
    println!("  GET  /api/health      - Health check");
    println!("  GET  /robots.txt      - Crawler rules");
    println!("  GET  /sitemap.xml     - Sitemap");
    println!("  GET  /metrics         - Prometheus metrics endpoint");
    println!();
    println!("Feed server listening on http://{bind_address}");
    println!("Press Ctrl+C to stop.\n");

    server
        .start_with_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                }
                Err(e) => {
                    tracing::error!("Failed to wait for Ctrl+C: {}", e);
                }
            }
        })
        .await?;

    println!("Feed server stopped.");
    Ok(())
}
