//! docchat-gateway
//!
//! Edge service for the AI doctor chat web application, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                     GATEWAY                          │
//!   Browser       │  ┌──────────┐    ┌──────────────┐                     │
//!   ──────────────┼─▶│  http    │───▶│ Route Guard  │──▶ 307 redirect      │
//!                 │  │ server   │    │ (routing)    │                     │
//!                 │  └──────────┘    └──────┬───────┘                     │
//!                 │                         │ proceed                     │
//!                 │         ┌───────────────┼──────────────┬───────────┐  │
//!                 │         ▼               ▼              ▼           ▼  │
//!                 │   /api/backend/*   /api/blog/*     /api/chat    pages │
//!                 │   proxy::backend   proxy::blog     chat         static│
//!                 │         │               │                             │
//!                 └─────────┼───────────────┼─────────────────────────────┘
//!                           ▼               ▼
//!                      Backend API     Blog service
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use docchat_gateway::config::load_config;
use docchat_gateway::observability::{logging, metrics};
use docchat_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "docchat-gateway")]
#[command(about = "Route guard and authenticated API proxy for the doctor chat app", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults plus environment are used when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability);

    tracing::info!("docchat-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.api_url,
        blog_upstream = %config.upstream.blog_origin(),
        upstream_timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    if config.session.uses_default_secret() {
        tracing::warn!("session.secret is the built-in placeholder; set SESSION_SECRET or session cookies can be forged");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown.clone().trigger_on_signal());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
