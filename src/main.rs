//! Secure MCP gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ request-id / trace ──▶ CORS ──▶ Auth ──▶ Body limit ──▶ Router
//!                                                                      │
//!                                       /healthz ◀─────────────────────┤
//!                                       /mcp/*   ◀── protocol engine ◀─┘
//! ```
//!
//! Configuration is read once from the environment (`MCP_*`, `HOST`, `PORT`,
//! `RELOAD`); `--host` and `--port` override the bind address.

use clap::Parser;
use tokio::net::TcpListener;

use mcp_secure_gateway::config;
use mcp_secure_gateway::engine;
use mcp_secure_gateway::lifecycle::{signals, Shutdown};
use mcp_secure_gateway::observability::{logging, metrics};
use mcp_secure_gateway::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "mcp-secure-gateway", version, about = "Secure MCP HTTP gateway")]
struct Cli {
    /// Bind host (overrides HOST).
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides PORT).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = config::load_from_env()?;
    if let Some(host) = cli.host {
        config.listener.host = host;
    }
    if let Some(port) = cli.port {
        config.listener.port = port;
    }

    logging::init(&config.observability)?;

    tracing::info!(
        server_name = %config.server_name,
        bind_address = %config.listener.bind_address(),
        allow_origins = ?config.cors.allow_origins,
        allow_credentials = config.cors.allow_credentials,
        max_body_bytes = config.limits.max_body_bytes,
        auth_enabled = config.auth.enabled(),
        "Configuration loaded"
    );

    if config.listener.reload {
        tracing::warn!("RELOAD is set but auto-reload is not supported; restart the process to apply changes");
    }

    if let Some(addr) = &config.observability.metrics_address {
        metrics::init_metrics(addr.parse()?)?;
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        shutdown.trigger();
    });

    let engine = engine::service(config.server_name.clone());
    HttpServer::new(config, engine).run(listener, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
