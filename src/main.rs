//! Web-access-management gateway (session-gate).
//!
//! A session-gating agent built with Tokio and Axum. It fronts a reverse
//! proxy: every request is classified, checked against the session store,
//! and either forwarded to the backend or answered with a redirect.
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 SESSION GATE                  │
//!   Client Request   │  ┌────────┐   ┌────────────┐   ┌──────────┐  │
//!   ─────────────────┼─▶│  http  │──▶│    gate    │──▶│ forward  │──┼──▶ Backend
//!                    │  │ server │   │ dispatcher │   │  client  │  │
//!                    │  └────────┘   └─────┬──────┘   └──────────┘  │
//!                    │                     │ 302                     │
//!   Redirect         │                     ▼                         │
//!   ◀────────────────┼─────────────── Location: <root><path>         │
//!                    │                                               │
//!                    │  config · session store · observability       │
//!                    └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use session_gate::config::load_config;
use session_gate::lifecycle::Shutdown;
use session_gate::observability;
use session_gate::HttpServer;

#[derive(Parser)]
#[command(name = "session-gate")]
#[command(about = "Session-gating agent fronting a reverse proxy", long_about = None)]
struct Cli {
    /// Path to the configuration file (.toml or .json).
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init("session_gate=debug,tower_http=debug");

    let cli = Cli::parse();

    // A malformed or incomplete config is fatal; nothing is served.
    let config = Arc::new(load_config(&cli.config)?);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        root = %config.target_site.root,
        backend = %config.backend.address,
        session_expiry_minutes = config.siteminder.session_expiry_minutes,
        users = config.users.len(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
