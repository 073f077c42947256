//! masw-sv (Survey Server) - MASW survey backend
//!
//! Serves geometry extraction, per-project workspace state, and
//! dispersion processing over HTTP for the survey frontend.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use masw_common::config::resolve_server_config;
use masw_sv::dispersion::FixtureEngine;
use masw_sv::session::MemorySessionStore;
use masw_sv::{build_router, AppState};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "masw-sv", about = "MASW survey backend server")]
struct Args {
    /// Bind host (overrides MASW_HOST and the config file)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides MASW_PORT and the config file)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting MASW Survey Server (masw-sv) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let config = resolve_server_config(args.host, args.port)?;

    let state = AppState::new(
        Arc::new(MemorySessionStore::new()),
        Arc::new(FixtureEngine::new()),
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("masw-sv listening on http://{}", config.bind_addr());
    info!("Health check: http://{}/health", config.bind_addr());

    axum::serve(listener, app).await?;

    Ok(())
}
