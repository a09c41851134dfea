//! Strata HTTP server entry point
//!
//! Starts the REST API over the live index generation.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use strata::core::config::Config;
use strata::core::services::Services;
use strata::core::xdg::XdgDirs;
use strata::http;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "strata=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Strata RAG service");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Initialize XDG directories
    let xdg = XdgDirs::new();
    xdg.log_paths();
    xdg.ensure_dirs_exist()?;

    // Load configuration
    let config = Config::load_with_xdg(&xdg)?;
    config.log_config();

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create shared services; binds the current live generation
    let services = Arc::new(Services::new(config)?);
    let app = http::router(services);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("Service ready - Health check at http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
