use axum::Router;
use axum_helpers::server::{create_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;

use config::Config;

/// Full application: API routes behind the shared layers, plus `/health`
fn app() -> Router {
    create_router(api::routes()).merge(health_router(env!("CARGO_PKG_VERSION")))
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    info!(environment = ?config.environment, "Starting users API");

    create_app(app(), &config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}
