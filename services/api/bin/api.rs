//! Main Entrypoint for the Mind Search API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Constructing the gateway-backed research agent.
//! 3. Constructing the Axum router and applying middleware.
//! 4. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use mind_search_api::{
    config::Config,
    router::{cors_layer, create_router},
    state::AppState,
};
use mind_search_core::{AgentClient, GatewayAgent};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing the research agent...");

    // --- 3. Initialize the Agent ---
    let agent: Arc<dyn AgentClient> = Arc::new(
        GatewayAgent::new(&config.gateway_settings())
            .context("Failed to construct the research agent")?,
    );
    let app_state = Arc::new(AppState::new(agent));

    // --- 4. Create Router and Apply Middleware ---
    let app = create_router(app_state).layer(cors_layer(&config.frontend_origin));

    // --- 5. Start Server ---
    info!(
        model = %config.model_id,
        context_window = config.context_window,
        frontend_origin = ?config.frontend_origin,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
