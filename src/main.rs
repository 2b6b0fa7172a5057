mod backend;
mod catalog;
mod config;
mod error;
mod grid;
mod registry;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::backend::http::HttpCatalogClient;
use crate::config::BoardConfig;
use crate::services::board::BoardController;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BoardConfig::from_env().expect("invalid configuration");
    let client = HttpCatalogClient::new(&config.catalog).expect("catalog client init failed");
    tracing::info!(base_url = %config.catalog.base_url, "catalog backend configured");

    let board = BoardController::new(config.grid, config.start_muted);
    let state = state::AppState::new(board, Arc::new(client));

    // Initial load; a down backend leaves an empty catalog and a notice.
    if let Err(e) = services::catalog::refresh(&state).await {
        tracing::warn!(error = %e, "initial catalog load failed");
    }

    let port = config.port;
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "tileboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
