mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod shared_state;
mod config;

use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::routes::simulation_routes::app;
use crate::shared_state::{AppState, SharedState};

#[tokio::main]
async fn main() {
    // 1. Logging (RUST_LOG, default info)
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install log subscriber: {}", e);
    }

    // 2. Load configuration
    let config = match Config::load("config.json") {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config.json: {}", e);
            return;
        }
    };
    info!(
        "Configuration loaded: DLI target {} (LED) / {} (Hybrid) mol/m²/day",
        config.defaults.led.common.dli_target, config.defaults.hybrid.common.dli_target
    );

    // 3. Shared state
    let shared = SharedState {
        app: AppState::new(),
        config: config.clone(),
    };

    // 4. Start Axum HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("API Server listening on http://{}", addr);
    info!("Scalar UI: http://{}/scalar", addr);

    if let Err(e) = axum_server::bind(addr)
        .serve(app(shared).into_make_service())
        .await
    {
        error!("HTTP server error: {}", e);
    }
}
