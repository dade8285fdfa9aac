//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, CORS)
//! - Bind server to listener with graceful shutdown
//!
//! CORS is permissive: the API is consumed by a browser UI served from a
//! different origin, and every endpoint is either public chain state or a
//! claim that carries its own cryptographic authorization.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{GasConfig, RelayerConfig, WithdrawalConfig};
use crate::http::handlers;
use crate::registry::NetworkRegistry;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<NetworkRegistry>,
    pub gas: GasConfig,
    pub withdrawal: WithdrawalConfig,
}

/// HTTP server for the relayer.
pub struct RelayerServer {
    router: Router,
}

impl RelayerServer {
    /// Create a new server over an initialized network registry.
    pub fn new(config: &RelayerConfig, registry: Arc<NetworkRegistry>) -> Self {
        let state = AppState {
            registry,
            gas: config.gas.clone(),
            withdrawal: config.withdrawal.clone(),
        };

        let router = Router::new()
            .route("/request-withdrawal", post(handlers::request_withdrawal))
            .route("/status", get(handlers::status))
            .route("/verify-contracts", get(handlers::verify_contracts))
            .route("/server-account", get(handlers::server_account))
            .route("/check-ownership", get(handlers::check_ownership))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http());

        Self { router }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to install Ctrl+C handler");
    }
    tracing::info!("Shutdown signal received");
}
