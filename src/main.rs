//! Faucet relayer entrypoint.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use faucet_relayer::blockchain::wallet::PRIVATE_KEY_ENV_VAR;
use faucet_relayer::config::{load_config, RelayerConfig};
use faucet_relayer::observability::metrics;
use faucet_relayer::{NetworkRegistry, RelayerServer};

#[derive(Debug, Parser)]
#[command(name = "faucet-relayer", about = "Token-faucet relayer service")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "relayer.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faucet_relayer=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("faucet-relayer v{} starting", env!("CARGO_PKG_VERSION"));

    let config = if cli.config.exists() {
        load_config(&cli.config)?
    } else {
        tracing::warn!(path = %cli.config.display(), "Config file not found, using defaults");
        RelayerConfig::default()
    };

    if config.networks.is_empty() {
        return Err("no networks configured; add [[networks]] entries to the config".into());
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        networks = config.networks.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).ok();
    if private_key.is_none() {
        tracing::warn!(
            "{} not set! The server will not be able to send transactions.",
            PRIVATE_KEY_ENV_VAR
        );
    }

    let registry = Arc::new(NetworkRegistry::from_config(&config, private_key.as_deref()).await?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = RelayerServer::new(&config, registry);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
