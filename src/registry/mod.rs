//! Network registry.
//!
//! Static mapping from network identifier to chain client, contract
//! addresses, and faucet variant. Built once at startup from validated
//! configuration and shared immutably via `Arc`; no ambient globals.
//!
//! Networks whose RPC endpoint fails the initial connectivity probe stay
//! registered but are marked unavailable, so requests for them get a
//! distinct `network_unavailable` outcome instead of vanishing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy::primitives::Address;
use tokio::sync::Mutex;

use crate::blockchain::{ChainClient, ChainError, ChainResult, Wallet};
use crate::config::{FaucetVariant, NetworkConfig, RelayerConfig};

/// Everything the pipeline needs to serve one network.
#[derive(Debug)]
pub struct NetworkHandle {
    config: NetworkConfig,
    client: ChainClient,
    faucet_address: Address,
    backend_address: Address,
    wallet: Option<Wallet>,
    available: AtomicBool,
    /// Serializes nonce fetch → sign → broadcast per network so concurrent
    /// accepted claims cannot race on the relayer account nonce.
    submission_lock: Mutex<()>,
}

impl NetworkHandle {
    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn client(&self) -> &ChainClient {
        &self.client
    }

    pub fn faucet_address(&self) -> Address {
        self.faucet_address
    }

    pub fn backend_address(&self) -> Address {
        self.backend_address
    }

    pub fn variant(&self) -> FaucetVariant {
        self.config.variant
    }

    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    /// The relayer wallet, if a private key was configured.
    pub fn wallet(&self) -> Option<&Wallet> {
        self.wallet.as_ref()
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Relaxed);
    }

    /// Lock guarding the submission critical section.
    pub fn submission_lock(&self) -> &Mutex<()> {
        &self.submission_lock
    }
}

/// Handles are identified by their network id, which is the unique key in
/// the registry map.
impl PartialEq for NetworkHandle {
    fn eq(&self, other: &Self) -> bool {
        self.config.id == other.config.id
    }
}

/// Immutable-after-init registry of network handles.
#[derive(Debug)]
pub struct NetworkRegistry {
    networks: HashMap<String, Arc<NetworkHandle>>,
}

/// Why a network id could not be resolved to a live handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The id is not configured at all.
    Unknown(String),
    /// The id is configured but its RPC endpoint is not reachable.
    Unavailable(String),
}

impl NetworkRegistry {
    /// Build the registry from validated configuration.
    ///
    /// Probes each network's RPC endpoint once; unreachable networks are
    /// kept but flagged. Fails only when no network at all is reachable,
    /// matching the startup contract of the service.
    pub async fn from_config(
        config: &RelayerConfig,
        private_key: Option<&str>,
    ) -> ChainResult<Self> {
        let mut networks = HashMap::new();

        for network in &config.networks {
            let client =
                ChainClient::connect(&network.rpc_url, network.chain_id, config.rpc.timeout_secs)?;

            // Addresses were validated with the config; parse failures here
            // mean the validation step was skipped.
            let faucet_address: Address = network.faucet_address.parse().map_err(|e| {
                ChainError::Rpc(format!(
                    "invalid faucet address for {}: {}",
                    network.id, e
                ))
            })?;
            let backend_address: Address = network.backend_address.parse().map_err(|e| {
                ChainError::Rpc(format!(
                    "invalid backend address for {}: {}",
                    network.id, e
                ))
            })?;

            let wallet = match private_key {
                Some(key) => Some(Wallet::from_private_key(key, network.chain_id)?),
                None => None,
            };

            let available = match client.verify_chain_id().await {
                Ok(()) => {
                    tracing::info!(network = %network.id, chain_id = network.chain_id, "Connected to RPC");
                    true
                }
                Err(e) => {
                    tracing::warn!(network = %network.id, error = %e, "RPC probe failed, network marked unavailable");
                    false
                }
            };

            networks.insert(
                network.id.clone(),
                Arc::new(NetworkHandle {
                    config: network.clone(),
                    client,
                    faucet_address,
                    backend_address,
                    wallet,
                    available: AtomicBool::new(available),
                    submission_lock: Mutex::new(()),
                }),
            );
        }

        let registry = Self { networks };
        if !registry.networks.is_empty() && registry.iter().all(|h| !h.is_available()) {
            return Err(ChainError::Rpc(
                "no RPC connections available; refusing to start".into(),
            ));
        }
        Ok(registry)
    }

    /// Resolve a network id to a live handle.
    pub fn resolve(&self, id: &str) -> Result<Arc<NetworkHandle>, ResolveError> {
        match self.networks.get(id) {
            None => Err(ResolveError::Unknown(id.to_string())),
            Some(handle) if !handle.is_available() => {
                Err(ResolveError::Unavailable(id.to_string()))
            }
            Some(handle) => Ok(handle.clone()),
        }
    }

    /// Iterate over all configured networks, available or not.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<NetworkHandle>> {
        self.networks.values()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}
