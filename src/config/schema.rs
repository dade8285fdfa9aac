//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relayer.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the faucet relayer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayerConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Supported networks, one entry per chain.
    pub networks: Vec<NetworkConfig>,

    /// RPC client settings shared by all networks.
    pub rpc: RpcConfig,

    /// Gas pricing and limits for submitted transactions.
    pub gas: GasConfig,

    /// Withdrawal business rules.
    pub withdrawal: WithdrawalConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Which faucet protocol a network speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaucetVariant {
    /// Single-shot EIP-712 faucet: one withdrawal per address, fixed amount.
    Classic,
    /// Dev faucet: up to eight withdrawals per rolling 24h window, each
    /// gated by a proof-of-work solution that the contract verifies.
    ProofOfWork,
}

/// Per-network configuration. Immutable after startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Network identifier used in request payloads (e.g., "sepolia").
    pub id: String,

    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID (e.g., 11155111 for Sepolia).
    pub chain_id: u64,

    /// Address of the faucet contract holding the distributable balance.
    pub faucet_address: String,

    /// Address of the backend contract the relayer calls.
    pub backend_address: String,

    /// Faucet protocol variant.
    pub variant: FaucetVariant,
}

/// RPC client settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Gas pricing and limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GasConfig {
    /// Floor for the gas price in gwei. The submitted price is the maximum
    /// of the network's reported price and this floor.
    pub min_gas_price_gwei: u64,

    /// Fixed gas limit for classic faucet withdrawals.
    pub classic_gas_limit: u64,

    /// Fixed gas limit for proof-of-work faucet withdrawals (more call
    /// arguments, so a higher ceiling).
    pub pow_gas_limit: u64,

    /// Minimum relayer balance in wei required before attempting a
    /// transaction.
    pub relayer_gas_reserve_wei: u128,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            min_gas_price_gwei: 50,
            classic_gas_limit: 200_000,
            pow_gas_limit: 400_000,
            // 0.01 token
            relayer_gas_reserve_wei: 10_000_000_000_000_000,
        }
    }
}

/// Withdrawal business rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WithdrawalConfig {
    /// Fixed withdrawal amount in wei for the classic variant.
    pub classic_amount_wei: u128,

    /// Maximum withdrawals per rolling window (proof-of-work variant).
    pub daily_limit: u64,

    /// Rolling window length in seconds.
    pub window_secs: u64,
}

impl Default for WithdrawalConfig {
    fn default() -> Self {
        Self {
            // 0.1 token
            classic_amount_wei: 100_000_000_000_000_000,
            daily_limit: 8,
            window_secs: 86_400,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
