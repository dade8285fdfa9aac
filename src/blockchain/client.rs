//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to a JSON-RPC endpoint
//! - Query chain state (block number, balances, nonces, bytecode)
//! - Handle timeouts and network errors gracefully
//! - Provide health check for blockchain connectivity
//!
//! Every read goes through a bounded timeout with a single retry for
//! transient failures. Transaction broadcast is never retried; a duplicate
//! broadcast is worse than a reported failure.

use std::future::Future;
use std::time::Duration;

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use tokio::time::timeout;

use crate::blockchain::types::{ChainError, ChainId, ChainResult};

/// Blockchain RPC client wrapper.
#[derive(Clone)]
pub struct ChainClient {
    provider: DynProvider,
    rpc_url: String,
    chain_id: u64,
    timeout_duration: Duration,
}

impl ChainClient {
    /// Connect to an RPC endpoint.
    ///
    /// Connection is lazy; this fails only on an unparseable URL. Use
    /// [`ChainClient::verify_chain_id`] to probe actual connectivity.
    pub fn connect(rpc_url: &str, chain_id: u64, timeout_secs: u64) -> ChainResult<Self> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| ChainError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;

        let provider: DynProvider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
            chain_id,
            timeout_duration: Duration::from_secs(timeout_secs),
        })
    }

    /// Run an RPC operation with a bounded timeout and a single retry.
    ///
    /// The closure is re-invoked for the retry so the underlying request is
    /// rebuilt fresh.
    pub async fn view<T, E, F, Fut>(&self, op: &'static str, f: F) -> ChainResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut last_err = ChainError::Rpc(format!("{}: not attempted", op));
        for attempt in 0..2u8 {
            match timeout(self.timeout_duration, f()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => {
                    if attempt == 0 {
                        tracing::warn!(op, error = %e, "RPC error, retrying once");
                    }
                    last_err = ChainError::Rpc(format!("{}: {}", op, e));
                }
                Err(_) => {
                    if attempt == 0 {
                        tracing::warn!(op, "RPC timeout, retrying once");
                    }
                    last_err = ChainError::Timeout {
                        op,
                        secs: self.timeout_duration.as_secs(),
                    };
                }
            }
        }
        Err(last_err)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> ChainResult<()> {
        let actual = self.get_chain_id().await?;
        if actual.0 != self.chain_id {
            return Err(ChainError::ChainMismatch {
                expected: self.chain_id,
                actual: actual.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> ChainResult<ChainId> {
        self.view("get_chain_id", || async {
            self.provider.get_chain_id().await
        })
        .await
        .map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> ChainResult<u64> {
        self.view("get_block_number", || async {
            self.provider.get_block_number().await
        })
        .await
    }

    /// Get the timestamp of the latest block.
    ///
    /// Business rules depend on chain time, not wall-clock server time.
    pub async fn get_block_timestamp(&self) -> ChainResult<u64> {
        let block = self
            .view("get_block_by_number", || async {
                self.provider
                    .get_block_by_number(BlockNumberOrTag::Latest)
                    .await
            })
            .await?;

        let block = block.ok_or_else(|| ChainError::Rpc("latest block not available".into()))?;
        Ok(block.header.timestamp)
    }

    /// Get the native balance of an address.
    pub async fn get_balance(&self, address: Address) -> ChainResult<U256> {
        self.view("get_balance", || async {
            self.provider.get_balance(address).await
        })
        .await
    }

    /// Get the transaction count (account nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> ChainResult<u64> {
        self.view("get_transaction_count", || async {
            self.provider.get_transaction_count(address).await
        })
        .await
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> ChainResult<u128> {
        self.view("get_gas_price", || async {
            self.provider.get_gas_price().await
        })
        .await
    }

    /// Get the deployed bytecode at an address.
    pub async fn get_code(&self, address: Address) -> ChainResult<Bytes> {
        self.view("get_code_at", || async {
            self.provider.get_code_at(address).await
        })
        .await
    }

    /// Broadcast a signed raw transaction and return its hash.
    ///
    /// Deliberately not retried: a timed-out broadcast may still land, and
    /// a second attempt would either double-submit or burn the nonce. The
    /// caller reports the failure for manual reconciliation instead.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> ChainResult<TxHash> {
        match timeout(self.timeout_duration, self.provider.send_raw_transaction(raw)).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(ChainError::Rpc(format!("send_raw_transaction: {}", e))),
            Err(_) => Err(ChainError::Timeout {
                op: "send_raw_transaction",
                secs: self.timeout_duration.as_secs(),
            }),
        }
    }

    /// Get a handle to the underlying provider for contract bindings.
    pub fn provider(&self) -> DynProvider {
        self.provider.clone()
    }

    /// Configured chain ID.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Configured RPC endpoint.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id)
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}
