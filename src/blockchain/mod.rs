//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key)
//!     → wallet.rs (key loading, signing)
//!     → client.rs (RPC connection with timeouts)
//!     → contracts.rs (typed contract bindings, EIP-712 domains)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have a bounded timeout and at most one retry
//! - Broadcasts are never retried automatically

pub mod client;
pub mod contracts;
pub mod types;
pub mod wallet;

pub use client::ChainClient;
pub use types::{ChainError, ChainId, ChainResult};
pub use wallet::Wallet;
