//! Faucet Relayer Service
//!
//! A relayer backend for a token-faucet protocol: users present an EIP-712
//! authorization (plus a proof-of-work solution on dev faucets) and the
//! relayer validates the claim off-chain, then submits the withdrawal
//! transaction on their behalf, paying gas itself.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌────────────────────────────────────────────────┐
//!                   │                 FAUCET RELAYER                  │
//!                   │                                                 │
//!   Claim (JSON)    │  ┌──────┐   ┌─────────┐   ┌──────────────┐     │
//!   ────────────────┼─▶│ http │──▶│registry │──▶│   validator  │     │
//!                   │  └──────┘   └─────────┘   └──────┬───────┘     │
//!                   │                                   │             │
//!                   │                                   ▼             │
//!                   │                           ┌──────────────┐     │
//!                   │                           │   verifier   │     │
//!                   │                           │  (EIP-712)   │     │
//!                   │                           └──────┬───────┘     │
//!                   │                                   │             │
//!   Tx hash         │  ┌──────────┐   ┌───────────┐    ▼             │
//!   ◀───────────────┼──│blockchain│◀──│ submitter │◀────┘            │
//!                   │  │  client  │   └───────────┘                  │
//!                   │  └──────────┘                                  │
//!                   │                                                 │
//!                   │  ┌───────────────────────────────────────────┐ │
//!                   │  │          Cross-Cutting Concerns            │ │
//!                   │  │  ┌────────┐ ┌───────────────┐              │ │
//!                   │  │  │ config │ │ observability │              │ │
//!                   │  │  └────────┘ └───────────────┘              │ │
//!                   │  └───────────────────────────────────────────┘ │
//!                   └────────────────────────────────────────────────┘
//! ```
//!
//! All faucet state lives on-chain; the service holds nothing between
//! requests except the network registry built at startup.

pub mod blockchain;
pub mod config;
pub mod faucet;
pub mod http;
pub mod observability;
pub mod registry;

pub use config::RelayerConfig;
pub use http::RelayerServer;
pub use registry::NetworkRegistry;
