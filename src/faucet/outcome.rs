//! Claim outcomes.
//!
//! Every claim is fully accepted or fully rejected in one pass; there are
//! no partial or retriable states. Rejections carry a stable machine code,
//! an HTTP status, and enough diagnostic context for the caller to
//! self-correct without leaking anything that would help forge a signature.

use alloy::primitives::{Address, B256, TxHash, U256};
use thiserror::Error;

use crate::blockchain::ChainError;

/// Why a claim was rejected.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Invalid field {field}: {detail}")]
    InvalidField { field: &'static str, detail: String },

    #[error("Invalid network: {0}")]
    InvalidNetwork(String),

    #[error("Network {0} is not available")]
    NetworkUnavailable(String),

    #[error("Invalid Ethereum address format: {0}")]
    InvalidAddress(String),

    #[error("Invalid signature components format: {detail}")]
    InvalidSignatureFormat { detail: String },

    #[error("Faucet is empty")]
    FaucetEmpty,

    #[error("Global cooldown active: {seconds_remaining} seconds remaining")]
    CooldownActive { seconds_remaining: u64 },

    #[error("User has already withdrawn")]
    AlreadyWithdrawn { count: u64 },

    #[error("Insufficient faucet balance")]
    InsufficientBalance { available: U256, required: U256 },

    #[error("Incorrect message")]
    MessageMismatch { expected: String, got: String },

    #[error("Daily withdrawal limit reached; resets in {seconds_until_reset} seconds")]
    DailyLimitReached { seconds_until_reset: u64 },

    #[error("Invalid withdrawal index: expected {expected}, got {got}")]
    InvalidIndex { expected: u64, got: u64 },

    #[error("Nonce mismatch: expected {expected}, got {got}")]
    NonceMismatch { expected: u64, got: u64 },

    #[error("Signature verification failed")]
    BadSignature,

    #[error("Contract check failed: {0}")]
    ChainRead(#[from] ChainError),

    #[error("Relayer account underfunded: balance {balance} below reserve {required}")]
    InsufficientRelayerFunds {
        relayer: Address,
        balance: U256,
        required: U256,
    },

    #[error("Server configuration error: missing relayer private key")]
    RelayerNotConfigured,

    #[error("Transaction failed: {0}")]
    SubmissionFailed(String),
}

impl Rejection {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::MissingField { .. } => "missing_field",
            Rejection::InvalidField { .. } => "invalid_field",
            Rejection::InvalidNetwork(_) => "invalid_network",
            Rejection::NetworkUnavailable(_) => "network_unavailable",
            Rejection::InvalidAddress(_) => "invalid_address",
            Rejection::InvalidSignatureFormat { .. } => "invalid_signature_format",
            Rejection::FaucetEmpty => "faucet_empty",
            Rejection::CooldownActive { .. } => "cooldown_active",
            Rejection::AlreadyWithdrawn { .. } => "already_withdrawn",
            Rejection::InsufficientBalance { .. } => "insufficient_balance",
            Rejection::MessageMismatch { .. } => "message_mismatch",
            Rejection::DailyLimitReached { .. } => "daily_limit_reached",
            Rejection::InvalidIndex { .. } => "invalid_index",
            Rejection::NonceMismatch { .. } => "nonce_mismatch",
            Rejection::BadSignature => "bad_signature",
            Rejection::ChainRead(_) => "chain_read_failed",
            Rejection::InsufficientRelayerFunds { .. } => "insufficient_relayer_funds",
            Rejection::RelayerNotConfigured => "server_misconfigured",
            Rejection::SubmissionFailed(_) => "submission_failed",
        }
    }

    /// HTTP status for the rejection.
    ///
    /// Validation, business-rule, and authorization failures are the
    /// caller's problem (400). An unreachable network is 503. Anything the
    /// operator has to fix is 500.
    pub fn http_status(&self) -> u16 {
        match self {
            Rejection::NetworkUnavailable(_) => 503,
            Rejection::ChainRead(_)
            | Rejection::InsufficientRelayerFunds { .. }
            | Rejection::RelayerNotConfigured
            | Rejection::SubmissionFailed(_) => 500,
            _ => 400,
        }
    }

    /// Extra diagnostic fields echoed back in the error response body.
    ///
    /// Nonce state is public on-chain, so both values may be returned. For
    /// a bad signature no detail is revealed beyond the fact of failure.
    pub fn details(&self) -> serde_json::Value {
        match self {
            Rejection::MissingField { field } | Rejection::InvalidField { field, .. } => {
                serde_json::json!({ "field": field })
            }
            Rejection::AlreadyWithdrawn { count } => {
                serde_json::json!({ "withdrawal_count": count })
            }
            Rejection::InsufficientBalance {
                available,
                required,
            } => serde_json::json!({
                "available": available.to_string(),
                "required": required.to_string(),
            }),
            Rejection::MessageMismatch { expected, got } => serde_json::json!({
                "expected_message": expected,
                "provided_message": got,
            }),
            Rejection::DailyLimitReached { seconds_until_reset } => {
                serde_json::json!({ "seconds_until_reset": seconds_until_reset })
            }
            Rejection::CooldownActive { seconds_remaining } => {
                serde_json::json!({ "seconds_remaining": seconds_remaining })
            }
            Rejection::InvalidIndex { expected, got } => serde_json::json!({
                "expected_index": expected,
                "provided_index": got,
            }),
            Rejection::NonceMismatch { expected, got } => serde_json::json!({
                "expected_nonce": expected,
                "provided_nonce": got,
            }),
            Rejection::InsufficientRelayerFunds {
                relayer,
                balance,
                required,
            } => serde_json::json!({
                "relayer_address": relayer.to_string(),
                "relayer_balance": balance.to_string(),
                "required_reserve": required.to_string(),
            }),
            _ => serde_json::Value::Null,
        }
    }
}

/// The exact on-chain call an accepted claim maps to.
#[derive(Debug, Clone)]
pub enum WithdrawalCall {
    Classic {
        v: u8,
        r: B256,
        s: B256,
        message: String,
    },
    ProofOfWork {
        chosen_block_hash: B256,
        withdrawal_index: u64,
        ip_address: B256,
        pow_nonce: u64,
        message: String,
        v: u8,
        r: B256,
        s: B256,
    },
}

/// An accepted claim, ready for submission.
///
/// `recipient` is the address recovered from the signature, not the
/// caller-supplied one, so the on-chain recipient always matches the
/// cryptographic signer.
#[derive(Debug, Clone)]
pub struct AcceptedWithdrawal {
    pub recipient: Address,
    pub call: WithdrawalCall,
}

/// Successful submission result.
#[derive(Debug, Clone, Copy)]
pub struct SubmittedWithdrawal {
    pub tx_hash: TxHash,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Rejection::MissingField { field: "v" }.http_status(), 400);
        assert_eq!(Rejection::BadSignature.http_status(), 400);
        assert_eq!(
            Rejection::NetworkUnavailable("sepolia".into()).http_status(),
            503
        );
        assert_eq!(
            Rejection::SubmissionFailed("nonce too low".into()).http_status(),
            500
        );
        assert_eq!(
            Rejection::ChainRead(ChainError::Rpc("boom".into())).http_status(),
            500
        );
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(Rejection::FaucetEmpty.code(), "faucet_empty");
        assert_eq!(
            Rejection::NonceMismatch { expected: 3, got: 2 }.code(),
            "nonce_mismatch"
        );
        assert_eq!(
            Rejection::InvalidIndex { expected: 2, got: 3 }.code(),
            "invalid_index"
        );
    }

    #[test]
    fn test_index_details_echo_both_values() {
        let details = Rejection::InvalidIndex { expected: 2, got: 3 }.details();
        assert_eq!(details["expected_index"], 2);
        assert_eq!(details["provided_index"], 3);
    }

    #[test]
    fn test_bad_signature_reveals_nothing() {
        assert!(Rejection::BadSignature.details().is_null());
    }
}
