//! Withdrawal claim payloads.
//!
//! A raw claim is whatever JSON the UI posted; required fields depend on
//! the network's faucet variant, so presence checks happen after network
//! resolution. Typed claims are immutable once constructed.

use alloy::primitives::B256;
use serde::Deserialize;

use crate::faucet::outcome::Rejection;

/// Raw request body for `POST /request-withdrawal`. Every field optional;
/// the variant decides which are required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWithdrawalClaim {
    pub network: Option<String>,
    pub user_address: Option<String>,
    pub message: Option<String>,
    pub v: Option<u64>,
    pub r: Option<String>,
    pub s: Option<String>,

    // Proof-of-work variant only.
    pub chosen_block_hash: Option<String>,
    pub withdrawal_index: Option<u64>,
    pub ip_address: Option<String>,
    /// Anti-replay nonce the user signed over. Distinct from `pow_nonce`.
    pub nonce: Option<u64>,
    /// Proof-of-work mining nonce. Verified by the contract, not here.
    pub pow_nonce: Option<u64>,
}

/// Split ECDSA signature as submitted by the caller.
#[derive(Debug, Clone)]
pub struct SignatureParts {
    pub v: u64,
    pub r: String,
    pub s: String,
}

impl SignatureParts {
    /// Check the syntactic shape: v ∈ {27, 28}; r and s are 0x-prefixed
    /// 32-byte hex values (66 characters total).
    pub fn validate_shape(&self) -> Result<(), Rejection> {
        if self.v != 27 && self.v != 28 {
            return Err(Rejection::InvalidSignatureFormat {
                detail: format!("v must be 27 or 28, got {}", self.v),
            });
        }
        for (name, value) in [("r", &self.r), ("s", &self.s)] {
            if value.len() != 66 || !value.starts_with("0x") {
                return Err(Rejection::InvalidSignatureFormat {
                    detail: format!(
                        "{} must be a 0x-prefixed 32-byte hex value, got {} characters",
                        name,
                        value.len()
                    ),
                });
            }
            if value[2..].chars().any(|c| !c.is_ascii_hexdigit()) {
                return Err(Rejection::InvalidSignatureFormat {
                    detail: format!("{} contains non-hex characters", name),
                });
            }
        }
        Ok(())
    }

    /// v as the 27/28 recovery byte, narrowed after shape validation.
    pub fn v_byte(&self) -> u8 {
        self.v as u8
    }

    pub fn r_bytes(&self) -> Result<B256, Rejection> {
        self.r
            .parse()
            .map_err(|_| Rejection::InvalidSignatureFormat {
                detail: "r is not valid hex".into(),
            })
    }

    pub fn s_bytes(&self) -> Result<B256, Rejection> {
        self.s
            .parse()
            .map_err(|_| Rejection::InvalidSignatureFormat {
                detail: "s is not valid hex".into(),
            })
    }
}

/// Typed claim for the classic single-shot faucet.
#[derive(Debug, Clone)]
pub struct ClassicClaim {
    pub user_address: String,
    pub message: String,
    pub signature: SignatureParts,
}

impl ClassicClaim {
    pub fn from_raw(raw: &RawWithdrawalClaim) -> Result<Self, Rejection> {
        Ok(Self {
            user_address: require(&raw.user_address, "user_address")?.clone(),
            message: require(&raw.message, "message")?.clone(),
            signature: SignatureParts {
                v: *require(&raw.v, "v")?,
                r: require(&raw.r, "r")?.clone(),
                s: require(&raw.s, "s")?.clone(),
            },
        })
    }
}

/// Typed claim for the proof-of-work dev faucet.
#[derive(Debug, Clone)]
pub struct PowClaim {
    pub user_address: String,
    pub message: String,
    pub signature: SignatureParts,
    pub chosen_block_hash: String,
    pub withdrawal_index: u64,
    pub ip_address: String,
    /// Anti-replay nonce; must equal the contract's stored nonce.
    pub nonce: u64,
    /// Mining nonce; passed through to the contract.
    pub pow_nonce: u64,
}

impl PowClaim {
    pub fn from_raw(raw: &RawWithdrawalClaim) -> Result<Self, Rejection> {
        Ok(Self {
            user_address: require(&raw.user_address, "user_address")?.clone(),
            message: require(&raw.message, "message")?.clone(),
            signature: SignatureParts {
                v: *require(&raw.v, "v")?,
                r: require(&raw.r, "r")?.clone(),
                s: require(&raw.s, "s")?.clone(),
            },
            chosen_block_hash: require(&raw.chosen_block_hash, "chosen_block_hash")?.clone(),
            withdrawal_index: *require(&raw.withdrawal_index, "withdrawal_index")?,
            ip_address: require(&raw.ip_address, "ip_address")?.clone(),
            nonce: *require(&raw.nonce, "nonce")?,
            pow_nonce: *require(&raw.pow_nonce, "pow_nonce")?,
        })
    }

    pub fn chosen_block_hash_bytes(&self) -> Result<B256, Rejection> {
        parse_b256(&self.chosen_block_hash, "chosen_block_hash")
    }

    pub fn ip_address_bytes(&self) -> Result<B256, Rejection> {
        parse_b256(&self.ip_address, "ip_address")
    }
}

fn require<'a, T>(field: &'a Option<T>, name: &'static str) -> Result<&'a T, Rejection> {
    field.as_ref().ok_or(Rejection::MissingField { field: name })
}

fn parse_b256(value: &str, field: &'static str) -> Result<B256, Rejection> {
    value.parse().map_err(|_| Rejection::InvalidField {
        field,
        detail: format!("expected a 0x-prefixed 32-byte hex value, got '{}'", value),
    })
}
