//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check network entries are internally consistent (unique ids, parseable
//!   addresses and RPC URLs, sane chain ids)
//! - Validate value ranges (timeouts > 0, gas limits > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use alloy::primitives::Address;

use crate::config::schema::RelayerConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration. Collects every error instead of
/// stopping at the first.
pub fn validate_config(config: &RelayerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "listener.request_timeout_secs".into(),
            message: "must be greater than zero".into(),
        });
    }
    if config.rpc.timeout_secs == 0 {
        errors.push(ValidationError {
            field: "rpc.timeout_secs".into(),
            message: "must be greater than zero".into(),
        });
    }
    if config.gas.classic_gas_limit == 0 || config.gas.pow_gas_limit == 0 {
        errors.push(ValidationError {
            field: "gas".into(),
            message: "gas limits must be greater than zero".into(),
        });
    }
    if config.withdrawal.daily_limit == 0 {
        errors.push(ValidationError {
            field: "withdrawal.daily_limit".into(),
            message: "must be greater than zero".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for network in &config.networks {
        let prefix = format!("networks.{}", network.id);

        if !seen_ids.insert(network.id.clone()) {
            errors.push(ValidationError {
                field: prefix.clone(),
                message: "duplicate network id".into(),
            });
        }
        if network.rpc_url.parse::<url::Url>().is_err() {
            errors.push(ValidationError {
                field: format!("{}.rpc_url", prefix),
                message: format!("invalid URL: {}", network.rpc_url),
            });
        }
        if network.chain_id == 0 {
            errors.push(ValidationError {
                field: format!("{}.chain_id", prefix),
                message: "must be greater than zero".into(),
            });
        }
        if network.faucet_address.parse::<Address>().is_err() {
            errors.push(ValidationError {
                field: format!("{}.faucet_address", prefix),
                message: format!("not a valid address: {}", network.faucet_address),
            });
        }
        if network.backend_address.parse::<Address>().is_err() {
            errors.push(ValidationError {
                field: format!("{}.backend_address", prefix),
                message: format!("not a valid address: {}", network.backend_address),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{FaucetVariant, NetworkConfig};

    fn valid_network() -> NetworkConfig {
        NetworkConfig {
            id: "sepolia".into(),
            rpc_url: "https://sepolia-rpc.scroll.io".into(),
            chain_id: 11155111,
            faucet_address: "0x6792e2DeA462E744E28D04d701F6C7505009ea1c".into(),
            backend_address: "0xD2D8cbbb093042EDFd47C78cC09C425ceBD3B19E".into(),
            variant: FaucetVariant::Classic,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let mut config = RelayerConfig::default();
        config.networks.push(valid_network());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_bad_address_rejected() {
        let mut config = RelayerConfig::default();
        let mut network = valid_network();
        network.faucet_address = "0xYourFaucetAddress".into();
        config.networks.push(network);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].field.contains("faucet_address"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut config = RelayerConfig::default();
        config.networks.push(valid_network());
        config.networks.push(valid_network());

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("duplicate")));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RelayerConfig::default();
        config.rpc.timeout_secs = 0;
        let mut network = valid_network();
        network.rpc_url = "not a url".into();
        network.chain_id = 0;
        config.networks.push(network);

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
