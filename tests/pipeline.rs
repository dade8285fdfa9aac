//! End-to-end tests for the claim pipeline that need no live chain:
//! payload parsing, signature recovery, window accounting, gas math, and
//! configuration loading.

use alloy::primitives::{Address, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use faucet_relayer::config::{load_config, FaucetVariant, GasConfig, RelayerConfig, WithdrawalConfig};
use faucet_relayer::faucet::claim::{ClassicClaim, PowClaim, RawWithdrawalClaim, SignatureParts};
use faucet_relayer::faucet::outcome::{Rejection, WithdrawalCall};
use faucet_relayer::faucet::submitter::{effective_gas_price, estimate_tx_capacity};
use faucet_relayer::faucet::validator::{decide_pow, effective_withdrawal_count, PowFaucetState};
use faucet_relayer::faucet::verifier::{classic_signing_hash, pow_signing_hash, recover_signer};

const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn faucet_address() -> Address {
    "0xf0D4061DB5330a3785DCb0705eE0565338311d4B"
        .parse()
        .unwrap()
}

fn signer() -> PrivateKeySigner {
    TEST_PRIVATE_KEY.parse().unwrap()
}

fn sign(digest: B256) -> SignatureParts {
    let sig = signer().sign_hash_sync(&digest).unwrap();
    SignatureParts {
        v: if sig.v() { 28 } else { 27 },
        r: format!("0x{:064x}", sig.r()),
        s: format!("0x{:064x}", sig.s()),
    }
}

fn hex64() -> String {
    format!("0x{}", "ab".repeat(32))
}

#[test]
fn test_classic_claim_signed_by_user_recovers_user() {
    let user = signer().address();
    let digest = classic_signing_hash(11155111, faucet_address(), user, U256::ZERO, "gm faucet");
    let parts = sign(digest);

    let raw = RawWithdrawalClaim {
        network: Some("sepolia".into()),
        user_address: Some(format!("{:?}", user)),
        message: Some("gm faucet".into()),
        v: Some(parts.v),
        r: Some(parts.r.clone()),
        s: Some(parts.s.clone()),
        ..Default::default()
    };

    let claim = ClassicClaim::from_raw(&raw).unwrap();
    claim.signature.validate_shape().unwrap();
    assert_eq!(recover_signer(digest, &claim.signature).unwrap(), user);
}

#[test]
fn test_signature_over_different_chain_does_not_recover_user() {
    let user = signer().address();
    let digest = classic_signing_hash(11155111, faucet_address(), user, U256::ZERO, "gm");
    let parts = sign(digest);

    // Same payload bound to another chain id produces a different digest,
    // so replaying the signature there recovers a different address.
    let other = classic_signing_hash(1, faucet_address(), user, U256::ZERO, "gm");
    assert_ne!(digest, other);
    assert_ne!(recover_signer(other, &parts).unwrap(), user);
}

#[test]
fn test_pow_digest_binds_every_field() {
    let user = signer().address();
    let base = pow_signing_hash(
        69000,
        faucet_address(),
        user,
        B256::repeat_byte(0x11),
        1,
        B256::repeat_byte(0x22),
        0,
        "gm",
    );

    let changed_index = pow_signing_hash(
        69000,
        faucet_address(),
        user,
        B256::repeat_byte(0x11),
        2,
        B256::repeat_byte(0x22),
        0,
        "gm",
    );
    let changed_ip = pow_signing_hash(
        69000,
        faucet_address(),
        user,
        B256::repeat_byte(0x11),
        1,
        B256::repeat_byte(0x33),
        0,
        "gm",
    );
    assert_ne!(base, changed_index);
    assert_ne!(base, changed_ip);
}

#[test]
fn test_pow_claim_requires_all_variant_fields() {
    let raw = RawWithdrawalClaim {
        network: Some("devnet".into()),
        user_address: Some("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".into()),
        message: Some("gm".into()),
        v: Some(27),
        r: Some(hex64()),
        s: Some(hex64()),
        ..Default::default()
    };

    // A classic-shaped payload parses for classic but not for proof-of-work.
    assert!(ClassicClaim::from_raw(&raw).is_ok());
    match PowClaim::from_raw(&raw) {
        Err(Rejection::MissingField { field }) => assert_eq!(field, "chosen_block_hash"),
        other => panic!("expected MissingField, got {:?}", other),
    }
}

#[test]
fn test_sixty_five_char_r_is_rejected() {
    let parts = SignatureParts {
        v: 27,
        r: format!("0x{:063x}", 1),
        s: hex64(),
    };
    let err = parts.validate_shape().unwrap_err();
    assert_eq!(err.code(), "invalid_signature_format");
    assert_eq!(err.http_status(), 400);
}

#[test]
fn test_pow_pipeline_accepts_signed_claim() {
    let user = signer().address();
    let chain_id = 69000;
    let stored_nonce = 3;

    let digest = pow_signing_hash(
        chain_id,
        faucet_address(),
        user,
        B256::repeat_byte(0x11),
        1,
        B256::repeat_byte(0x22),
        stored_nonce,
        "gm",
    );
    let parts = sign(digest);

    let raw = RawWithdrawalClaim {
        network: Some("devnet".into()),
        user_address: Some(format!("{:?}", user)),
        message: Some("gm".into()),
        v: Some(parts.v),
        r: Some(parts.r),
        s: Some(parts.s),
        chosen_block_hash: Some(format!("0x{}", "11".repeat(32))),
        withdrawal_index: Some(1),
        ip_address: Some(format!("0x{}", "22".repeat(32))),
        nonce: Some(stored_nonce),
        pow_nonce: Some(987654),
    };
    let claim = PowClaim::from_raw(&raw).unwrap();
    claim.signature.validate_shape().unwrap();

    let state = PowFaucetState {
        balance: U256::from(10u64).pow(U256::from(18u64)),
        withdrawal_count: 0,
        first_request_time: 0,
        chain_now: 1_700_000_000,
        stored_nonce,
        withdrawal_amount: U256::from(10u64).pow(U256::from(16u64)),
        expected_message: "gm".into(),
    };

    let accepted = decide_pow(
        chain_id,
        faucet_address(),
        &WithdrawalConfig::default(),
        &claim,
        user,
        &state,
    )
    .unwrap();

    assert_eq!(accepted.recipient, user);
    match accepted.call {
        WithdrawalCall::ProofOfWork {
            withdrawal_index,
            pow_nonce,
            chosen_block_hash,
            ..
        } => {
            assert_eq!(withdrawal_index, 1);
            assert_eq!(pow_nonce, 987654);
            assert_eq!(chosen_block_hash, B256::repeat_byte(0x11));
        }
        other => panic!("expected proof-of-work call, got {:?}", other),
    }
}

#[test]
fn test_window_accounting() {
    let window = 86_400;

    // Never withdrawn: zero count, full window ahead.
    assert_eq!(effective_withdrawal_count(0, 0, 1_000_000, window), (0, window));

    // Mid-window: raw count stands, reset time shrinks.
    let (count, reset) = effective_withdrawal_count(3, 1_000_000, 1_000_000 + 600, window);
    assert_eq!(count, 3);
    assert_eq!(reset, window - 600);

    // Window elapsed: count resets immediately.
    assert_eq!(
        effective_withdrawal_count(8, 1_000_000, 1_000_000 + window, window),
        (0, 0)
    );
}

#[test]
fn test_gas_pricing_and_capacity() {
    let gwei = 1_000_000_000u128;
    assert_eq!(effective_gas_price(2 * gwei, 50), 50 * gwei);
    assert_eq!(effective_gas_price(75 * gwei, 50), 75 * gwei);

    // One transaction at the floor with the classic gas limit.
    let cost = U256::from(50 * gwei) * U256::from(200_000u64);
    assert_eq!(estimate_tx_capacity(cost, 50 * gwei, 200_000), 1);
    assert_eq!(
        estimate_tx_capacity(cost - U256::from(1), 50 * gwei, 200_000),
        0
    );
}

#[test]
fn test_config_round_trip_from_file() {
    let toml = r#"
[listener]
bind_address = "127.0.0.1:5000"

[[networks]]
id = "sepolia"
rpc_url = "https://rpc.sepolia.example"
chain_id = 11155111
faucet_address = "0x6792e2DeA462E744E28D04d701F6C7505009ea1c"
backend_address = "0x06Efa8188Ee3E4179c2e16F5bDF2bb383b1C3e9d"
variant = "classic"

[[networks]]
id = "devnet"
rpc_url = "http://127.0.0.1:8545"
chain_id = 69000
faucet_address = "0xf0D4061DB5330a3785DCb0705eE0565338311d4B"
backend_address = "0x6C19BBca4b515F0ee90A1ffad8dc7FAF3D9dc6dF"
variant = "proof_of_work"

[gas]
min_gas_price_gwei = 50
"#;

    let dir = std::env::temp_dir().join("faucet-relayer-test-config");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("relayer.toml");
    std::fs::write(&path, toml).unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.networks.len(), 2);
    assert_eq!(config.networks[0].variant, FaucetVariant::Classic);
    assert_eq!(config.networks[1].variant, FaucetVariant::ProofOfWork);
    assert_eq!(config.networks[1].chain_id, 69000);
    assert_eq!(config.gas.min_gas_price_gwei, 50);
    // Unspecified sections fall back to defaults.
    assert_eq!(config.withdrawal.daily_limit, 8);
    assert_eq!(config.rpc.timeout_secs, 10);
}

#[test]
fn test_default_config_is_valid_but_empty() {
    let config = RelayerConfig::default();
    assert!(config.networks.is_empty());
    assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
    assert_eq!(GasConfig::default().relayer_gas_reserve_wei, 10_000_000_000_000_000);
}
