//! EIP-712 signature verification.
//!
//! Builds the typed, domain-separated message for the claim, recovers the
//! signer from the split signature, and accepts only when the recovered
//! address matches the claimed user. Everything here is pure over state the
//! validator has already fetched from chain.
//!
//! For the proof-of-work variant, the claim's anti-replay nonce is checked
//! against the contract's stored nonce *before* recovery, so signing over
//! stale state surfaces as `nonce_mismatch` instead of being misattributed
//! to a bad signature. The proof-of-work solution itself is not re-verified
//! here: the dev faucet contract checks the hash against the difficulty
//! target atomically at execution, and that is the trust boundary this
//! deployment relies on.

use alloy::primitives::{Address, Signature, B256, U256};
use alloy::sol_types::SolStruct;

use crate::blockchain::contracts::{classic, classic_domain, pow, pow_domain};
use crate::faucet::claim::{ClassicClaim, PowClaim, SignatureParts};
use crate::faucet::outcome::Rejection;

/// Signing hash for a classic withdrawal authorization.
pub fn classic_signing_hash(
    chain_id: u64,
    faucet: Address,
    recipient: Address,
    nonce: U256,
    message: &str,
) -> B256 {
    let request = classic::WithdrawalRequest {
        recipient,
        nonce,
        message: message.to_string(),
    };
    request.eip712_signing_hash(&classic_domain(chain_id, faucet))
}

/// Signing hash for a proof-of-work withdrawal authorization.
#[allow(clippy::too_many_arguments)]
pub fn pow_signing_hash(
    chain_id: u64,
    faucet: Address,
    recipient: Address,
    chosen_block_hash: B256,
    withdrawal_index: u64,
    ip_address: B256,
    nonce: u64,
    message: &str,
) -> B256 {
    let request = pow::WithdrawalRequest {
        recipient,
        chosenBlockHash: chosen_block_hash,
        withdrawalIndex: U256::from(withdrawal_index),
        ipAddress: ip_address,
        nonce: U256::from(nonce),
        message: message.to_string(),
    };
    request.eip712_signing_hash(&pow_domain(chain_id, faucet))
}

/// Recover the signer of `digest` from split signature components.
pub fn recover_signer(digest: B256, signature: &SignatureParts) -> Result<Address, Rejection> {
    let r = U256::from_be_bytes(signature.r_bytes()?.0);
    let s = U256::from_be_bytes(signature.s_bytes()?.0);
    let sig = Signature::new(r, s, signature.v == 28);

    sig.recover_address_from_prehash(&digest)
        .map_err(|_| Rejection::BadSignature)
}

fn assert_signer(recovered: Address, claimed: Address) -> Result<Address, Rejection> {
    // Address comparison is canonical bytes, so checksum casing of the
    // claimed address is irrelevant.
    if recovered == claimed {
        Ok(recovered)
    } else {
        Err(Rejection::BadSignature)
    }
}

/// Verify a classic claim against the contract's stored nonce. The classic
/// claim carries no nonce field; the live on-chain value is bound into the
/// typed message directly.
pub fn verify_classic(
    chain_id: u64,
    faucet: Address,
    claim: &ClassicClaim,
    user: Address,
    nonce: U256,
) -> Result<Address, Rejection> {
    let digest = classic_signing_hash(chain_id, faucet, user, nonce, &claim.message);
    let recovered = recover_signer(digest, &claim.signature)?;
    assert_signer(recovered, user)
}

/// Verify a proof-of-work claim: anti-replay nonce first, then recovery.
pub fn verify_pow(
    chain_id: u64,
    faucet: Address,
    claim: &PowClaim,
    user: Address,
    stored_nonce: u64,
) -> Result<Address, Rejection> {
    if claim.nonce != stored_nonce {
        return Err(Rejection::NonceMismatch {
            expected: stored_nonce,
            got: claim.nonce,
        });
    }

    let digest = pow_signing_hash(
        chain_id,
        faucet,
        user,
        claim.chosen_block_hash_bytes()?,
        claim.withdrawal_index,
        claim.ip_address_bytes()?,
        claim.nonce,
        &claim.message,
    );
    let recovered = recover_signer(digest, &claim.signature)?;
    assert_signer(recovered, user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::signers::local::PrivateKeySigner;
    use alloy::signers::SignerSync;

    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn faucet() -> Address {
        "0xf0D4061DB5330a3785DCb0705eE0565338311d4B".parse().unwrap()
    }

    fn sign(digest: B256) -> (Address, SignatureParts) {
        let signer: PrivateKeySigner = TEST_PRIVATE_KEY.parse().unwrap();
        let sig = signer.sign_hash_sync(&digest).unwrap();
        let parts = SignatureParts {
            v: if sig.v() { 28 } else { 27 },
            r: format!("0x{:064x}", sig.r()),
            s: format!("0x{:064x}", sig.s()),
        };
        (signer.address(), parts)
    }

    fn pow_claim(user: Address, nonce: u64) -> PowClaim {
        let digest = pow_signing_hash(
            69000,
            faucet(),
            user,
            B256::repeat_byte(0x11),
            1,
            B256::repeat_byte(0x22),
            nonce,
            "gm",
        );
        let (_, parts) = sign(digest);
        PowClaim {
            user_address: format!("{:?}", user),
            message: "gm".into(),
            signature: parts,
            chosen_block_hash: format!("0x{}", "11".repeat(32)),
            withdrawal_index: 1,
            ip_address: format!("0x{}", "22".repeat(32)),
            nonce,
            pow_nonce: 123456,
        }
    }

    #[test]
    fn test_classic_recovery_round_trip() {
        let signer: PrivateKeySigner = TEST_PRIVATE_KEY.parse().unwrap();
        let me = signer.address();

        let digest = classic_signing_hash(11155111, faucet(), me, U256::ZERO, "gm");
        let (expected, parts) = sign(digest);
        let recovered = recover_signer(digest, &parts).unwrap();
        assert_eq!(recovered, expected);
    }

    #[test]
    fn test_pow_recovery_round_trip() {
        let signer: PrivateKeySigner = TEST_PRIVATE_KEY.parse().unwrap();
        let me = signer.address();

        let digest = pow_signing_hash(
            69000,
            faucet(),
            me,
            B256::repeat_byte(0x11),
            1,
            B256::repeat_byte(0x22),
            0,
            "gm",
        );
        let (expected, parts) = sign(digest);
        assert_eq!(recover_signer(digest, &parts).unwrap(), expected);
    }

    #[test]
    fn test_verify_pow_accepts_matching_nonce() {
        let signer: PrivateKeySigner = TEST_PRIVATE_KEY.parse().unwrap();
        let me = signer.address();

        let claim = pow_claim(me, 4);
        let recovered = verify_pow(69000, faucet(), &claim, me, 4).unwrap();
        assert_eq!(recovered, me);
    }

    #[test]
    fn test_verify_pow_stale_nonce_is_mismatch_not_bad_signature() {
        let signer: PrivateKeySigner = TEST_PRIVATE_KEY.parse().unwrap();
        let me = signer.address();

        // Signed over nonce 4, but the contract has moved on to 5.
        let claim = pow_claim(me, 4);
        match verify_pow(69000, faucet(), &claim, me, 5) {
            Err(Rejection::NonceMismatch { expected, got }) => {
                assert_eq!(expected, 5);
                assert_eq!(got, 4);
            }
            other => panic!("expected NonceMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_verify_classic_binds_stored_nonce() {
        let signer: PrivateKeySigner = TEST_PRIVATE_KEY.parse().unwrap();
        let me = signer.address();

        let digest = classic_signing_hash(11155111, faucet(), me, U256::from(2), "gm");
        let (_, parts) = sign(digest);
        let claim = ClassicClaim {
            user_address: format!("{:?}", me),
            message: "gm".into(),
            signature: parts,
        };

        assert_eq!(
            verify_classic(11155111, faucet(), &claim, me, U256::from(2)).unwrap(),
            me
        );
        // Against any other stored nonce the recovered address differs.
        assert!(matches!(
            verify_classic(11155111, faucet(), &claim, me, U256::from(3)),
            Err(Rejection::BadSignature)
        ));
    }

    #[test]
    fn test_changed_field_changes_signer() {
        let signer: PrivateKeySigner = TEST_PRIVATE_KEY.parse().unwrap();
        let me = signer.address();

        let digest = classic_signing_hash(11155111, faucet(), me, U256::ZERO, "gm");
        let (_, parts) = sign(digest);

        // Same signature over a different message recovers someone else.
        let other_digest = classic_signing_hash(11155111, faucet(), me, U256::ZERO, "gn");
        let recovered = recover_signer(other_digest, &parts).unwrap();
        assert_ne!(recovered, me);
    }

    #[test]
    fn test_nonce_changes_digest() {
        let me: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        let a = classic_signing_hash(1, faucet(), me, U256::from(0), "gm");
        let b = classic_signing_hash(1, faucet(), me, U256::from(1), "gm");
        assert_ne!(a, b);
    }

    #[test]
    fn test_assert_signer_mismatch() {
        let a: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        let b: Address = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap();
        assert!(matches!(assert_signer(a, b), Err(Rejection::BadSignature)));
        assert_eq!(assert_signer(a, a).unwrap(), a);
    }
}
