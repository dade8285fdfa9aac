//! Request validation pipeline.
//!
//! Per-claim decision logic, no state carried across claims. A claim moves
//! through field presence → address normalization → signature shape →
//! a single snapshot of on-chain faucet state → variant business rules →
//! authorization, and comes out either accepted with the exact on-chain
//! call parameters or rejected with a single terminal reason.
//!
//! Chain reads are isolated in the `fetch_*_state` functions; the business
//! rules themselves (`decide_classic`, `decide_pow`) are pure over the
//! fetched snapshot. On-chain state is read fresh for every claim; nothing
//! is cached between requests.

use alloy::primitives::{Address, U256};

use crate::blockchain::contracts::{ClassicFaucet, DevFaucet};
use crate::config::{FaucetVariant, WithdrawalConfig};
use crate::faucet::claim::{ClassicClaim, PowClaim, RawWithdrawalClaim};
use crate::faucet::outcome::{AcceptedWithdrawal, Rejection, WithdrawalCall};
use crate::faucet::verifier;
use crate::registry::NetworkHandle;

/// Snapshot of classic faucet state for one user.
#[derive(Debug, Clone)]
pub struct ClassicFaucetState {
    /// Distributable balance, as reported by the contract itself.
    pub balance: U256,
    pub withdrawal_count: u64,
    /// Seconds until the faucet's global cooldown expires; zero when idle.
    pub cooldown_secs: u64,
    pub expected_message: String,
    /// Stored anti-replay nonce for the user.
    pub nonce: U256,
}

/// Snapshot of dev faucet state for one user.
///
/// `withdrawal_amount` and `expected_message` are read at the index the
/// user is expected to claim next, derived from the window accounting.
#[derive(Debug, Clone)]
pub struct PowFaucetState {
    pub balance: U256,
    pub withdrawal_count: u64,
    pub first_request_time: u64,
    /// Latest block timestamp; business rules run in chain time.
    pub chain_now: u64,
    pub stored_nonce: u64,
    pub withdrawal_amount: U256,
    pub expected_message: String,
}

/// Validate a raw claim against live chain state.
pub async fn validate(
    handle: &NetworkHandle,
    rules: &WithdrawalConfig,
    raw: &RawWithdrawalClaim,
) -> Result<AcceptedWithdrawal, Rejection> {
    match handle.variant() {
        FaucetVariant::Classic => {
            let claim = ClassicClaim::from_raw(raw)?;
            let user = parse_user_address(&claim.user_address)?;
            claim.signature.validate_shape()?;

            let state = fetch_classic_state(handle, user).await?;
            decide_classic(
                handle.chain_id(),
                handle.faucet_address(),
                rules,
                &claim,
                user,
                &state,
            )
        }
        FaucetVariant::ProofOfWork => {
            let claim = PowClaim::from_raw(raw)?;
            let user = parse_user_address(&claim.user_address)?;
            claim.signature.validate_shape()?;

            let state = fetch_pow_state(handle, rules, user).await?;
            decide_pow(
                handle.chain_id(),
                handle.faucet_address(),
                rules,
                &claim,
                user,
                &state,
            )
        }
    }
}

fn parse_user_address(raw: &str) -> Result<Address, Rejection> {
    raw.parse()
        .map_err(|_| Rejection::InvalidAddress(raw.to_string()))
}

/// Withdrawal count after applying the rolling window, plus seconds until
/// the window resets.
///
/// The count resets to zero once `window_secs` have elapsed since the
/// user's first request, measured in chain time. A raw count of zero means
/// the user has never withdrawn and gets a full window.
pub fn effective_withdrawal_count(
    raw_count: u64,
    first_request_time: u64,
    chain_now: u64,
    window_secs: u64,
) -> (u64, u64) {
    if raw_count == 0 {
        return (0, window_secs);
    }
    let window_end = first_request_time.saturating_add(window_secs);
    if chain_now >= window_end {
        (0, 0)
    } else {
        (raw_count, window_end - chain_now)
    }
}

/// Read the classic faucet snapshot for `user` in one pass.
pub async fn fetch_classic_state(
    handle: &NetworkHandle,
    user: Address,
) -> Result<ClassicFaucetState, Rejection> {
    let client = handle.client();
    let faucet = ClassicFaucet::new(handle.faucet_address(), client.provider());

    let balance: U256 = client
        .view("get_balance", || {
            let call = faucet.get_balance();
            async move { call.call().await }
        })
        .await?;
    let count: U256 = client
        .view("get_withdrawal_count", || {
            let call = faucet.get_withdrawal_count(user);
            async move { call.call().await }
        })
        .await?;
    let cooldown: U256 = client
        .view("time_until_next_withdrawal", || {
            let call = faucet.time_until_next_withdrawal();
            async move { call.call().await }
        })
        .await?;
    let expected_message: String = client
        .view("get_expected_message", || {
            let call = faucet.get_expected_message(user);
            async move { call.call().await }
        })
        .await?;
    let nonce: U256 = client
        .view("get_nonce", || {
            let call = faucet.get_nonce(user);
            async move { call.call().await }
        })
        .await?;

    Ok(ClassicFaucetState {
        balance,
        withdrawal_count: count.saturating_to::<u64>(),
        cooldown_secs: cooldown.saturating_to::<u64>(),
        expected_message,
        nonce,
    })
}

/// Classic business rules over a fetched snapshot. Pure.
pub fn decide_classic(
    chain_id: u64,
    faucet: Address,
    rules: &WithdrawalConfig,
    claim: &ClassicClaim,
    user: Address,
    state: &ClassicFaucetState,
) -> Result<AcceptedWithdrawal, Rejection> {
    if state.withdrawal_count > 0 {
        return Err(Rejection::AlreadyWithdrawn {
            count: state.withdrawal_count,
        });
    }

    if state.cooldown_secs > 0 {
        return Err(Rejection::CooldownActive {
            seconds_remaining: state.cooldown_secs,
        });
    }

    if state.balance.is_zero() {
        return Err(Rejection::FaucetEmpty);
    }
    let required = U256::from(rules.classic_amount_wei);
    if state.balance < required {
        return Err(Rejection::InsufficientBalance {
            available: state.balance,
            required,
        });
    }

    if state.expected_message != claim.message {
        return Err(Rejection::MessageMismatch {
            expected: state.expected_message.clone(),
            got: claim.message.clone(),
        });
    }

    let recipient = verifier::verify_classic(chain_id, faucet, claim, user, state.nonce)?;

    Ok(AcceptedWithdrawal {
        recipient,
        call: WithdrawalCall::Classic {
            v: claim.signature.v_byte(),
            r: claim.signature.r_bytes()?,
            s: claim.signature.s_bytes()?,
            message: claim.message.clone(),
        },
    })
}

/// Read the dev faucet snapshot for `user` in one pass.
///
/// Per-index views are read at the index the window accounting expects
/// next, never at the caller-supplied index, so a wild index cannot force
/// a reverting contract read.
pub async fn fetch_pow_state(
    handle: &NetworkHandle,
    rules: &WithdrawalConfig,
    user: Address,
) -> Result<PowFaucetState, Rejection> {
    let client = handle.client();
    let faucet = DevFaucet::new(handle.faucet_address(), client.provider());

    let balance = client.get_balance(handle.faucet_address()).await?;
    let raw_count: U256 = client
        .view("withdrawal_count", || {
            let call = faucet.withdrawal_count(user);
            async move { call.call().await }
        })
        .await?;
    let first_request: U256 = client
        .view("first_request_time", || {
            let call = faucet.first_request_time(user);
            async move { call.call().await }
        })
        .await?;
    let stored_nonce: U256 = client
        .view("nonce", || {
            let call = faucet.nonce(user);
            async move { call.call().await }
        })
        .await?;
    // Chain time, not wall-clock time.
    let chain_now = client.get_block_timestamp().await?;

    let (effective, _) = effective_withdrawal_count(
        raw_count.saturating_to::<u64>(),
        first_request.saturating_to::<u64>(),
        chain_now,
        rules.window_secs,
    );
    let expected_index = U256::from(effective + 1);

    let withdrawal_amount: U256 = client
        .view("get_withdrawal_amount", || {
            let call = faucet.get_withdrawal_amount(expected_index);
            async move { call.call().await }
        })
        .await?;
    let expected_message: String = client
        .view("get_expected_message", || {
            let call = faucet.get_expected_message(expected_index);
            async move { call.call().await }
        })
        .await?;

    Ok(PowFaucetState {
        balance,
        withdrawal_count: raw_count.saturating_to::<u64>(),
        first_request_time: first_request.saturating_to::<u64>(),
        chain_now,
        stored_nonce: stored_nonce.saturating_to::<u64>(),
        withdrawal_amount,
        expected_message,
    })
}

/// Proof-of-work business rules over a fetched snapshot. Pure.
pub fn decide_pow(
    chain_id: u64,
    faucet: Address,
    rules: &WithdrawalConfig,
    claim: &PowClaim,
    user: Address,
    state: &PowFaucetState,
) -> Result<AcceptedWithdrawal, Rejection> {
    let chosen_block_hash = claim.chosen_block_hash_bytes()?;
    let ip_address = claim.ip_address_bytes()?;

    if state.balance.is_zero() {
        return Err(Rejection::FaucetEmpty);
    }

    let (effective, seconds_until_reset) = effective_withdrawal_count(
        state.withdrawal_count,
        state.first_request_time,
        state.chain_now,
        rules.window_secs,
    );

    if effective >= rules.daily_limit {
        return Err(Rejection::DailyLimitReached {
            seconds_until_reset,
        });
    }

    let expected_index = effective + 1;
    if claim.withdrawal_index != expected_index {
        return Err(Rejection::InvalidIndex {
            expected: expected_index,
            got: claim.withdrawal_index,
        });
    }

    if state.balance < state.withdrawal_amount {
        return Err(Rejection::InsufficientBalance {
            available: state.balance,
            required: state.withdrawal_amount,
        });
    }

    if state.expected_message != claim.message {
        return Err(Rejection::MessageMismatch {
            expected: state.expected_message.clone(),
            got: claim.message.clone(),
        });
    }

    let recipient = verifier::verify_pow(chain_id, faucet, claim, user, state.stored_nonce)?;

    Ok(AcceptedWithdrawal {
        recipient,
        call: WithdrawalCall::ProofOfWork {
            chosen_block_hash,
            withdrawal_index: claim.withdrawal_index,
            ip_address,
            pow_nonce: claim.pow_nonce,
            message: claim.message.clone(),
            v: claim.signature.v_byte(),
            r: claim.signature.r_bytes()?,
            s: claim.signature.s_bytes()?,
        },
    })
}
