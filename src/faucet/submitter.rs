//! Transaction building, signing, and broadcast.
//!
//! # Responsibilities
//! - Check the relayer account can afford gas before touching the nonce
//! - Price gas as max(network price, configured floor)
//! - Apply a fixed, variant-specific gas limit (no dynamic estimation; the
//!   call shapes are known and a generous ceiling beats an out-of-gas)
//! - Serialize nonce fetch → sign → broadcast per network
//! - Never retry a broadcast

use alloy::eips::eip2718::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;

use crate::blockchain::contracts::{ClassicFaucetServer, DevFaucetServer};
use crate::config::GasConfig;
use crate::faucet::outcome::{AcceptedWithdrawal, Rejection, SubmittedWithdrawal, WithdrawalCall};
use crate::registry::NetworkHandle;

const WEI_PER_GWEI: u128 = 1_000_000_000;

/// Gas price to submit with: the network's reported price, floored at the
/// configured minimum so an under-reporting oracle cannot strand the
/// transaction.
pub fn effective_gas_price(network_price: u128, floor_gwei: u64) -> u128 {
    network_price.max(floor_gwei as u128 * WEI_PER_GWEI)
}

/// Rough number of withdrawals the relayer balance can still pay for.
pub fn estimate_tx_capacity(balance: U256, gas_price: u128, gas_limit: u64) -> u64 {
    let cost = U256::from(gas_price).saturating_mul(U256::from(gas_limit));
    if cost.is_zero() {
        return 0;
    }
    (balance / cost).saturating_to::<u64>()
}

/// ABI-encode the backend `requestWithdrawal` call for an accepted claim.
pub fn encode_call(faucet: Address, accepted: &AcceptedWithdrawal) -> Vec<u8> {
    use alloy::sol_types::SolCall;

    match &accepted.call {
        WithdrawalCall::Classic { v, r, s, message } => {
            ClassicFaucetServer::requestWithdrawalCall {
                _faucet: faucet,
                _user: accepted.recipient,
                _v: *v,
                _r: *r,
                _s: *s,
                _message: message.clone(),
            }
            .abi_encode()
        }
        WithdrawalCall::ProofOfWork {
            chosen_block_hash,
            withdrawal_index,
            ip_address,
            pow_nonce,
            message,
            v,
            r,
            s,
        } => DevFaucetServer::requestWithdrawalCall {
            _faucet: faucet,
            _user: accepted.recipient,
            _chosen_block_hash: *chosen_block_hash,
            _withdrawal_index: U256::from(*withdrawal_index),
            _ip_address: *ip_address,
            _pow_nonce: U256::from(*pow_nonce),
            _message: message.clone(),
            _v: U256::from(*v),
            _r: *r,
            _s: *s,
        }
        .abi_encode(),
    }
}

/// Fixed gas limit for the call shape.
pub fn gas_limit_for(gas: &GasConfig, call: &WithdrawalCall) -> u64 {
    match call {
        WithdrawalCall::Classic { .. } => gas.classic_gas_limit,
        WithdrawalCall::ProofOfWork { .. } => gas.pow_gas_limit,
    }
}

/// Build, sign, and broadcast the withdrawal transaction.
pub async fn submit(
    handle: &NetworkHandle,
    gas: &GasConfig,
    accepted: &AcceptedWithdrawal,
) -> Result<SubmittedWithdrawal, Rejection> {
    let wallet = handle.wallet().ok_or(Rejection::RelayerNotConfigured)?;
    let relayer = wallet.address();
    let client = handle.client();

    let balance = client.get_balance(relayer).await?;
    let required = U256::from(gas.relayer_gas_reserve_wei);
    if balance < required {
        return Err(Rejection::InsufficientRelayerFunds {
            relayer,
            balance,
            required,
        });
    }

    let network_price = client.get_gas_price().await?;
    let gas_price = effective_gas_price(network_price, gas.min_gas_price_gwei);
    let gas_limit = gas_limit_for(gas, &accepted.call);
    let calldata = encode_call(handle.faucet_address(), accepted);

    // Critical section: the account nonce must not be fetched by two
    // submissions concurrently, or one transaction gets dropped by the
    // network for nonce reuse.
    let _guard = handle.submission_lock().lock().await;

    let nonce = client.get_transaction_count(relayer).await?;

    let tx = TransactionRequest::default()
        .with_from(relayer)
        .with_to(handle.backend_address())
        .with_input(calldata)
        .with_nonce(nonce)
        .with_gas_price(gas_price)
        .with_gas_limit(gas_limit)
        .with_chain_id(handle.chain_id());

    tracing::debug!(
        network = %handle.id(),
        recipient = %accepted.recipient,
        nonce,
        gas_price,
        gas_limit,
        "Transaction built"
    );

    let envelope = tx.build(&wallet.ethereum_wallet()).await.map_err(|e| {
        tracing::error!(
            network = %handle.id(),
            recipient = %accepted.recipient,
            error = %e,
            "Transaction signing failed"
        );
        Rejection::SubmissionFailed(format!("signing failed: {}", e))
    })?;

    let tx_hash: TxHash = client
        .send_raw_transaction(&envelope.encoded_2718())
        .await
        .map_err(|e| {
            // The broadcast may still have landed; log everything needed
            // for manual reconciliation.
            tracing::error!(
                network = %handle.id(),
                relayer = %relayer,
                recipient = %accepted.recipient,
                nonce,
                rpc_url = %client.rpc_url(),
                error = %e,
                "Transaction broadcast failed"
            );
            Rejection::SubmissionFailed(e.to_string())
        })?;

    tracing::info!(
        network = %handle.id(),
        recipient = %accepted.recipient,
        tx_hash = %tx_hash,
        "Transaction sent"
    );

    Ok(SubmittedWithdrawal { tx_hash })
}
