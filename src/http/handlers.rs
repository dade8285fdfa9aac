//! HTTP handlers for the relayer API.
//!
//! `POST /request-withdrawal` runs the full pipeline; the GET endpoints
//! are operational diagnostics over the same registry.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::blockchain::contracts::{
    ClassicFaucet, ClassicFaucetServer, DevFaucet, DevFaucetServer,
};
use crate::config::FaucetVariant;
use crate::faucet::{submitter, validator, RawWithdrawalClaim, Rejection};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::registry::{NetworkHandle, ResolveError};

/// `POST /request-withdrawal`
pub async fn request_withdrawal(
    State(state): State<AppState>,
    Json(raw): Json<RawWithdrawalClaim>,
) -> Response {
    let start = Instant::now();
    let response = handle_withdrawal(state, raw).await;
    // Rejections count toward latency the same as successes.
    metrics::record_request_duration("request_withdrawal", start);
    response
}

async fn handle_withdrawal(state: AppState, raw: RawWithdrawalClaim) -> Response {
    let network_id = match &raw.network {
        Some(id) => id.clone(),
        None => {
            return reject("unknown", &Rejection::MissingField { field: "network" });
        }
    };

    tracing::info!(network = %network_id, "Received withdrawal request");

    let handle = match state.registry.resolve(&network_id) {
        Ok(handle) => handle,
        Err(ResolveError::Unknown(id)) => return reject(&network_id, &Rejection::InvalidNetwork(id)),
        Err(ResolveError::Unavailable(id)) => {
            return reject(&network_id, &Rejection::NetworkUnavailable(id))
        }
    };

    let accepted = match validator::validate(&handle, &state.withdrawal, &raw).await {
        Ok(accepted) => accepted,
        Err(rejection) => return reject(&network_id, &rejection),
    };

    match submitter::submit(&handle, &state.gas, &accepted).await {
        Ok(submitted) => {
            metrics::record_withdrawal(&network_id, "accepted");
            Json(json!({
                "tx_hash": submitted.tx_hash.to_string(),
                "status": "success",
            }))
            .into_response()
        }
        Err(rejection) => reject(&network_id, &rejection),
    }
}

/// Build the error response for a rejection and record it.
fn reject(network: &str, rejection: &Rejection) -> Response {
    metrics::record_withdrawal(network, rejection.code());

    let status = rejection.http_status();
    if status >= 500 {
        tracing::error!(network, code = rejection.code(), error = %rejection, "Withdrawal failed");
    } else {
        tracing::warn!(network, code = rejection.code(), error = %rejection, "Withdrawal rejected");
    }

    let mut body = json!({
        "error": rejection.to_string(),
        "code": rejection.code(),
    });
    if let (Value::Object(map), Value::Object(extra)) = (&mut body, rejection.details()) {
        map.extend(extra);
    }

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}

/// `GET /status` — per-network connectivity and configured addresses.
pub async fn status(State(state): State<AppState>) -> Json<Value> {
    let mut networks = serde_json::Map::new();

    for handle in state.registry.iter() {
        let entry = match handle.client().get_block_number().await {
            Ok(block_number) => {
                metrics::record_rpc_health(handle.id(), true);
                json!({
                    "connected": true,
                    "block_number": block_number,
                    "chain_id": handle.chain_id(),
                    "faucet_address": handle.faucet_address().to_string(),
                    "backend_address": handle.backend_address().to_string(),
                    "variant": variant_name(handle.variant()),
                })
            }
            Err(e) => {
                metrics::record_rpc_health(handle.id(), false);
                json!({ "connected": false, "error": e.to_string() })
            }
        };
        networks.insert(handle.id().to_string(), entry);
    }

    Json(json!({
        "status": "running",
        "networks": networks,
        "timestamp": unix_now(),
    }))
}

/// `GET /verify-contracts` — check configured addresses hold bytecode.
pub async fn verify_contracts(State(state): State<AppState>) -> Json<Value> {
    let mut networks = serde_json::Map::new();

    for handle in state.registry.iter() {
        let mut contracts = serde_json::Map::new();
        for (name, address) in [
            ("faucet", handle.faucet_address()),
            ("backend", handle.backend_address()),
        ] {
            let entry = match handle.client().get_code(address).await {
                Ok(code) => json!({
                    "address": address.to_string(),
                    "deployed": !code.is_empty(),
                    "bytecode_size": code.len(),
                }),
                Err(e) => json!({
                    "address": address.to_string(),
                    "error": e.to_string(),
                }),
            };
            contracts.insert(name.to_string(), entry);
        }
        networks.insert(handle.id().to_string(), Value::Object(contracts));
    }

    Json(json!({ "networks": networks }))
}

/// `GET /server-account` — relayer balance and remaining tx capacity.
pub async fn server_account(State(state): State<AppState>) -> Json<Value> {
    let mut networks = serde_json::Map::new();

    for handle in state.registry.iter() {
        let entry = match handle.wallet() {
            None => json!({ "configured": false }),
            Some(wallet) => {
                let relayer = wallet.address();
                match account_entry(&state, handle, relayer).await {
                    Ok(entry) => entry,
                    Err(e) => json!({
                        "configured": true,
                        "address": relayer.to_string(),
                        "error": e.to_string(),
                    }),
                }
            }
        };
        networks.insert(handle.id().to_string(), entry);
    }

    Json(json!({ "networks": networks }))
}

async fn account_entry(
    state: &AppState,
    handle: &NetworkHandle,
    relayer: alloy::primitives::Address,
) -> Result<Value, crate::blockchain::ChainError> {
    let client = handle.client();
    let balance = client.get_balance(relayer).await?;
    let network_price = client.get_gas_price().await?;
    let gas_price = submitter::effective_gas_price(network_price, state.gas.min_gas_price_gwei);
    let gas_limit = match handle.variant() {
        FaucetVariant::Classic => state.gas.classic_gas_limit,
        FaucetVariant::ProofOfWork => state.gas.pow_gas_limit,
    };

    Ok(json!({
        "configured": true,
        "address": relayer.to_string(),
        "balance_wei": balance.to_string(),
        "gas_price_wei": gas_price.to_string(),
        "estimated_tx_capacity": submitter::estimate_tx_capacity(balance, gas_price, gas_limit),
    }))
}

/// `GET /check-ownership` — compare relayer address with `owner()` of the
/// faucet and backend contracts.
pub async fn check_ownership(State(state): State<AppState>) -> Json<Value> {
    let mut networks = serde_json::Map::new();

    for handle in state.registry.iter() {
        let relayer = handle.wallet().map(|w| w.address());
        let entry = match owners_for(handle).await {
            Ok((faucet_owner, backend_owner)) => json!({
                "faucet_owner": faucet_owner.to_string(),
                "backend_owner": backend_owner.to_string(),
                "relayer_address": relayer.map(|a| a.to_string()),
                "relayer_owns_faucet": relayer == Some(faucet_owner),
                "relayer_owns_backend": relayer == Some(backend_owner),
            }),
            Err(e) => json!({ "error": e.to_string() }),
        };
        networks.insert(handle.id().to_string(), entry);
    }

    Json(json!({ "networks": networks }))
}

async fn owners_for(
    handle: &NetworkHandle,
) -> Result<(alloy::primitives::Address, alloy::primitives::Address), crate::blockchain::ChainError>
{
    let client = handle.client();
    match handle.variant() {
        FaucetVariant::Classic => {
            let faucet = ClassicFaucet::new(handle.faucet_address(), client.provider());
            let backend = ClassicFaucetServer::new(handle.backend_address(), client.provider());
            let faucet_owner = client
                .view("faucet owner", || {
                    let call = faucet.owner();
                    async move { call.call().await }
                })
                .await?;
            let backend_owner = client
                .view("backend owner", || {
                    let call = backend.owner();
                    async move { call.call().await }
                })
                .await?;
            Ok((faucet_owner, backend_owner))
        }
        FaucetVariant::ProofOfWork => {
            let faucet = DevFaucet::new(handle.faucet_address(), client.provider());
            let backend = DevFaucetServer::new(handle.backend_address(), client.provider());
            let faucet_owner = client
                .view("faucet owner", || {
                    let call = faucet.owner();
                    async move { call.call().await }
                })
                .await?;
            let backend_owner = client
                .view("backend owner", || {
                    let call = backend.owner();
                    async move { call.call().await }
                })
                .await?;
            Ok((faucet_owner, backend_owner))
        }
    }
}

fn variant_name(variant: FaucetVariant) -> &'static str {
    match variant {
        FaucetVariant::Classic => "classic",
        FaucetVariant::ProofOfWork => "proof_of_work",
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
