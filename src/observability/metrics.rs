//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relayer_withdrawals_total` (counter): claims by network, outcome code
//! - `relayer_request_duration_seconds` (histogram): handler latency
//! - `relayer_rpc_healthy` (gauge): 1=reachable, 0=unreachable per network
//!
//! # Design Decisions
//! - Outcome labels reuse the stable rejection codes
//! - Metric updates are cheap atomic operations; never on a hot error path
//!   more than once per request

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus exporter"),
    }
}

/// Count a withdrawal claim outcome. `outcome` is either "accepted" or a
/// rejection code.
pub fn record_withdrawal(network: &str, outcome: &str) {
    counter!(
        "relayer_withdrawals_total",
        "network" => network.to_string(),
        "outcome" => outcome.to_string(),
    )
    .increment(1);
}

/// Record handler latency.
pub fn record_request_duration(endpoint: &'static str, start: Instant) {
    histogram!("relayer_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record per-network RPC reachability.
pub fn record_rpc_health(network: &str, healthy: bool) {
    gauge!("relayer_rpc_healthy", "network" => network.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}
