//! Metrics collection.
//!
//! # Metrics
//! - `signer_client_rpc_requests_total` (counter): calls by method, outcome
//! - `signer_client_rpc_duration_seconds` (histogram): call latency by method
//! - `signer_client_cert_reloads_total` (counter): reloads by outcome
//!
//! Recorded through the `metrics` facade; the host installs the exporter.

use std::time::Instant;

/// Record a finished RPC call.
pub fn record_rpc(method: &str, outcome: &'static str, started: Instant) {
    ::metrics::counter!(
        "signer_client_rpc_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!(
        "signer_client_rpc_duration_seconds",
        "method" => method.to_string()
    )
    .record(started.elapsed().as_secs_f64());
}

/// Record a certificate reload attempt.
pub fn record_cert_reload(success: bool) {
    let outcome = if success { "ok" } else { "error" };
    ::metrics::counter!("signer_client_cert_reloads_total", "outcome" => outcome).increment(1);
}
