//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_requests_total` (counter): dispatched requests by route class
//!   and decision
//! - `gate_logons_total` (counter): logon attempts by outcome
//! - `gate_sessions` (gauge): session records currently held
//!
//! Recording is safe without an installed exporter; the calls become
//! no-ops against the default recorder.

use metrics::{counter, gauge};
use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one dispatched request.
pub fn record_dispatch(class: &'static str, decision: &'static str) {
    counter!("gate_requests_total", "class" => class, "decision" => decision).increment(1);
}

/// Count one logon attempt by outcome.
pub fn record_logon(outcome: &'static str) {
    counter!("gate_logons_total", "outcome" => outcome).increment(1);
}

/// Track how many session records the store holds.
pub fn record_session_count(count: usize) {
    gauge!("gate_sessions").set(count as f64);
}
