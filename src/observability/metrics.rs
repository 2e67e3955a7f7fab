//! Metrics collection and exposition.
//!
//! # Metrics
//! - `reserve_funds_requests_total` (counter): reservations by final status or error class
//! - `reserve_funds_duration_seconds` (histogram): end-to-end latency of one cascade
//! - `ledger_attempts_total` (counter): ledger calls by outcome (`ok`, `transient`, `error`)
//! - `ledger_retries_total` (counter): retries scheduled after transport failures
//! - `overdraft_attempts_total` (counter): overdraft reservations by ledger status
//!
//! Without an installed recorder every call here is a no-op.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_reservation(status: &'static str, start: Instant) {
    counter!("reserve_funds_requests_total", "status" => status).increment(1);
    histogram!("reserve_funds_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_ledger_attempt(outcome: &'static str) {
    counter!("ledger_attempts_total", "outcome" => outcome).increment(1);
}

pub fn record_ledger_retry() {
    counter!("ledger_retries_total").increment(1);
}

pub fn record_overdraft_attempt(status: &'static str) {
    counter!("overdraft_attempts_total", "status" => status).increment(1);
}
