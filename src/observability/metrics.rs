//! Metrics collection and exposition.
//!
//! # Metrics
//! - `keymux_requests_total` (counter): requests by method, status
//! - `keymux_request_duration_seconds` (histogram): latency by method
//! - `keymux_route_cache_lookups_total` (counter): cache outcomes
//!   (hit / refresh / miss)
//!
//! # Design Decisions
//! - Prometheus exposition on a separate listener
//! - Recording is a no-op until `init_metrics` installs the recorder,
//!   so the library and tests never need it

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and exposition endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(err) => tracing::error!(error = %err, "Failed to install metrics exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, start_time: Instant) {
    metrics::counter!(
        "keymux_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);

    metrics::histogram!(
        "keymux_request_duration_seconds",
        "method" => method.to_string(),
    )
    .record(start_time.elapsed().as_secs_f64());
}

/// Record one routing-cache lookup outcome.
pub fn record_cache_lookup(outcome: &'static str) {
    metrics::counter!("keymux_route_cache_lookups_total", "outcome" => outcome).increment(1);
}
