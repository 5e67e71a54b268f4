//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define router metrics (requests, latency, misses)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, route, status
//! - `router_request_duration_seconds` (histogram): latency distribution
//! - `router_not_found_total` (counter): requests no route matched, by method
//!
//! # Design Decisions
//! - Route label is the registered pattern, never the raw path
//! - Recording is a no-op until an exporter is installed

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one dispatched request.
pub fn record_request(method: &str, status: u16, route: &str, start_time: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("router_requests_total", &labels).increment(1);
    metrics::histogram!("router_request_duration_seconds", &labels)
        .record(start_time.elapsed().as_secs_f64());
}

/// Record a request that matched no route.
pub fn record_not_found(method: &str) {
    metrics::counter!("router_not_found_total", "method" => method.to_string()).increment(1);
}
