//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ice_router_requests_total` (counter): dispatched requests by endpoint, status
//! - `ice_router_request_duration_seconds` (histogram): dispatch latency by endpoint
//! - `ice_router_route_misses_total` (counter): paths with no endpoint
//! - `ice_router_routes` (gauge): endpoints in the live route table
//! - `ice_router_reloads_total` (counter): route reloads by result

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatched request.
pub fn record_request(endpoint: &str, status: u16, start: Instant) {
    let endpoint = endpoint.to_string();
    metrics::counter!(
        "ice_router_requests_total",
        "endpoint" => endpoint.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("ice_router_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record a path that matched no endpoint.
pub fn record_route_miss() {
    metrics::counter!("ice_router_route_misses_total").increment(1);
}

/// Record the size of the live route table.
pub fn record_route_count(count: usize) {
    metrics::gauge!("ice_router_routes").set(count as f64);
}

/// Record a route reload attempt.
pub fn record_reload(success: bool) {
    let result = if success { "ok" } else { "error" };
    metrics::counter!("ice_router_reloads_total", "result" => result).increment(1);
}
