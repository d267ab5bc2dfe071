//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics (requests, latency, cache, rate limiting)
//! - Expose a Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `svgopt_requests_total` (counter): requests by status code
//! - `svgopt_request_duration_seconds` (histogram): latency distribution
//! - `svgopt_cache_lookups_total` (counter): lookups by hit/miss
//! - `svgopt_cache_entries` (gauge): current cache population
//! - `svgopt_rate_limited_total` (counter): rejected requests
//! - `svgopt_sanitizer_removals_total` (counter): removal categories applied
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - The exporter runs on its own bind address, outside the API router

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address. Must be called from
/// within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed API request.
pub fn record_request(status: u16, start: Instant) {
    counter!("svgopt_requests_total", "status" => status.to_string()).increment(1);
    histogram!("svgopt_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a cache lookup outcome.
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("svgopt_cache_lookups_total", "result" => result).increment(1);
}

/// Record the current cache population.
pub fn record_cache_size(size: usize) {
    gauge!("svgopt_cache_entries").set(size as f64);
}

/// Record a rate-limited request.
pub fn record_rate_limited() {
    counter!("svgopt_rate_limited_total").increment(1);
}

/// Record how many sanitizer categories removed content for one document.
pub fn record_sanitizer_removals(categories: usize) {
    if categories > 0 {
        counter!("svgopt_sanitizer_removals_total").increment(categories as u64);
    }
}
