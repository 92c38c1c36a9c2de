//! Metrics collection and exposition.
//!
//! # Metrics
//! - `aqi_fetch_outcomes_total` (counter): dispatched fetches by outcome
//! - `aqi_fetch_duration_seconds` (histogram): time to resolve one guarded fetch
//! - `aqi_cache_lookups_total` (counter): hit / miss / stale
//! - `aqi_cache_entries` (gauge): current cache size
//! - `aqi_batches_total` (counter): completed / rejected batch runs
//!
//! Recording is a no-op until a recorder is installed, so library users and
//! tests pay nothing.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_fetch_outcome(outcome: &'static str) {
    metrics::counter!("aqi_fetch_outcomes_total", "outcome" => outcome).increment(1);
}

pub fn record_fetch_duration(seconds: f64) {
    metrics::histogram!("aqi_fetch_duration_seconds").record(seconds);
}

pub fn record_cache_lookup(result: &'static str) {
    metrics::counter!("aqi_cache_lookups_total", "result" => result).increment(1);
}

pub fn record_cache_size(size: usize) {
    metrics::gauge!("aqi_cache_entries").set(size as f64);
}

pub fn record_batch(status: &'static str) {
    metrics::counter!("aqi_batches_total", "status" => status).increment(1);
}
