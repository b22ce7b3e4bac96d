//! Application metrics for Prometheus monitoring.
//!
//! This module provides:
//! - Prometheus metrics recorder initialization
//! - Metric descriptions
//! - Helper functions for recording request, cache and fallback events
//!
//! Recording before `init_metrics` is a no-op, so library code and tests can
//! call the helpers unconditionally.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// Returns `true` if initialization succeeded, `false` if already initialized.
pub fn init_metrics() -> bool {
    if PROMETHEUS_HANDLE.get().is_some() {
        return false;
    }

    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    if metrics::set_global_recorder(recorder).is_err() {
        tracing::warn!("Failed to set global metrics recorder (already set)");
        return false;
    }

    if PROMETHEUS_HANDLE.set(handle).is_err() {
        tracing::warn!("Failed to store Prometheus handle (already set)");
    }

    describe_metrics();

    tracing::info!("Prometheus metrics initialized");
    true
}

fn describe_metrics() {
    describe_counter!(
        "dashboard_requests_total",
        "Total number of API requests to dashboard endpoints"
    );
    describe_histogram!(
        "dashboard_request_duration_seconds",
        "Duration of API requests in seconds"
    );
    describe_counter!(
        "aggregate_cache_events_total",
        "Aggregation cache lookups by query and outcome (hit, stale, miss)"
    );
    describe_counter!(
        "dashboard_fallbacks_total",
        "Panels rendered from sample data because live data was unavailable"
    );
}

/// Render current metrics in Prometheus text format.
///
/// Returns `None` if metrics are not initialized.
pub fn render_metrics() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|h| h.render())
}

/// Record a completed API request.
///
/// # Arguments
/// * `endpoint` - The API endpoint name (e.g., "dashboard", "political_spectrum")
/// * `status` - HTTP status code as string (e.g., "200", "400")
/// * `duration` - Request duration
pub fn record_request(endpoint: &str, status: &str, duration: Duration) {
    counter!("dashboard_requests_total", "endpoint" => endpoint.to_string(), "status" => status.to_string())
        .increment(1);
    histogram!("dashboard_request_duration_seconds", "endpoint" => endpoint.to_string())
        .record(duration.as_secs_f64());
}

/// Record one aggregation cache lookup.
pub fn record_cache_event(query: &'static str, outcome: &'static str) {
    counter!("aggregate_cache_events_total", "query" => query, "outcome" => outcome).increment(1);
}

/// Record a panel that fell back to sample data.
pub fn record_fallback(panel: &'static str) {
    counter!("dashboard_fallbacks_total", "panel" => panel).increment(1);
}
