//! Prometheus metrics for scan tracking and monitoring.
//!
//! This module provides metrics for:
//! - Scans dispatched by the scan client and how they ended
//! - Upstream market fetch latency
//! - Opportunities served by the backend

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{debug, warn};

// === Metric Name Constants ===

/// Scan latency metric name.
pub const METRIC_SCAN_LATENCY: &str = "scan_latency_ms";
/// Upstream fetch latency metric name.
pub const METRIC_UPSTREAM_LATENCY: &str = "upstream_fetch_latency_ms";
/// Scans dispatched counter metric name.
pub const METRIC_SCANS_DISPATCHED: &str = "scans_dispatched_total";
/// Scans failed counter metric name.
pub const METRIC_SCANS_FAILED: &str = "scans_failed_total";
/// Superseded scans counter metric name.
pub const METRIC_SCANS_SUPERSEDED: &str = "scans_superseded_total";
/// Markets fetched counter metric name.
pub const METRIC_MARKETS_FETCHED: &str = "markets_fetched_total";
/// Opportunities found counter metric name.
pub const METRIC_OPPORTUNITIES_FOUND: &str = "opportunities_found_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_SCAN_LATENCY,
        "Time from scan dispatch to response in milliseconds"
    );
    describe_histogram!(
        METRIC_UPSTREAM_LATENCY,
        "Gamma market page fetch latency in milliseconds"
    );
    describe_counter!(
        METRIC_SCANS_DISPATCHED,
        "Total number of scans dispatched"
    );
    describe_counter!(
        METRIC_SCANS_FAILED,
        "Total number of scans that failed"
    );
    describe_counter!(
        METRIC_SCANS_SUPERSEDED,
        "Total number of scan responses discarded because a newer scan was issued"
    );
    describe_counter!(
        METRIC_MARKETS_FETCHED,
        "Total number of markets fetched from upstream"
    );
    describe_counter!(
        METRIC_OPPORTUNITIES_FOUND,
        "Total number of arbitrage opportunities found"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus recorder and return a handle for rendering.
///
/// Returns `None` if a recorder is already installed.
pub fn install_prometheus() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            init_metrics();
            Some(handle)
        }
        Err(e) => {
            warn!(error = %e, "Prometheus recorder not installed");
            None
        }
    }
}

/// Record scan round-trip latency.
pub fn record_scan_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_SCAN_LATENCY).record(latency_ms);
}

/// Record upstream fetch latency.
pub fn record_upstream_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_UPSTREAM_LATENCY).record(latency_ms);
}

/// Increment scans dispatched counter.
pub fn inc_scans_dispatched() {
    counter!(METRIC_SCANS_DISPATCHED).increment(1);
}

/// Increment scans failed counter.
pub fn inc_scans_failed() {
    counter!(METRIC_SCANS_FAILED).increment(1);
}

/// Increment superseded scans counter.
pub fn inc_scans_superseded() {
    counter!(METRIC_SCANS_SUPERSEDED).increment(1);
}

/// Add to markets fetched counter.
pub fn inc_markets_fetched(count: u64) {
    counter!(METRIC_MARKETS_FETCHED).increment(count);
}

/// Add to opportunities found counter.
pub fn inc_opportunities_found(count: u64) {
    counter!(METRIC_OPPORTUNITIES_FOUND).increment(count);
}
