//! Prometheus metrics for upstream latency and outcomes.
//!
//! This module provides:
//! - Upstream request latency
//! - Upstream responses by status code
//! - Upstream failures by kind

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{debug, info};

// === Metric Name Constants ===

/// Upstream request latency metric name.
pub const METRIC_UPSTREAM_LATENCY: &str = "upstream_request_latency_ms";
/// Upstream responses counter metric name.
pub const METRIC_UPSTREAM_RESPONSES: &str = "upstream_responses_total";
/// Upstream failures counter metric name.
pub const METRIC_UPSTREAM_FAILURES: &str = "upstream_failures_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_UPSTREAM_LATENCY,
        "Upstream request latency in milliseconds, including body read"
    );
    describe_counter!(
        METRIC_UPSTREAM_RESPONSES,
        "Total number of upstream responses relayed, by status code"
    );
    describe_counter!(
        METRIC_UPSTREAM_FAILURES,
        "Total number of upstream relays that failed, by failure kind"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus recorder with its own HTTP listener.
pub fn install_exporter(addr: SocketAddr) -> anyhow::Result<()> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    info!("Prometheus exporter listening on {}", addr);
    Ok(())
}

/// Increment upstream responses counter.
pub fn inc_upstream_responses(status: u16) {
    counter!(METRIC_UPSTREAM_RESPONSES, "status" => status.to_string()).increment(1);
}

/// Increment upstream failures counter.
pub fn inc_upstream_failures(kind: &'static str) {
    counter!(METRIC_UPSTREAM_FAILURES, "kind" => kind).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for an upstream round trip.
pub fn timer_upstream() -> LatencyTimer {
    LatencyTimer::new(METRIC_UPSTREAM_LATENCY)
}
