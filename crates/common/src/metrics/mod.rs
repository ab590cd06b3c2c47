//! Metrics and observability utilities
//!
//! Describes the Prometheus metrics emitted by the gateway and provides
//! small helpers to record them.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all Table Desk metrics
pub const METRICS_PREFIX: &str = "tabledesk";

/// Histogram buckets for request and query latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
    10.00,  // 10s
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Database metrics
    describe_histogram!(
        format!("{}_db_query_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Database query latency in seconds"
    );

    describe_counter!(
        format!("{}_db_query_errors_total", METRICS_PREFIX),
        Unit::Count,
        "Total failed database queries"
    );

    describe_gauge!(
        format!("{}_documents_indexed", METRICS_PREFIX),
        Unit::Count,
        "Documents returned by the last index query"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Helper to record a database query outcome
pub fn record_query(query: &'static str, duration_secs: f64, success: bool) {
    histogram!(
        format!("{}_db_query_duration_seconds", METRICS_PREFIX),
        "query" => query
    )
    .record(duration_secs);

    if !success {
        counter!(
            format!("{}_db_query_errors_total", METRICS_PREFIX),
            "query" => query
        )
        .increment(1);
    }
}

/// Helper to record the size of the document index
pub fn record_index_size(documents: usize) {
    gauge!(format!("{}_documents_indexed", METRICS_PREFIX)).set(documents as f64);
}
