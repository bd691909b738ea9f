//! Prometheus metrics for the todo API.
//!
//! This module provides:
//! - Request counters labelled by operation and status
//! - Request latency histograms
//! - A gauge tracking how many todos are stored

use std::time::Instant;

use axum::http::StatusCode;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use strum::Display;
use tracing::debug;

// === Metric Name Constants ===

/// API requests counter metric name.
pub const METRIC_API_REQUESTS: &str = "todo_api_requests_total";
/// API request latency metric name.
pub const METRIC_API_REQUEST_LATENCY: &str = "todo_api_request_latency_ms";
/// Stored todos gauge metric name.
pub const METRIC_TODOS_STORED: &str = "todos_stored";

/// What a dispatched API request resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    /// `GET` on the collection.
    List,
    /// `GET` on an item.
    Get,
    /// `POST` on the collection.
    Create,
    /// `PUT` on an item.
    Update,
    /// `DELETE` on an item.
    Delete,
    /// Cross-origin `OPTIONS` request.
    Preflight,
    /// Bad path or unsupported method, refused before reaching the store.
    Rejected,
}

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(
        METRIC_API_REQUESTS,
        "Total number of todo API requests by operation and status"
    );
    describe_histogram!(
        METRIC_API_REQUEST_LATENCY,
        "Todo API request handling latency in milliseconds"
    );
    describe_gauge!(METRIC_TODOS_STORED, "Number of todos currently stored");

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and return its render handle.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Record one finished API request.
pub fn record_request(operation: Operation, status: StatusCode, start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    let operation = operation.to_string();
    histogram!(METRIC_API_REQUEST_LATENCY, "operation" => operation.clone()).record(latency_ms);
    counter!(
        METRIC_API_REQUESTS,
        "operation" => operation,
        "status" => status.as_u16().to_string()
    )
    .increment(1);
}

/// Publish the current number of stored todos.
pub fn set_todos_stored(count: usize) {
    gauge!(METRIC_TODOS_STORED).set(count as f64);
}
