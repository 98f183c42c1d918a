//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics (requests, latency, outcomes, catalog size)
//! - Count every HTTP response through the `track_requests` middleware
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `exists_requests_total` (counter): requests by method, status
//! - `exists_request_duration_seconds` (histogram): latency distribution
//! - `exists_outcomes_total` (counter): checks by outcome (exists, missing, error)
//! - `exists_catalog_resources` (gauge): resources in the published cluster state

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP scrape listener.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Middleware recording method, status and latency of every response,
/// whichever layer produced it.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let response = next.run(request).await;
    record_request(method.as_str(), response.status().as_u16(), start);
    response
}

/// Record a finished request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    counter!("exists_requests_total", &labels).increment(1);
    histogram!("exists_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

/// Record the outcome of a dispatched existence check.
pub fn record_outcome(outcome: &'static str) {
    counter!("exists_outcomes_total", "outcome" => outcome).increment(1);
}

/// Record the number of resources in the latest published state.
pub fn record_catalog_size(resources: usize) {
    gauge!("exists_catalog_resources").set(resources as f64);
}
