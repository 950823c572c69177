//! Prometheus metrics
//!
//! Business counters are incremented by the services after a successful
//! write; HTTP metrics are recorded by the request middleware. Without an
//! installed recorder every macro call is a no-op, so tests need no setup.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

pub use metrics::{counter, histogram};

pub const PVZ_CREATED_TOTAL: &str = "pvz_created_total";
pub const RECEPTIONS_CREATED_TOTAL: &str = "receptions_created_total";
pub const PRODUCTS_ADDED_TOTAL: &str = "products_added_total";
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("failed to build metrics exporter: {0}")]
    Build(String),
    #[error("failed to install metrics recorder: {0}")]
    Install(String),
}

/// Install the global Prometheus recorder. Call once, from `main`.
pub fn install_recorder() -> Result<PrometheusHandle, MetricsError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )
        .map_err(|e| MetricsError::Build(e.to_string()))?
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    register_metrics();
    Ok(handle)
}

fn register_metrics() {
    describe_counter!(PVZ_CREATED_TOTAL, "Total number of pickup points created");
    describe_counter!(
        RECEPTIONS_CREATED_TOTAL,
        "Total number of receptions opened"
    );
    describe_counter!(
        PRODUCTS_ADDED_TOTAL,
        "Total number of products added to receptions"
    );
    describe_counter!(
        HTTP_REQUESTS_TOTAL,
        "Total number of HTTP requests by method, route and status"
    );
    describe_histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "HTTP request latency by method and route"
    );
}
