//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mcp_gateway_rejections_total` (counter): requests answered by a guard,
//!   labelled by `reason`
//! - `mcp_gateway_requests_forwarded_total` (counter): requests that cleared
//!   every guard and were answered downstream

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REJECTIONS_TOTAL: &str = "mcp_gateway_rejections_total";
pub const REQUESTS_FORWARDED_TOTAL: &str = "mcp_gateway_requests_forwarded_total";

pub const REASON_BODY_TOO_LARGE: &str = "body_too_large";
pub const REASON_UNAUTHORIZED: &str = "unauthorized";

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Count a request rejected by one of the guards.
pub fn record_rejection(reason: &'static str) {
    ::metrics::counter!(REJECTIONS_TOTAL, "reason" => reason).increment(1);
}

pub fn record_forwarded() {
    ::metrics::counter!(REQUESTS_FORWARDED_TOTAL).increment(1);
}
