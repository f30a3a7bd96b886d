//! Metrics collection and exposition.
//!
//! # Metrics
//! - `hf_proxy_requests_total{method,status,outcome}` (counter)
//! - `hf_proxy_request_duration_seconds{method,status,outcome}` (histogram):
//!   time until upstream headers arrive; the streamed body is not included
//!
//! Label values come from closed sets so clients cannot mint new series:
//! methods outside the standard verbs are folded into `other`.
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Buckets for time-to-first-byte of an upstream file host.
const LATENCY_BUCKETS: &[f64] = &[0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Install the Prometheus recorder and its HTTP scrape listener.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets(LATENCY_BUCKETS)?
        .install()?;

    describe_counter!(
        "hf_proxy_requests_total",
        "Total number of proxy requests handled"
    );
    describe_histogram!(
        "hf_proxy_request_duration_seconds",
        "Time until the response head was ready, in seconds"
    );

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Bounded label for an inbound method.
pub fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::PATCH => "PATCH",
        Method::DELETE => "DELETE",
        Method::CONNECT => "CONNECT",
        Method::TRACE => "TRACE",
        _ => "other",
    }
}

/// Record a handled request.
pub fn record_request(method: &Method, status: u16, outcome: &'static str, start: Instant) {
    let labels = [
        ("method", method_label(method).to_string()),
        ("status", status.to_string()),
        ("outcome", outcome.to_string()),
    ];

    counter!("hf_proxy_requests_total", &labels).increment(1);
    histogram!("hf_proxy_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}
