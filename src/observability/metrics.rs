//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_proxy_requests_total` (counter): proxied requests by route, method, status
//! - `gateway_proxy_duration_seconds` (histogram): latency by route
//! - `gateway_guard_redirects_total` (counter): Route Guard redirects by reason
//! - `gateway_session_errors_total` (counter): session resolver failures by caller
//! - `gateway_chat_replies_total` (counter): chat replies produced
//!
//! Recording is a no-op until a recorder is installed, so handlers and tests
//! call these unconditionally.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_counter!("gateway_proxy_requests_total", "Total number of proxied requests");
            describe_histogram!("gateway_proxy_duration_seconds", "Duration of proxied requests in seconds");
            describe_counter!("gateway_guard_redirects_total", "Route Guard redirects");
            describe_counter!("gateway_session_errors_total", "Session resolution failures");
            describe_counter!("gateway_chat_replies_total", "Chat replies produced");
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus recorder"),
    }
}

pub fn record_proxy_request(route: &'static str, method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_proxy_requests_total",
        "route" => route,
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_proxy_duration_seconds", "route" => route).record(start.elapsed().as_secs_f64());
}

pub fn record_guard_redirect(reason: &'static str) {
    counter!("gateway_guard_redirects_total", "reason" => reason).increment(1);
}

pub fn record_session_error(caller: &'static str) {
    counter!("gateway_session_errors_total", "caller" => caller).increment(1);
}

pub fn record_chat_reply() {
    counter!("gateway_chat_replies_total").increment(1);
}
