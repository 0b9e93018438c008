//! Metrics collection and exposition.
//!
//! # Metrics
//! - `localseo_requests_total` (counter): public requests by outcome, status
//! - `localseo_request_duration_seconds` (histogram): public request latency
//! - `localseo_redirect_hits_total` (counter): redirect rule matches
//! - `localseo_redirect_cache_refresh_total` (counter): rule list reloads
//! - `localseo_pages_total` (gauge): stored LocalPage rows
//! - `localseo_ai_generations_total` (counter): AI runs by result
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - The Prometheus exporter is only installed when enabled in config

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one public request.
pub fn record_request(outcome: &'static str, status: u16, start: Instant) {
    counter!(
        "localseo_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("localseo_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_redirect_hit() {
    counter!("localseo_redirect_hits_total").increment(1);
}

pub fn record_redirect_cache_refresh(rules: usize) {
    counter!("localseo_redirect_cache_refresh_total").increment(1);
    tracing::debug!(rules, "Redirect cache refreshed");
}

pub fn record_page_count(count: i64) {
    gauge!("localseo_pages_total").set(count as f64);
}

/// `result` is `success` or `failure`.
pub fn record_ai_generation(result: &'static str) {
    counter!("localseo_ai_generations_total", "result" => result).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_request("serve", 200, Instant::now());
        record_redirect_hit();
        record_redirect_cache_refresh(3);
        record_page_count(10);
        record_ai_generation("success");
    }
}
