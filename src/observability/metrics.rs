//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_mount_matches_total` (counter): forward matches by outcome
//! - `router_link_resolutions_total` (counter): link creation by outcome
//! - `router_location_items_skipped_total` (counter): site map items left out
//!   of a Location Map Tree

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Outcome labels: "matched", "no_host", "no_mount", "context_path_mismatch".
pub fn record_mount_match(outcome: &'static str) {
    ::metrics::counter!("router_mount_matches_total", "outcome" => outcome).increment(1);
}

/// Outcome labels: "resolved", "not_found".
pub fn record_link_resolution(outcome: &'static str) {
    ::metrics::counter!("router_link_resolutions_total", "outcome" => outcome).increment(1);
}

pub fn record_skipped_location_item() {
    ::metrics::counter!("router_location_items_skipped_total").increment(1);
}
