use std::net::SocketAddr;

use crate::model::RequestStatus;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: booking requests created.
pub const REQUESTS_CREATED_TOTAL: &str = "villabook_requests_created_total";

/// Counter: request status transitions applied. Labels: to.
pub const REQUEST_TRANSITIONS_TOTAL: &str = "villabook_request_transitions_total";

/// Histogram: villa filter query latency in seconds.
pub const FILTER_DURATION_SECONDS: &str = "villabook_filter_duration_seconds";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: villas currently held in memory.
pub const VILLAS_ACTIVE: &str = "villabook_villas_active";

/// Histogram: snapshot hydration duration in seconds.
pub const HYDRATE_DURATION_SECONDS: &str = "villabook_hydrate_duration_seconds";

/// Counter: requests dropped during hydration (unknown villa id).
pub const HYDRATE_ORPHANS_TOTAL: &str = "villabook_hydrate_orphans_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Map a status to a short label for metrics.
pub fn status_label(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Pending => "pending",
        RequestStatus::Accepted => "accepted",
        RequestStatus::Declined => "declined",
    }
}
