use std::net::SocketAddr;

// ── Domain counters ─────────────────────────────────────────────

/// Counter: reservations created.
pub const RESERVATIONS_CREATED_TOTAL: &str = "seatmap_reservations_created_total";

/// Counter: rejected creates. Labels: reason.
pub const RESERVATION_CONFLICTS_TOTAL: &str = "seatmap_reservation_conflicts_total";

/// Counter: reservations moved to CANCELED.
pub const RESERVATIONS_CANCELED_TOTAL: &str = "seatmap_reservations_canceled_total";

/// Counter: logins. Labels: provisioned.
pub const LOGINS_TOTAL: &str = "seatmap_logins_total";

/// Counter: assistant replies. Labels: outcome.
pub const ASSISTANT_REPLIES_TOTAL: &str = "seatmap_assistant_replies_total";

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: API requests handled. Labels: method, path, status.
pub const REQUESTS_TOTAL: &str = "seatmap_requests_total";

/// Histogram: API request latency in seconds. Labels: method, path.
pub const REQUEST_DURATION_SECONDS: &str = "seatmap_request_duration_seconds";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> anyhow::Result<()> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Install the fmt subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
