use tracing_subscriber::EnvFilter;

pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

/// Register help text for every metric the crate emits.
pub fn describe_metrics() {
    metrics::describe_counter!(
        "lobx_universe_fetch_total",
        "Universe metadata fetches by asset class and outcome"
    );
    metrics::describe_gauge!("lobx_universe_assets", "Assets in the cached universe by class");
    metrics::describe_counter!(
        "lobx_imbalance_cache_total",
        "Imbalance lookups served from cache (hit) or recomputed (miss)"
    );
    metrics::describe_counter!(
        "lobx_imbalance_fetch_failures_total",
        "Order book fetches that failed or returned an unusable document"
    );
}

#[cfg(feature = "metrics-exporter")]
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()?;

    describe_metrics();
    tracing::info!(port, "prometheus exporter listening on /metrics");
    metrics::gauge!("lobx_signals_up").set(1.0);
    Ok(())
}

#[cfg(not(feature = "metrics-exporter"))]
pub fn init_metrics(_port: u16) -> anyhow::Result<()> {
    describe_metrics();
    Ok(())
}
