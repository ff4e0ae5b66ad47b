//! Prometheus metrics infrastructure.
//!
//! - [`MetricsConfig`]: configuration for the metrics system
//! - [`init_metrics`]: install the Prometheus recorder
//! - [`metrics_handler`]: axum handler for `/metrics`
//! - Business metric helpers for route computations
//!
//! ```no_run
//! use rotafacil_service::metrics::{init_metrics, metrics_handler, MetricsConfig};
//! use axum::{routing::get, Router};
//!
//! init_metrics(&MetricsConfig::default()).expect("failed to initialize metrics");
//! let app: Router = Router::new().route("/metrics", get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// `METRICS_ENABLED`: anything but "false" enables metrics (default: true).
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| !v.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        Self { enabled }
    }
}

/// Install the Prometheus recorder. Must run once, before anything is
/// recorded.
///
/// # Errors
///
/// Fails when metrics are disabled, already initialized, or the recorder
/// cannot be installed.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

/// Prometheus exposition format text.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

#[derive(Debug, Clone)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

// =============================================================================
// Business Metrics Helpers
// =============================================================================

/// Increments `rotafacil_routes_computed_total{strategy}`.
pub fn record_route_computed(strategy: &str) {
    metrics::counter!(
        "rotafacil_routes_computed_total",
        "strategy" => strategy.to_string()
    )
    .increment(1);
}

/// Increments `rotafacil_routes_failed_total{reason}`.
pub fn record_route_failed(reason: &str) {
    metrics::counter!(
        "rotafacil_routes_failed_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Records to the `rotafacil_route_stops` histogram.
pub fn record_route_stops(stops: usize, strategy: &str) {
    metrics::histogram!(
        "rotafacil_route_stops",
        "strategy" => strategy.to_string()
    )
    .record(stops as f64);
}

/// Increments `rotafacil_waypoint_events_total{event}` for registry changes.
pub fn record_waypoint_event(event: &str) {
    metrics::counter!(
        "rotafacil_waypoint_events_total",
        "event" => event.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_default() {
        assert!(MetricsConfig::default().enabled);
    }

    #[tokio::test]
    async fn test_metrics_handler_before_init_returns_comment() {
        assert_eq!(metrics_handler().await, "# Metrics not initialized\n");
    }

    #[test]
    fn test_business_metrics_record_without_recorder() {
        record_route_computed("optimized");
        record_route_failed("routing_unavailable");
        record_route_stops(4, "sequential_fallback");
        record_waypoint_event("added");
    }

    #[test]
    fn test_metrics_error_display() {
        assert_eq!(MetricsError::Disabled.to_string(), "metrics are disabled");
        assert!(MetricsError::InstallFailed("boom".into())
            .to_string()
            .contains("boom"));
    }
}
