//! Prometheus metrics for order intake.
//!
//! # Example
//!
//! ```ignore
//! use order_intake::observability::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_order_placed("placed", 0.012);
//! ```

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for latency measurements (in seconds).
    pub latency_buckets: Vec<f64>,
    /// Histogram buckets for order amounts (currency units).
    pub amount_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 9090)),
            // 1ms to 10s
            latency_buckets: vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
            amount_buckets: vec![
                10.0, 50.0, 100.0, 250.0, 500.0, 1_000.0, 2_500.0, 5_000.0, 10_000.0,
            ],
        }
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            ..Default::default()
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .set_buckets_for_metric(Matcher::Full("order_amount".to_string()), &config.amount_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Order Intake Metrics
// ============================================================================

/// Record the outcome of one order request.
///
/// # Arguments
///
/// * `outcome` - `placed`, `invalid`, `product_not_found`, `user_not_found` or `error`
/// * `latency_seconds` - Handler time in seconds
pub fn record_order_placed(outcome: &str, latency_seconds: f64) {
    counter!("orders_placed_total", "outcome" => outcome.to_string()).increment(1);
    histogram!("order_intake_latency_seconds", "outcome" => outcome.to_string())
        .record(latency_seconds);
}

/// Record the charged amount of an accepted order.
pub fn record_order_amount(amount: f64) {
    histogram!("order_amount").record(amount);
}

// ============================================================================
// Event Delivery Metrics
// ============================================================================

/// Record one dispatch attempt (`ok` or `error`).
pub fn record_event_dispatch(result: &str) {
    counter!("events_dispatched_total", "result" => result.to_string()).increment(1);
}

/// Record one outbox delivery outcome (`delivered`, `retry` or `failed`).
pub fn record_outbox_delivery(result: &str) {
    counter!("outbox_deliveries_total", "result" => result.to_string()).increment(1);
}

/// Update the pending outbox gauge.
#[allow(clippy::cast_precision_loss)]
pub fn update_outbox_pending(count: usize) {
    gauge!("outbox_pending").set(count as f64);
}
