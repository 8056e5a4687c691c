//! Observability module for metrics, tracing, and logging.
//!
//! Prometheus metrics export, structured logging and OTLP span export.

mod metrics;
mod tracing;

pub use self::metrics::{
    MetricsConfig, MetricsError, init_metrics, record_event_dispatch, record_order_amount,
    record_order_placed, record_outbox_delivery, update_outbox_pending,
};
pub use self::tracing::{LogFormat, TracingConfig, TracingError, TracingGuard, init_tracing};
