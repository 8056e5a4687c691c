//! Outbox Relay Service
//!
//! Background task that delivers pending outbox records to the event
//! dispatcher. Delivery is at-least-once: a record whose relay crashes
//! mid-flight is claimed again once its lease expires, and the envelope id
//! stays the same across attempts.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::application::ports::{EventDispatcherPort, OutboxError, OutboxPort, OutboxStatus};
use crate::observability;

/// Configuration for the outbox relay.
#[derive(Debug, Clone)]
pub struct OutboxRelayConfig {
    /// Time between drain passes.
    pub poll_interval: Duration,
    /// Records claimed per pass.
    pub batch_size: usize,
    /// Attempts before a record is marked failed.
    pub max_attempts: u32,
    /// How long a claim is held before another pass may retry it.
    pub lease: Duration,
}

impl Default for OutboxRelayConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            batch_size: 50,
            max_attempts: 5,
            lease: Duration::from_secs(30),
        }
    }
}

/// Result of one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Records acknowledged by the dispatcher.
    pub delivered: usize,
    /// Records returned to pending for a later pass.
    pub retried: usize,
    /// Records that exhausted their attempts.
    pub failed: usize,
}

impl DrainReport {
    /// Records handled in the pass.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.delivered + self.retried + self.failed
    }
}

/// Delivers outbox records to the dispatcher.
pub struct OutboxRelay<O, D>
where
    O: OutboxPort + ?Sized,
    D: EventDispatcherPort + ?Sized,
{
    outbox: Arc<O>,
    dispatcher: Arc<D>,
    config: OutboxRelayConfig,
}

impl<O, D> OutboxRelay<O, D>
where
    O: OutboxPort + ?Sized,
    D: EventDispatcherPort + ?Sized,
{
    /// Create a new relay.
    pub fn new(outbox: Arc<O>, dispatcher: Arc<D>, config: OutboxRelayConfig) -> Self {
        Self {
            outbox,
            dispatcher,
            config,
        }
    }

    /// Claim one batch and try to deliver each record.
    ///
    /// Dispatch failures are recorded on the record, not returned. Only
    /// outbox store failures abort the pass.
    #[tracing::instrument(name = "outbox.drain", skip_all)]
    pub async fn drain_once(&self) -> Result<DrainReport, OutboxError> {
        let batch = self
            .outbox
            .claim_pending(self.config.batch_size, self.config.lease)
            .await?;

        let mut report = DrainReport::default();

        for record in batch {
            match self.dispatcher.dispatch(&record.envelope).await {
                Ok(()) => {
                    observability::record_event_dispatch("ok");
                    self.outbox.mark_delivered(&record.id).await?;
                    observability::record_outbox_delivery("delivered");
                    report.delivered += 1;
                    tracing::debug!(
                        event_id = %record.id,
                        event = %record.envelope.name,
                        "Event delivered"
                    );
                }
                Err(e) => {
                    observability::record_event_dispatch("error");
                    let status = self
                        .outbox
                        .record_failure(&record.id, &e.to_string(), self.config.max_attempts)
                        .await?;

                    if status == OutboxStatus::Failed {
                        observability::record_outbox_delivery("failed");
                        report.failed += 1;
                        tracing::error!(
                            event_id = %record.id,
                            attempts = record.attempts + 1,
                            error = %e,
                            "Event delivery failed permanently"
                        );
                    } else {
                        observability::record_outbox_delivery("retry");
                        report.retried += 1;
                        tracing::warn!(
                            event_id = %record.id,
                            attempts = record.attempts + 1,
                            error = %e,
                            "Event delivery failed, will retry"
                        );
                    }
                }
            }
        }

        observability::update_outbox_pending(self.outbox.pending_count().await?);

        Ok(report)
    }

    /// Drain on every tick until `shutdown` is cancelled.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        tracing::info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            batch_size = self.config.batch_size,
            max_attempts = self.config.max_attempts,
            "Outbox relay started"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.drain_once().await {
                        Ok(report) if report.total() > 0 => {
                            tracing::info!(
                                delivered = report.delivered,
                                retried = report.retried,
                                failed = report.failed,
                                "Outbox drained"
                            );
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::error!(error = %e, "Outbox drain failed");
                        }
                    }
                }
                () = shutdown.cancelled() => {
                    tracing::info!("Outbox relay shutting down");
                    break;
                }
            }
        }
    }
}
