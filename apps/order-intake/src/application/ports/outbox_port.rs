//! Outbox Port (Driven Port)
//!
//! Transactional outbox: the cart clear and the pending event are written in
//! one store operation, and a relay delivers pending events afterwards.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::event_dispatcher_port::EventEnvelope;
use crate::domain::shared::{ExternalUserId, OutboxId, RepositoryError, Timestamp};

/// Delivery state of an outbox record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OutboxStatus {
    /// Waiting for the relay.
    Pending,
    /// Claimed by a relay until the lease runs out.
    InFlight {
        /// Claim expiry.
        lease_until: Timestamp,
    },
    /// Acknowledged by the dispatcher.
    Delivered {
        /// Acknowledgement time.
        at: Timestamp,
    },
    /// Gave up after too many attempts.
    Failed,
}

impl OutboxStatus {
    /// Whether a relay may claim the record at `now`.
    #[must_use]
    pub fn is_claimable(&self, now: Timestamp) -> bool {
        match self {
            Self::Pending => true,
            Self::InFlight { lease_until } => *lease_until <= now,
            Self::Delivered { .. } | Self::Failed => false,
        }
    }
}

/// An event waiting for delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxRecord {
    /// Record id, reused as the envelope id.
    pub id: OutboxId,
    /// Event to deliver.
    pub envelope: EventEnvelope,
    /// Current state.
    pub status: OutboxStatus,
    /// Failed delivery attempts so far.
    pub attempts: u32,
    /// Last delivery error.
    pub last_error: Option<String>,
    /// Enqueue time.
    pub created_at: Timestamp,
}

impl OutboxRecord {
    /// A fresh pending record for `envelope`.
    #[must_use]
    pub fn pending(id: OutboxId, envelope: EventEnvelope) -> Self {
        Self {
            id,
            envelope,
            status: OutboxStatus::Pending,
            attempts: 0,
            last_error: None,
            created_at: Timestamp::now(),
        }
    }
}

/// Outcome of the atomic cart clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartClearance {
    /// The cart was emptied and the record enqueued.
    Cleared,
    /// No user has that identity. Nothing was written.
    UserNotFound,
}

/// Outbox errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OutboxError {
    /// Underlying store failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// No record with that id.
    #[error("Outbox record not found: {id}")]
    RecordNotFound { id: OutboxId },
}

/// Port for the transactional outbox.
#[async_trait]
pub trait OutboxPort: Send + Sync {
    /// Empty the user's cart and enqueue `record` atomically.
    ///
    /// Either both writes happen or neither does.
    async fn clear_cart_and_enqueue(
        &self,
        user: &ExternalUserId,
        record: OutboxRecord,
    ) -> Result<CartClearance, OutboxError>;

    /// Claim up to `limit` claimable records, oldest first, leasing each for
    /// `lease`.
    async fn claim_pending(
        &self,
        limit: usize,
        lease: Duration,
    ) -> Result<Vec<OutboxRecord>, OutboxError>;

    /// Acknowledge delivery. The store may discard the record.
    async fn mark_delivered(&self, id: &OutboxId) -> Result<(), OutboxError>;

    /// Record a failed attempt. The record returns to `Pending`, or becomes
    /// `Failed` once `max_attempts` is reached. Returns the new status.
    async fn record_failure(
        &self,
        id: &OutboxId,
        error: &str,
        max_attempts: u32,
    ) -> Result<OutboxStatus, OutboxError>;

    /// Number of records not yet delivered or failed.
    async fn pending_count(&self) -> Result<usize, OutboxError>;
}
