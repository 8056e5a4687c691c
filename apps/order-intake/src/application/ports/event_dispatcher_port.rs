//! Event Dispatcher Port (Driven Port)
//!
//! Interface for handing domain events to the background job system.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ordering::OrderCreated;
use crate::domain::shared::OutboxId;

/// Event dispatch error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventDispatchError {
    /// The endpoint could not be reached.
    #[error("Event dispatch connection error: {message}")]
    ConnectionError { message: String },

    /// The endpoint did not answer in time.
    #[error("Event dispatch timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The event could not be encoded.
    #[error("Event serialization error: {message}")]
    SerializationError { message: String },

    /// The endpoint answered with a non-success status.
    #[error("Event dispatch rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// A named event as sent to the event API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Idempotency id. Redeliveries of one outbox record reuse it.
    pub id: String,
    /// Event name, e.g. `order/created`.
    pub name: String,
    /// Event payload.
    pub data: Value,
    /// Creation time in Unix milliseconds.
    pub ts: i64,
}

impl EventEnvelope {
    /// Create an envelope.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, data: Value, ts: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data,
            ts,
        }
    }

    /// Wrap an `order/created` event.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if the payload cannot be encoded.
    pub fn order_created(id: &OutboxId, event: &OrderCreated) -> Result<Self, EventDispatchError> {
        let data = serde_json::to_value(event).map_err(|e| {
            EventDispatchError::SerializationError {
                message: e.to_string(),
            }
        })?;
        Ok(Self::new(id.as_str(), OrderCreated::NAME, data, event.date))
    }
}

/// Port for dispatching events.
#[async_trait]
pub trait EventDispatcherPort: Send + Sync {
    /// Dispatch one event. Returns once the receiver has acknowledged it.
    async fn dispatch(&self, envelope: &EventEnvelope) -> Result<(), EventDispatchError>;
}

/// Dispatcher that drops every event.
#[derive(Debug, Clone, Default)]
pub struct NoOpEventDispatcher;

#[async_trait]
impl EventDispatcherPort for NoOpEventDispatcher {
    async fn dispatch(&self, _envelope: &EventEnvelope) -> Result<(), EventDispatchError> {
        Ok(())
    }
}
