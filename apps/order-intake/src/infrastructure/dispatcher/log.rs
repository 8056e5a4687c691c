//! Logging event dispatcher for local development.

use async_trait::async_trait;

use crate::application::ports::{EventDispatchError, EventDispatcherPort, EventEnvelope};

/// Writes each event to the log instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct LogEventDispatcher;

#[async_trait]
impl EventDispatcherPort for LogEventDispatcher {
    async fn dispatch(&self, envelope: &EventEnvelope) -> Result<(), EventDispatchError> {
        tracing::info!(
            event_id = %envelope.id,
            event = %envelope.name,
            data = %envelope.data,
            "Event dispatched (log only)"
        );
        Ok(())
    }
}
