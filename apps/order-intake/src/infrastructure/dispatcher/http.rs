//! HTTP event dispatcher.
//!
//! Posts events to an Inngest-compatible ingest endpoint:
//! `POST {base_url}/e/{event_key}` with a JSON array of envelopes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::application::ports::{EventDispatchError, EventDispatcherPort, EventEnvelope};

/// Connection settings for [`HttpEventDispatcher`].
#[derive(Debug, Clone)]
pub struct HttpDispatcherConfig {
    /// Base URL of the event API, without trailing slash.
    pub base_url: String,
    /// Event key identifying the sending app.
    pub event_key: String,
    /// Request timeout.
    pub timeout: Duration,
}

/// Event dispatcher backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpEventDispatcher {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpEventDispatcher {
    /// Create a dispatcher from config.
    pub fn new(config: &HttpDispatcherConfig) -> Result<Self, EventDispatchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EventDispatchError::ConnectionError {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/e/{}",
                config.base_url.trim_end_matches('/'),
                config.event_key
            ),
            timeout: config.timeout,
        })
    }

    /// Ingest URL events are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_send_error(&self, error: &reqwest::Error) -> EventDispatchError {
        if error.is_timeout() {
            EventDispatchError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            EventDispatchError::ConnectionError {
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl EventDispatcherPort for HttpEventDispatcher {
    async fn dispatch(&self, envelope: &EventEnvelope) -> Result<(), EventDispatchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&[envelope])
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(event_id = %envelope.id, event = %envelope.name, "Event sent");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(EventDispatchError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
