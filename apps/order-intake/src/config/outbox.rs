//! Outbox relay configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::services::OutboxRelayConfig;

/// Outbox relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxConfig {
    /// Milliseconds between drain passes.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Records claimed per pass.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Delivery attempts before a record is marked failed.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Claim lease in seconds.
    #[serde(default = "default_lease_secs")]
    pub lease_secs: u64,
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            batch_size: default_batch_size(),
            max_attempts: default_max_attempts(),
            lease_secs: default_lease_secs(),
        }
    }
}

impl OutboxConfig {
    /// Relay settings.
    #[must_use]
    pub const fn relay_config(&self) -> OutboxRelayConfig {
        OutboxRelayConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            batch_size: self.batch_size,
            max_attempts: self.max_attempts,
            lease: Duration::from_secs(self.lease_secs),
        }
    }
}

const fn default_poll_interval_ms() -> u64 {
    500
}

const fn default_batch_size() -> usize {
    50
}

const fn default_max_attempts() -> u32 {
    5
}

const fn default_lease_secs() -> u64 {
    30
}
