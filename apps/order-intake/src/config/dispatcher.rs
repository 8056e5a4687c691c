//! Event dispatcher configuration.

use serde::{Deserialize, Serialize};

use crate::application::use_cases::DispatchMode;

/// Event dispatcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// `outbox` (default) or `direct`.
    #[serde(default)]
    pub mode: DispatchMode,
    /// Event API base URL. Events are only logged when unset.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Event key appended to the ingest path.
    #[serde(default)]
    pub event_key: Option<String>,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::default(),
            base_url: None,
            event_key: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl DispatcherConfig {
    /// Base URL, treating an empty value as unset.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Event key, treating an empty value as unset.
    #[must_use]
    pub fn event_key(&self) -> Option<&str> {
        self.event_key.as_deref().filter(|s| !s.trim().is_empty())
    }
}

const fn default_timeout_ms() -> u64 {
    10_000
}
