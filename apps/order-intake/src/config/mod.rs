//! Configuration module for the order intake service.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation for all service components.
//!
//! # Usage
//!
//! ```rust,ignore
//! use order_intake::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("deploy/config.yaml"))?;
//!
//! println!("HTTP port: {}", config.server.http_port);
//! ```

mod auth;
mod dispatcher;
mod observability;
mod outbox;
mod persistence;
mod pricing;
mod server;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::AuthConfig;
pub use dispatcher::DispatcherConfig;
pub use observability::{LoggingConfig, MetricsSettings, ObservabilityConfig, OtelSettings};
pub use outbox::OutboxConfig;
pub use persistence::PersistenceConfig;
pub use pricing::PricingConfig;
pub use server::ServerConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Identity configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Event dispatcher configuration.
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
    /// Outbox relay configuration.
    #[serde(default)]
    pub outbox: OutboxConfig,
    /// Order pricing configuration.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Store configuration.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let metrics = &config.observability.metrics;
    if metrics.enabled && metrics.port == config.server.http_port {
        return Err(ConfigError::ValidationError(
            "server.http_port and observability.metrics.port must be different".to_string(),
        ));
    }

    let fee_rate = config.pricing.fee_rate;
    if fee_rate < Decimal::ZERO || fee_rate > Decimal::ONE {
        return Err(ConfigError::ValidationError(
            "pricing.fee_rate must be between 0 and 1".to_string(),
        ));
    }

    if config.outbox.batch_size == 0 {
        return Err(ConfigError::ValidationError(
            "outbox.batch_size must be positive".to_string(),
        ));
    }

    if config.outbox.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "outbox.max_attempts must be positive".to_string(),
        ));
    }

    if config.outbox.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "outbox.poll_interval_ms must be positive".to_string(),
        ));
    }

    if config.dispatcher.base_url().is_some() && config.dispatcher.event_key().is_none() {
        return Err(ConfigError::ValidationError(
            "dispatcher.event_key is required when dispatcher.base_url is set".to_string(),
        ));
    }

    if config.auth.user_id_header.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "auth.user_id_header must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::DispatchMode;
    use crate::observability::LogFormat;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.http_port, 3000);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.auth.user_id_header, "x-user-id");
        assert_eq!(config.dispatcher.mode, DispatchMode::Outbox);
        assert!(config.dispatcher.base_url().is_none());
        assert_eq!(config.dispatcher.timeout_ms, 10_000);
        assert_eq!(config.outbox.batch_size, 50);
        assert_eq!(config.pricing.fee_rate, dec!(0.02));
        assert_eq!(config.observability.metrics.port, 9090);
        assert!(!config.observability.otel.enabled);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_minimal_config() {
        let yaml = r"
server:
  http_port: 8080
";

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load minimal config: {e}"),
        };
        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.pricing.fee_rate, dec!(0.02)); // Default value
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "mode: ${ORDER_INTAKE_TEST_NONEXISTENT_VAR:-outbox}";
        let result = interpolate_env_vars(input);

        assert_eq!(result, "mode: outbox");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        // PATH should always exist
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);

        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "event_key: ${ORDER_INTAKE_TEST_UNLIKELY_TO_EXIST}";
        let result = interpolate_env_vars(input);

        assert_eq!(result, "event_key: ");
    }

    #[test]
    fn test_validation_same_ports() {
        let yaml = r"
server:
  http_port: 9090
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for duplicate ports");
        };
        assert!(err.to_string().contains("must be different"));
    }

    #[test]
    fn test_same_ports_allowed_when_metrics_disabled() {
        let yaml = r"
server:
  http_port: 9090
observability:
  metrics:
    enabled: false
";

        assert!(load_config_from_string(yaml).is_ok());
    }

    #[test]
    fn test_validation_invalid_fee_rate() {
        let yaml = r"
pricing:
  fee_rate: 1.5
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for invalid fee_rate");
        };
        assert!(err.to_string().contains("fee_rate"));
    }

    #[test]
    fn test_validation_zero_batch_size() {
        let yaml = r"
outbox:
  batch_size: 0
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero batch size");
        };
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn test_validation_base_url_requires_event_key() {
        let yaml = r#"
dispatcher:
  base_url: "https://inn.gs"
"#;

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for missing event key");
        };
        assert!(err.to_string().contains("event_key"));
    }

    #[test]
    fn test_empty_base_url_means_unset() {
        let yaml = r#"
dispatcher:
  base_url: "${ORDER_INTAKE_TEST_UNSET_BASE_URL:-}"
"#;

        let config = load_config_from_string(yaml).unwrap();
        assert!(config.dispatcher.base_url().is_none());
    }

    #[test]
    fn test_unknown_dispatch_mode_rejected() {
        let yaml = r"
dispatcher:
  mode: fire_and_forget
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for unknown mode");
        };
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_file() {
        let Err(err) = load_config(Some("/nonexistent/order-intake.yaml")) else {
            panic!("expected read error");
        };
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
server:
  http_port: 3001
  bind_address: "127.0.0.1"

auth:
  user_id_header: "x-clerk-user-id"

dispatcher:
  mode: direct
  base_url: "https://inn.gs"
  event_key: "test-key"
  timeout_ms: 2500

outbox:
  poll_interval_ms: 250
  batch_size: 10
  max_attempts: 8
  lease_secs: 60

pricing:
  fee_rate: 0.05

persistence:
  seed_path: "seed.yaml"

observability:
  logging:
    level: "debug"
    format: "pretty"
  metrics:
    enabled: true
    port: 9191
  otel:
    enabled: true
    endpoint: "http://otel:4317"
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };

        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.auth.user_id_header, "x-clerk-user-id");
        assert_eq!(config.dispatcher.mode, DispatchMode::Direct);
        assert_eq!(config.dispatcher.base_url(), Some("https://inn.gs"));
        assert_eq!(config.dispatcher.event_key(), Some("test-key"));
        assert_eq!(config.dispatcher.timeout_ms, 2500);
        let relay = config.outbox.relay_config();
        assert_eq!(relay.batch_size, 10);
        assert_eq!(relay.max_attempts, 8);
        assert_eq!(relay.lease.as_secs(), 60);
        assert_eq!(config.pricing.policy().fee_rate(), dec!(0.05));
        assert_eq!(config.persistence.seed_path.as_deref(), Some("seed.yaml"));
        assert_eq!(config.observability.logging.level, "debug");
        assert_eq!(config.observability.logging.format, LogFormat::Pretty);
        assert_eq!(config.observability.metrics.port, 9191);
        assert_eq!(config.observability.otel.endpoint, "http://otel:4317");
    }
}
