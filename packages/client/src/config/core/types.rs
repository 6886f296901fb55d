//! Adaptive controller configuration structure

use serde::{Deserialize, Serialize};

use super::defaults::MAX_CONSECUTIVE_RUN_SIZE;
use crate::config::timeouts::TimeoutConfiguration;
use crate::config::validation::{ConfigResult, ConfigValidator, ConfigurationError, Validator};

/// Everything the controller is constructed from.
///
/// Durations serialize as milliseconds; missing fields fall back to the
/// defaults in [`super::defaults`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    /// Starting timeouts, ceiling and increment
    #[serde(flatten)]
    pub timeouts: TimeoutConfiguration,

    /// Number of consecutive timeouts (W) that trips the run detector
    pub consecutive_run_size: u32,

    /// Whether a tripped run detector escalates
    pub consecutive_style_enabled: bool,

    /// Number of outcomes (K) held by the sliding window
    pub window_size: usize,

    /// Timeout percentage a full window must exceed to escalate
    pub window_threshold_percent: u8,

    /// Whether the sliding window escalates
    pub window_style_enabled: bool,
}

impl AdaptiveConfig {
    /// Parse a JSON configuration document and validate it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Parse` for malformed JSON and any
    /// validation error for out-of-range values.
    pub fn from_json_str(document: &str) -> ConfigResult<Self> {
        let config: AdaptiveConfig = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }
}

impl Validator for AdaptiveConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.timeouts.validate()?;
        ConfigValidator::validate_range(
            self.consecutive_run_size,
            1,
            MAX_CONSECUTIVE_RUN_SIZE,
            "consecutive_run_size",
        )?;
        if self.window_size == 0 {
            return Err(ConfigurationError::InvalidParameter(
                "window_size must be at least 1".to_string(),
            ));
        }
        ConfigValidator::validate_range(
            self.window_threshold_percent,
            0,
            100,
            "window_threshold_percent",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn json_document_uses_milliseconds() {
        let config = AdaptiveConfig::from_json_str(
            r#"{
                "request_timeout_ms": 10,
                "dns_timeout_ms": 10,
                "tls_timeout_ms": 10,
                "max_timeout_ms": 10000,
                "timeout_increment_ms": 10,
                "window_style_enabled": true,
                "window_threshold_percent": 50
            }"#,
        )
        .expect("valid document");

        assert_eq!(config.timeouts.request_timeout, Duration::from_millis(10));
        assert_eq!(config.timeouts.max_timeout, Duration::from_millis(10_000));
        assert!(config.window_style_enabled);
        assert_eq!(config.window_threshold_percent, 50);
        assert_eq!(config.window_size, 5);
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let config = AdaptiveConfig::default().with_window_size(8);
        let text = serde_json::to_string(&config).expect("serializable");
        assert_eq!(AdaptiveConfig::from_json_str(&text).expect("parses"), config);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = AdaptiveConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigurationError::Parse(_)));
    }

    #[test]
    fn oversized_run_is_rejected() {
        let config = AdaptiveConfig::default().with_consecutive_run_size(65);
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn threshold_above_hundred_is_rejected() {
        let config = AdaptiveConfig::default().with_window_threshold_percent(101);
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_timeout_seeds_every_dimension() {
        let config = AdaptiveConfig::default()
            .with_default_timeout(Duration::from_millis(10))
            .with_max_timeout(Duration::from_millis(500));
        assert!(config.validate().is_ok());
        assert_eq!(config.timeouts.dns_timeout, Duration::from_millis(10));

        let config = config.with_transport_timeouts(
            Duration::from_millis(30),
            Duration::from_millis(40),
        );
        assert_eq!(config.timeouts.request_timeout, Duration::from_millis(10));
        assert_eq!(config.timeouts.dns_timeout, Duration::from_millis(30));
        assert_eq!(config.timeouts.tls_timeout, Duration::from_millis(40));
    }
}
