//! Runtime timeout configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::dimension::Dimension;
use crate::config::core::defaults::{
    DEFAULT_MAX_TIMEOUT, DEFAULT_TIMEOUT, DEFAULT_TIMEOUT_INCREMENT,
};
use crate::config::core::millis;
use crate::config::validation::{ConfigResult, ConfigValidator, ConfigurationError, Validator};

/// The timeout values currently in force, plus the escalation bounds.
///
/// `request_timeout`, `dns_timeout` and `tls_timeout` never exceed
/// `max_timeout`, and `increment_step` is never zero, once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfiguration {
    #[serde(rename = "request_timeout_ms", with = "millis")]
    pub request_timeout: Duration,
    #[serde(rename = "dns_timeout_ms", with = "millis")]
    pub dns_timeout: Duration,
    #[serde(rename = "tls_timeout_ms", with = "millis")]
    pub tls_timeout: Duration,
    #[serde(rename = "max_timeout_ms", with = "millis")]
    pub max_timeout: Duration,
    #[serde(rename = "timeout_increment_ms", with = "millis")]
    pub increment_step: Duration,
}

impl Default for TimeoutConfiguration {
    fn default() -> Self {
        Self::uniform(DEFAULT_TIMEOUT, DEFAULT_MAX_TIMEOUT, DEFAULT_TIMEOUT_INCREMENT)
    }
}

impl TimeoutConfiguration {
    /// Start every dimension at `initial`.
    #[must_use]
    pub fn uniform(initial: Duration, max_timeout: Duration, increment_step: Duration) -> Self {
        Self {
            request_timeout: initial,
            dns_timeout: initial,
            tls_timeout: initial,
            max_timeout,
            increment_step,
        }
    }

    /// Current timeout for one dimension.
    #[inline]
    #[must_use]
    pub fn get(&self, dimension: Dimension) -> Duration {
        match dimension {
            Dimension::Dns => self.dns_timeout,
            Dimension::Tls => self.tls_timeout,
            Dimension::Request => self.request_timeout,
        }
    }

    /// Copy of this configuration with one dimension replaced.
    #[must_use]
    pub fn with_dimension(mut self, dimension: Dimension, value: Duration) -> Self {
        match dimension {
            Dimension::Dns => self.dns_timeout = value,
            Dimension::Tls => self.tls_timeout = value,
            Dimension::Request => self.request_timeout = value,
        }
        self
    }
}

impl Validator for TimeoutConfiguration {
    fn validate(&self) -> ConfigResult<()> {
        ConfigValidator::validate_timeout(self.max_timeout, "max_timeout")?;
        if self.increment_step.is_zero() {
            return Err(ConfigurationError::InvalidTimeout(
                "timeout_increment cannot be zero".to_string(),
            ));
        }
        for dimension in Dimension::PRIORITY {
            let value = self.get(dimension);
            ConfigValidator::validate_timeout(value, dimension.as_str())?;
            if value > self.max_timeout {
                return Err(ConfigurationError::Conflict(format!(
                    "{dimension} timeout {value:?} exceeds max_timeout {:?}",
                    self.max_timeout
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_dimension_leaves_other_axes_alone() {
        let base = TimeoutConfiguration::uniform(
            Duration::from_millis(10),
            Duration::from_millis(100),
            Duration::from_millis(10),
        );
        let raised = base.with_dimension(Dimension::Tls, Duration::from_millis(20));
        assert_eq!(raised.tls_timeout, Duration::from_millis(20));
        assert_eq!(raised.dns_timeout, base.dns_timeout);
        assert_eq!(raised.request_timeout, base.request_timeout);
        assert_eq!(base.tls_timeout, Duration::from_millis(10));
    }

    #[test]
    fn validate_rejects_timeout_above_max() {
        let mut config = TimeoutConfiguration::default();
        config.dns_timeout = config.max_timeout + Duration::from_millis(1);
        assert!(matches!(config.validate(), Err(ConfigurationError::Conflict(_))));
    }

    #[test]
    fn validate_rejects_zero_increment() {
        let mut config = TimeoutConfiguration::default();
        config.increment_step = Duration::ZERO;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidTimeout(_))
        ));
    }

    #[test]
    fn default_is_valid() {
        assert!(TimeoutConfiguration::default().validate().is_ok());
    }
}
