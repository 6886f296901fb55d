//! Configuration validation
//!
//! Common checks shared by the timeout and detector configuration types.

use std::time::Duration;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid timeout value: {0}")]
    InvalidTimeout(String),

    #[error("Invalid configuration parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration conflict: {0}")]
    Conflict(String),

    #[error("Malformed configuration document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration validation trait
pub trait Validator {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` variant if any validation fails:
    /// - `InvalidTimeout` - if timeout values are zero or exceed limits
    /// - `InvalidParameter` - if detector parameters are outside valid ranges
    /// - `Conflict` - if a timeout is above the configured ceiling
    fn validate(&self) -> ConfigResult<()>;
}

/// Common configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Longest timeout any dimension may be configured with.
    pub const TIMEOUT_LIMIT: Duration = Duration::from_secs(3600);

    /// Validate timeout duration
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidTimeout` if:
    /// - The timeout duration is zero
    /// - The timeout duration exceeds 1 hour
    pub fn validate_timeout(timeout: Duration, name: &str) -> ConfigResult<()> {
        if timeout.is_zero() {
            return Err(ConfigurationError::InvalidTimeout(format!(
                "{name} cannot be zero"
            )));
        }

        if timeout > Self::TIMEOUT_LIMIT {
            return Err(ConfigurationError::InvalidTimeout(format!(
                "{name} cannot exceed 1 hour"
            )));
        }

        Ok(())
    }

    /// Validate that `value` lies within `min..=max`
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidParameter` when the value is out of range.
    pub fn validate_range<T>(value: T, min: T, max: T, name: &str) -> ConfigResult<()>
    where
        T: PartialOrd + std::fmt::Display,
    {
        if value < min || value > max {
            return Err(ConfigurationError::InvalidParameter(format!(
                "{name} must be between {min} and {max}, got {value}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ConfigValidator::validate_timeout(Duration::ZERO, "dns_timeout").unwrap_err();
        assert!(err.to_string().contains("dns_timeout cannot be zero"));
    }

    #[test]
    fn range_is_inclusive() {
        assert!(ConfigValidator::validate_range(1u32, 1, 64, "w").is_ok());
        assert!(ConfigValidator::validate_range(64u32, 1, 64, "w").is_ok());
        assert!(ConfigValidator::validate_range(65u32, 1, 64, "w").is_err());
    }
}
