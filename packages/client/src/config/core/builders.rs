//! Builder methods for adaptive controller configuration
//!
//! Each method mirrors one named construction option. Validation happens once,
//! when the controller is built, not per call.

use std::time::Duration;

use super::types::AdaptiveConfig;

impl AdaptiveConfig {
    /// Set the starting timeout for all three dimensions
    ///
    /// Call [`with_transport_timeouts`](Self::with_transport_timeouts)
    /// afterwards to start DNS and TLS elsewhere.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use pto_client::config::AdaptiveConfig;
    ///
    /// let config = AdaptiveConfig::default()
    ///     .with_default_timeout(Duration::from_millis(10));
    /// assert_eq!(config.timeouts.request_timeout, Duration::from_millis(10));
    /// assert_eq!(config.timeouts.dns_timeout, Duration::from_millis(10));
    /// assert_eq!(config.timeouts.tls_timeout, Duration::from_millis(10));
    /// ```
    #[must_use]
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.request_timeout = timeout;
        self.timeouts.dns_timeout = timeout;
        self.timeouts.tls_timeout = timeout;
        self
    }

    /// Override the starting dial (DNS + TCP) and TLS handshake timeouts
    #[must_use]
    pub fn with_transport_timeouts(mut self, dns_timeout: Duration, tls_timeout: Duration) -> Self {
        self.timeouts.dns_timeout = dns_timeout;
        self.timeouts.tls_timeout = tls_timeout;
        self
    }

    /// Set the ceiling no timeout may be escalated past
    #[must_use]
    pub fn with_max_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.max_timeout = timeout;
        self
    }

    /// Set the amount added to a dimension on each escalation
    #[must_use]
    pub fn with_timeout_increment(mut self, step: Duration) -> Self {
        self.timeouts.increment_step = step;
        self
    }

    /// Set how many consecutive timeouts trip the run detector
    ///
    /// # Examples
    /// ```
    /// use pto_client::config::AdaptiveConfig;
    ///
    /// let config = AdaptiveConfig::default()
    ///     .with_consecutive_run_size(3)
    ///     .with_consecutive_style(true);
    /// assert_eq!(config.consecutive_run_size, 3);
    /// assert!(config.consecutive_style_enabled);
    /// ```
    #[must_use]
    pub fn with_consecutive_run_size(mut self, size: u32) -> Self {
        self.consecutive_run_size = size;
        self
    }

    /// Enable or disable escalation on consecutive timeouts
    #[must_use]
    pub fn with_consecutive_style(mut self, enabled: bool) -> Self {
        self.consecutive_style_enabled = enabled;
        self
    }

    /// Set how many outcomes the sliding window holds
    #[must_use]
    pub fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    /// Set the timeout percentage a full window must exceed
    #[must_use]
    pub fn with_window_threshold_percent(mut self, percent: u8) -> Self {
        self.window_threshold_percent = percent;
        self
    }

    /// Enable or disable escalation on the sliding window
    #[must_use]
    pub fn with_window_style(mut self, enabled: bool) -> Self {
        self.window_style_enabled = enabled;
        self
    }
}
