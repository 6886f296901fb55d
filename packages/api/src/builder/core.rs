//! Core `AdaptiveClientBuilder` structure and option methods

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use pto_client::config::AdaptiveConfig;
use pto_client::controller::AdaptiveController;
use pto_client::telemetry::{ObservabilitySink, TracingSink};
use pto_client::transport::TransportFactory;

use crate::client::AdaptiveClient;

/// Builder for [`AdaptiveClient`]
///
/// Starts from [`AdaptiveConfig::default`]: both escalation styles disabled,
/// events logged through `tracing`.
#[derive(Default)]
pub struct AdaptiveClientBuilder {
    pub(crate) config: AdaptiveConfig,
    pub(crate) sink: Option<Arc<dyn ObservabilitySink>>,
    pub(crate) error: Option<pto_client::Error>,
}

impl AdaptiveClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration, e.g. one loaded from JSON
    #[must_use]
    pub fn config(mut self, config: AdaptiveConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the whole configuration with one parsed from JSON.
    ///
    /// A parse or validation failure is reported by [`build`](Self::build) as a builder
    /// error.
    #[must_use]
    pub fn config_json(mut self, json: &str) -> Self {
        match AdaptiveConfig::from_json_str(json) {
            Ok(config) => self.config = config,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unparsable adaptive timeout config");
                self.error.get_or_insert(pto_client::error::builder(err));
            }
        }
        self
    }

    /// Starting timeout for the request, DNS and TLS dimensions
    #[must_use]
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_default_timeout(timeout);
        self
    }

    /// Starting dial (DNS + TCP) and TLS handshake timeouts, overriding
    /// [`default_timeout`](Self::default_timeout) when called after it
    #[must_use]
    pub fn transport_timeouts(mut self, dns_timeout: Duration, tls_timeout: Duration) -> Self {
        self.config = self.config.with_transport_timeouts(dns_timeout, tls_timeout);
        self
    }

    /// Ceiling no timeout is escalated past
    #[must_use]
    pub fn max_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_max_timeout(timeout);
        self
    }

    /// Amount added to a dimension per escalation
    #[must_use]
    pub fn timeout_increment(mut self, step: Duration) -> Self {
        self.config = self.config.with_timeout_increment(step);
        self
    }

    /// Consecutive timeouts (W) that trip the run detector
    #[must_use]
    pub fn consecutive_run_size(mut self, size: u32) -> Self {
        self.config = self.config.with_consecutive_run_size(size);
        self
    }

    #[must_use]
    pub fn consecutive_style(mut self, enabled: bool) -> Self {
        self.config = self.config.with_consecutive_style(enabled);
        self
    }

    /// Outcomes (K) held by the sliding window
    #[must_use]
    pub fn window_size(mut self, size: usize) -> Self {
        self.config = self.config.with_window_size(size);
        self
    }

    #[must_use]
    pub fn window_threshold_percent(mut self, percent: u8) -> Self {
        self.config = self.config.with_window_threshold_percent(percent);
        self
    }

    #[must_use]
    pub fn window_style(mut self, enabled: bool) -> Self {
        self.config = self.config.with_window_style(enabled);
        self
    }

    /// Where controller events are reported; defaults to [`TracingSink`]
    #[must_use]
    pub fn observer(mut self, sink: Arc<dyn ObservabilitySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validate the configuration and build the first transport.
    ///
    /// # Errors
    ///
    /// Returns a builder error if a JSON configuration failed to parse, or a
    /// configuration error if any option is out of range or a starting
    /// timeout exceeds the maximum.
    pub fn build<F: TransportFactory>(self, factory: F) -> pto_client::Result<AdaptiveClient<F>> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let sink = self.sink.unwrap_or_else(|| Arc::new(TracingSink));
        let controller = AdaptiveController::with_sink(self.config, sink)?;
        Ok(AdaptiveClient::new(controller, factory))
    }
}

impl fmt::Debug for AdaptiveClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptiveClientBuilder")
            .field("config", &self.config)
            .field("custom_sink", &self.sink.is_some())
            .field("error", &self.error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pto_client::transport::ProfileFactory;

    #[test]
    fn options_land_in_config() {
        let builder = AdaptiveClientBuilder::new()
            .default_timeout(Duration::from_millis(10))
            .max_timeout(Duration::from_millis(10_000))
            .timeout_increment(Duration::from_millis(10))
            .consecutive_run_size(5)
            .consecutive_style(false)
            .window_style(true)
            .window_size(5)
            .window_threshold_percent(50)
            .transport_timeouts(Duration::from_millis(10), Duration::from_millis(10));

        let config = &builder.config;
        assert_eq!(config.timeouts.request_timeout, Duration::from_millis(10));
        assert_eq!(config.timeouts.dns_timeout, Duration::from_millis(10));
        assert_eq!(config.window_threshold_percent, 50);
        assert!(config.window_style_enabled);
        assert!(!config.consecutive_style_enabled);
    }

    #[test]
    fn json_config_is_applied() {
        let builder = AdaptiveClientBuilder::new().config_json(
            r#"{"request_timeout_ms": 250, "window_style_enabled": true, "window_size": 8}"#,
        );
        assert_eq!(builder.config.timeouts.request_timeout, Duration::from_millis(250));
        assert_eq!(builder.config.window_size, 8);
        assert!(builder.build(ProfileFactory).is_ok());
    }

    #[test]
    fn unparsable_json_fails_build() {
        let err = AdaptiveClientBuilder::new()
            .config_json("{not json")
            .default_timeout(Duration::from_millis(10))
            .build(ProfileFactory)
            .unwrap_err();
        assert!(err.is_builder());
    }

    #[test]
    fn default_timeout_alone_fits_a_low_ceiling() {
        let client = AdaptiveClientBuilder::new()
            .default_timeout(Duration::from_millis(10))
            .max_timeout(Duration::from_millis(500))
            .build(ProfileFactory)
            .expect("all dimensions start at 10ms");
        let published = client.snapshot();
        assert_eq!(published.transport.connect_timeout, Duration::from_millis(10));
        assert_eq!(published.transport.tls_handshake_timeout, Duration::from_millis(10));
    }

    #[test]
    fn build_rejects_start_above_max() {
        let err = AdaptiveClientBuilder::new()
            .default_timeout(Duration::from_secs(20))
            .max_timeout(Duration::from_secs(10))
            .build(ProfileFactory)
            .unwrap_err();
        assert!(err.is_config());
    }
}
