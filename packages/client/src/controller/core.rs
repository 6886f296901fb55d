//! Adaptive controller
//!
//! Owns the timeout configuration and both detectors behind one mutex. Each
//! recorded outcome is a single critical section: detectors update, at most
//! one escalation is computed, and the configuration is swapped whole.

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arrayvec::ArrayVec;

use super::decision::Decision;
use crate::classify::{Outcome, TimeoutCause};
use crate::config::{
    AdaptiveConfig, ConfigResult, ConfigValidator, ConfigurationError, MAX_CONSECUTIVE_RUN_SIZE,
    TimeoutConfiguration, Validator,
};
use crate::detect::{ConsecutiveRunDetector, SlidingWindowDetector, WindowSnapshot};
use crate::escalation::{EscalationResult, compute_update};
use crate::telemetry::{
    ControllerEvent, ControllerStats, ControllerStatsSnapshot, ObservabilitySink, TracingSink,
};

struct ControllerState {
    config: TimeoutConfiguration,
    consecutive: ConsecutiveRunDetector,
    window: SlidingWindowDetector,
    consecutive_enabled: bool,
    window_enabled: bool,
    generation: u64,
}

/// Events one `record` call can raise after the outcome itself: a run trip,
/// a window trip and an escalation result.
type PendingEvents = ArrayVec<ControllerEvent<'static>, 3>;

/// Records request outcomes and escalates timeouts when history calls for it.
pub struct AdaptiveController {
    state: Mutex<ControllerState>,
    sink: Arc<dyn ObservabilitySink>,
    stats: Arc<ControllerStats>,
}

impl AdaptiveController {
    /// Build a controller reporting through [`TracingSink`].
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if `config` fails validation.
    pub fn new(config: AdaptiveConfig) -> ConfigResult<Self> {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Build a controller reporting through `sink`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if `config` fails validation.
    pub fn with_sink(config: AdaptiveConfig, sink: Arc<dyn ObservabilitySink>) -> ConfigResult<Self> {
        config.validate()?;
        let state = ControllerState {
            config: config.timeouts,
            consecutive: ConsecutiveRunDetector::new(config.consecutive_run_size),
            window: SlidingWindowDetector::new(config.window_size, config.window_threshold_percent),
            consecutive_enabled: config.consecutive_style_enabled,
            window_enabled: config.window_style_enabled,
            generation: 0,
        };
        Ok(Self {
            state: Mutex::new(state),
            sink,
            stats: Arc::new(ControllerStats::new()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        // State is never left half-updated, so a poisoned lock is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: &ControllerEvent<'_>) {
        self.stats.on_event(event);
        self.sink.on_event(event);
    }

    /// Record an outcome and return the configuration for the next request.
    pub fn on_outcome(&self, outcome: Outcome) -> TimeoutConfiguration {
        self.record(outcome).config
    }

    /// Record an outcome and return the full decision.
    ///
    /// Both detectors are always updated, whether or not their style is
    /// enabled. If both trip on the same outcome only one escalation is
    /// applied.
    pub fn record(&self, outcome: Outcome) -> Decision {
        let is_timeout = outcome.is_timeout();
        let cause = outcome.classification.cause();
        self.emit(&ControllerEvent::OutcomeRecorded(Cow::Borrowed(&outcome)));

        let mut pending = PendingEvents::new();
        let decision = {
            let mut state = self.lock();
            let mut trigger: Option<TimeoutCause> = None;

            if state.consecutive.record(is_timeout) {
                pending.push(ControllerEvent::ConsecutiveRunTripped {
                    run_size: state.consecutive.run_size(),
                    cause,
                });
                if state.consecutive_enabled {
                    trigger = Some(cause);
                }
            }

            let verdict = state.window.record(outcome);
            if state.window_enabled && !verdict.window_full {
                tracing::debug!(
                    remaining = state.window.remaining(),
                    "sliding window not yet full"
                );
            }
            if let Some(window_cause) = verdict.trigger {
                pending.push(ControllerEvent::WindowThresholdExceeded {
                    timeout_percent: verdict.timeout_percent,
                    threshold_percent: state.window.snapshot().threshold_percent,
                    cause: window_cause,
                });
                if state.window_enabled {
                    trigger.get_or_insert(window_cause);
                }
            }

            let escalation = trigger.map(|cause| compute_update(cause, &state.config));
            match escalation {
                Some(EscalationResult::Applied {
                    config,
                    dimension,
                    previous,
                    rebuild_transport,
                }) => {
                    state.config = config;
                    state.generation += 1;
                    pending.push(ControllerEvent::EscalationApplied {
                        dimension,
                        from: previous,
                        to: config.get(dimension),
                        rebuild_transport,
                    });
                }
                Some(EscalationResult::Refused {
                    dimension,
                    attempted,
                    max,
                }) => pending.push(ControllerEvent::EscalationRefused {
                    dimension,
                    attempted,
                    max,
                }),
                None => {}
            }

            Decision {
                config: state.config,
                generation: state.generation,
                escalation,
            }
        };

        for event in &pending {
            self.emit(event);
        }
        decision
    }

    /// Configuration currently in force.
    #[must_use]
    pub fn current(&self) -> TimeoutConfiguration {
        self.lock().config
    }

    /// Configuration currently in force with its generation, read together.
    #[must_use]
    pub fn current_with_generation(&self) -> (TimeoutConfiguration, u64) {
        let state = self.lock();
        (state.config, state.generation)
    }

    pub fn set_consecutive_style(&self, enabled: bool) {
        self.lock().consecutive_enabled = enabled;
    }

    pub fn set_window_style(&self, enabled: bool) {
        self.lock().window_enabled = enabled;
    }

    /// Change W. Consecutive history is discarded.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidParameter` unless `1 <= run_size <= 64`.
    pub fn set_consecutive_run_size(&self, run_size: u32) -> ConfigResult<()> {
        ConfigValidator::validate_range(run_size, 1, MAX_CONSECUTIVE_RUN_SIZE, "consecutive_run_size")?;
        self.lock().consecutive.reconfigure(run_size);
        Ok(())
    }

    /// Change K. Oldest outcomes are evicted until the window fits.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidParameter` if `size` is zero.
    pub fn set_window_size(&self, size: usize) -> ConfigResult<()> {
        if size == 0 {
            return Err(ConfigurationError::InvalidParameter(
                "window_size must be at least 1".to_string(),
            ));
        }
        self.lock().window.resize(size);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidParameter` if `percent` exceeds 100.
    pub fn set_window_threshold_percent(&self, percent: u8) -> ConfigResult<()> {
        ConfigValidator::validate_range(percent, 0, 100, "window_threshold_percent")?;
        self.lock().window.set_threshold_percent(percent);
        Ok(())
    }

    /// Copy of the consecutive-run detector state.
    #[must_use]
    pub fn consecutive_detector(&self) -> ConsecutiveRunDetector {
        self.lock().consecutive.clone()
    }

    #[must_use]
    pub fn window_snapshot(&self) -> WindowSnapshot {
        self.lock().window.snapshot()
    }

    #[must_use]
    pub fn stats(&self) -> ControllerStatsSnapshot {
        self.stats.snapshot()
    }
}

impl fmt::Debug for AdaptiveController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("AdaptiveController")
            .field("config", &state.config)
            .field("generation", &state.generation)
            .field("consecutive", &state.consecutive)
            .field("window", &state.window.snapshot())
            .field("consecutive_enabled", &state.consecutive_enabled)
            .field("window_enabled", &state.window_enabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::classify::Classification;
    use crate::config::Dimension;
    use crate::telemetry::RecordingSink;

    fn base_config() -> AdaptiveConfig {
        AdaptiveConfig::default()
            .with_default_timeout(Duration::from_millis(10))
            .with_transport_timeouts(Duration::from_millis(10), Duration::from_millis(10))
            .with_max_timeout(Duration::from_millis(10_000))
            .with_timeout_increment(Duration::from_millis(10))
    }

    fn outcome(controller: &AdaptiveController, classification: Classification) -> Outcome {
        Outcome::new(classification, "https://example.com", &controller.current())
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = AdaptiveController::new(AdaptiveConfig::default().with_window_size(0)).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidParameter(_)));
    }

    #[test]
    fn disabled_styles_never_escalate() {
        let controller = AdaptiveController::new(base_config()).expect("valid");
        for _ in 0..20 {
            let o = outcome(&controller, Classification::RequestTimeout);
            let decision = controller.record(o);
            assert!(decision.escalation.is_none());
        }
        assert_eq!(controller.current().request_timeout, Duration::from_millis(10));
        assert!(controller.stats().consecutive_trips > 0);
    }

    #[test]
    fn both_detectors_tripping_escalates_once() {
        let config = base_config()
            .with_consecutive_style(true)
            .with_consecutive_run_size(2)
            .with_window_style(true)
            .with_window_size(2)
            .with_window_threshold_percent(50);
        let sink = Arc::new(RecordingSink::new());
        let controller = AdaptiveController::with_sink(config, sink.clone()).expect("valid");

        controller.record(outcome(&controller, Classification::TlsTimeout));
        let decision = controller.record(outcome(&controller, Classification::TlsTimeout));

        assert_eq!(decision.generation, 1);
        assert_eq!(decision.config.tls_timeout, Duration::from_millis(20));
        assert!(decision.rebuild_transport());
        let applied = sink
            .events()
            .into_iter()
            .filter(|e| matches!(e, ControllerEvent::EscalationApplied { .. }))
            .count();
        assert_eq!(applied, 1);
    }

    #[test]
    fn refusal_is_reported_and_config_kept() {
        let config = base_config()
            .with_max_timeout(Duration::from_millis(15))
            .with_consecutive_style(true)
            .with_consecutive_run_size(1);
        let sink = Arc::new(RecordingSink::new());
        let controller = AdaptiveController::with_sink(config, sink.clone()).expect("valid");

        let decision = controller.record(outcome(&controller, Classification::DnsTimeout));
        assert!(!decision.changed());
        assert_eq!(decision.generation, 0);
        assert_eq!(decision.config, controller.current());
        assert!(sink.events().contains(&ControllerEvent::EscalationRefused {
            dimension: Dimension::Dns,
            attempted: Duration::from_millis(20),
            max: Duration::from_millis(15),
        }));
        assert_eq!(controller.stats().escalations_refused, 1);
    }

    #[test]
    fn runtime_run_size_change_is_validated() {
        let controller = AdaptiveController::new(base_config()).expect("valid");
        assert!(controller.set_consecutive_run_size(0).is_err());
        assert!(controller.set_consecutive_run_size(3).is_ok());
        assert_eq!(controller.consecutive_detector().run_size(), 3);
    }

    #[test]
    fn window_threshold_change_applies_to_next_insert() {
        let config = base_config().with_window_style(true).with_window_size(2);
        let controller = AdaptiveController::new(config).expect("valid");
        controller.record(outcome(&controller, Classification::Success));
        controller.set_window_threshold_percent(40).expect("in range");
        let decision = controller.record(outcome(&controller, Classification::RequestTimeout));
        assert!(decision.changed());
        assert!(controller.set_window_threshold_percent(101).is_err());
    }
}
