//! Escalation engine
//!
//! Turns a trigger cause into a proposed timeout increase for exactly one
//! dimension, capped by the configured maximum.

use std::time::Duration;

use crate::classify::TimeoutCause;
use crate::config::{Dimension, TimeoutConfiguration};

/// Outcome of one escalation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationResult {
    /// The dimension was raised; `config` replaces the current configuration.
    Applied {
        config: TimeoutConfiguration,
        dimension: Dimension,
        previous: Duration,
        /// Dial/handshake timeouts are baked into the transport at build
        /// time; a new one is needed for DNS and TLS escalations.
        rebuild_transport: bool,
    },
    /// Raising the dimension would pass `max`; nothing changed.
    Refused {
        dimension: Dimension,
        attempted: Duration,
        max: Duration,
    },
}

impl EscalationResult {
    #[must_use]
    pub fn dimension(&self) -> Dimension {
        match self {
            EscalationResult::Applied { dimension, .. }
            | EscalationResult::Refused { dimension, .. } => *dimension,
        }
    }

    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, EscalationResult::Applied { .. })
    }

    /// The new configuration, if the escalation was applied.
    #[must_use]
    pub fn applied_config(&self) -> Option<&TimeoutConfiguration> {
        match self {
            EscalationResult::Applied { config, .. } => Some(config),
            EscalationResult::Refused { .. } => None,
        }
    }
}

/// Propose the next configuration for a trigger.
///
/// Only the highest-priority dimension in `trigger` is raised (DNS, then TLS,
/// then request), by `current.increment_step`. A proposal above
/// `current.max_timeout` is refused and `current` stays in force.
///
/// # Panics
///
/// Panics if `trigger` is empty. Detectors only signal with a timeout cause,
/// so an empty trigger means a caller broke that contract.
#[must_use]
pub fn compute_update(trigger: TimeoutCause, current: &TimeoutConfiguration) -> EscalationResult {
    let Some(dimension) = trigger.primary() else {
        panic!("escalation requested without a timeout cause ({trigger:?})");
    };

    let previous = current.get(dimension);
    let proposed = previous
        .checked_add(current.increment_step)
        .unwrap_or(Duration::MAX);

    if proposed > current.max_timeout {
        return EscalationResult::Refused {
            dimension,
            attempted: proposed,
            max: current.max_timeout,
        };
    }

    EscalationResult::Applied {
        config: current.with_dimension(dimension, proposed),
        dimension,
        previous,
        rebuild_transport: dimension.requires_rebuild(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(initial_ms: u64, max_ms: u64, step_ms: u64) -> TimeoutConfiguration {
        TimeoutConfiguration::uniform(
            Duration::from_millis(initial_ms),
            Duration::from_millis(max_ms),
            Duration::from_millis(step_ms),
        )
    }

    #[test]
    fn raises_request_without_rebuild() {
        let current = config(10, 10_000, 10);
        let result = compute_update(TimeoutCause::REQUEST, &current);
        let EscalationResult::Applied {
            config,
            dimension,
            previous,
            rebuild_transport,
        } = result
        else {
            panic!("expected applied, got {result:?}");
        };
        assert_eq!(dimension, Dimension::Request);
        assert_eq!(previous, Duration::from_millis(10));
        assert_eq!(config.request_timeout, Duration::from_millis(20));
        assert_eq!(config.dns_timeout, Duration::from_millis(10));
        assert!(!rebuild_transport);
    }

    #[test]
    fn dns_beats_tls_and_request() {
        let current = config(10, 100, 5);
        let result = compute_update(
            TimeoutCause::REQUEST | TimeoutCause::TLS | TimeoutCause::DNS,
            &current,
        );
        let config = result.applied_config().expect("applied");
        assert_eq!(result.dimension(), Dimension::Dns);
        assert_eq!(config.dns_timeout, Duration::from_millis(15));
        assert_eq!(config.tls_timeout, Duration::from_millis(10));
        assert_eq!(config.request_timeout, Duration::from_millis(10));
    }

    #[test]
    fn tls_rebuilds_transport() {
        let result = compute_update(TimeoutCause::TLS, &config(10, 100, 5));
        assert!(matches!(
            result,
            EscalationResult::Applied {
                dimension: Dimension::Tls,
                rebuild_transport: true,
                ..
            }
        ));
    }

    #[test]
    fn landing_exactly_on_max_is_allowed() {
        let result = compute_update(TimeoutCause::DNS, &config(90, 100, 10));
        assert_eq!(
            result.applied_config().map(|c| c.dns_timeout),
            Some(Duration::from_millis(100))
        );
    }

    #[test]
    fn above_max_is_refused() {
        let result = compute_update(TimeoutCause::TLS, &config(95, 100, 10));
        assert_eq!(
            result,
            EscalationResult::Refused {
                dimension: Dimension::Tls,
                attempted: Duration::from_millis(105),
                max: Duration::from_millis(100),
            }
        );
    }

    #[test]
    #[should_panic(expected = "without a timeout cause")]
    fn empty_trigger_is_a_defect() {
        let _ = compute_update(TimeoutCause::NONE, &config(10, 100, 10));
    }

    #[test]
    fn deserialized_cause_with_stray_bit_escalates() {
        let trigger: TimeoutCause = serde_json::from_str("10").expect("number");
        let result = compute_update(trigger, &config(10, 100, 10));
        assert_eq!(result.dimension(), Dimension::Tls);
        assert!(result.is_applied());
    }
}
