//! Conditions the controller reports

use std::borrow::Cow;
use std::time::Duration;

use crate::classify::{Outcome, TimeoutCause};
use crate::config::Dimension;

/// Something worth reporting happened while recording an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent<'a> {
    /// An outcome was fed to both detectors
    OutcomeRecorded(Cow<'a, Outcome>),
    /// The last `run_size` outcomes were all timeouts
    ConsecutiveRunTripped { run_size: u32, cause: TimeoutCause },
    /// A full window went over its threshold on a timeout insert
    WindowThresholdExceeded {
        timeout_percent: u32,
        threshold_percent: u8,
        cause: TimeoutCause,
    },
    /// A dimension was raised
    EscalationApplied {
        dimension: Dimension,
        from: Duration,
        to: Duration,
        rebuild_transport: bool,
    },
    /// A dimension would have passed the ceiling
    EscalationRefused {
        dimension: Dimension,
        attempted: Duration,
        max: Duration,
    },
}

impl ControllerEvent<'_> {
    /// Detach from any borrowed outcome.
    #[must_use]
    pub fn into_owned(self) -> ControllerEvent<'static> {
        match self {
            ControllerEvent::OutcomeRecorded(outcome) => {
                ControllerEvent::OutcomeRecorded(Cow::Owned(outcome.into_owned()))
            }
            ControllerEvent::ConsecutiveRunTripped { run_size, cause } => {
                ControllerEvent::ConsecutiveRunTripped { run_size, cause }
            }
            ControllerEvent::WindowThresholdExceeded {
                timeout_percent,
                threshold_percent,
                cause,
            } => ControllerEvent::WindowThresholdExceeded {
                timeout_percent,
                threshold_percent,
                cause,
            },
            ControllerEvent::EscalationApplied {
                dimension,
                from,
                to,
                rebuild_transport,
            } => ControllerEvent::EscalationApplied {
                dimension,
                from,
                to,
                rebuild_transport,
            },
            ControllerEvent::EscalationRefused {
                dimension,
                attempted,
                max,
            } => ControllerEvent::EscalationRefused {
                dimension,
                attempted,
                max,
            },
        }
    }
}
