//! Progressive Timeout Prelude
//!
//! The types needed to configure a controller, feed it outcomes and act on
//! its decisions.

pub use crate::classify::{
    Classification, ErrorChain, FailurePhase, FailureSignal, Outcome, Phase, PhaseTimings,
    TimeoutCause, classify,
};
pub use crate::config::{AdaptiveConfig, ConfigurationError, Dimension, TimeoutConfiguration};
pub use crate::controller::{AdaptiveController, Decision};
pub use crate::detect::{ConsecutiveRunDetector, SlidingWindowDetector, WindowVerdict};
pub use crate::error::{DnsTimedOut, RequestTimedOut, TlsHandshakeTimedOut};
pub use crate::escalation::{EscalationResult, compute_update};
pub use crate::telemetry::{
    ControllerEvent, ControllerStatsSnapshot, NoopSink, ObservabilitySink, RecordingSink,
    TracingSink,
};
pub use crate::transport::{ProfileFactory, TransportFactory, TransportProfile};
