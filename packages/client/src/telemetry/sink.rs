//! Observability sinks
//!
//! The controller never logs directly; it hands every reportable condition to
//! an injected [`ObservabilitySink`].

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::events::ControllerEvent;
use crate::classify::Classification;

/// Receives controller events. Called outside the controller's lock.
pub trait ObservabilitySink: Send + Sync {
    fn on_event(&self, event: &ControllerEvent<'_>);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ObservabilitySink for NoopSink {
    fn on_event(&self, _event: &ControllerEvent<'_>) {}
}

/// Logs events through `tracing`.
///
/// Successful requests are logged with their phase breakdown at `info`,
/// timeouts at `debug`, refusals at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ObservabilitySink for TracingSink {
    fn on_event(&self, event: &ControllerEvent<'_>) {
        match event {
            ControllerEvent::OutcomeRecorded(outcome) => match outcome.classification {
                Classification::Success => tracing::info!(
                    url = %outcome.url,
                    dns_lookup_ms = ?outcome.timings.dns_lookup_ms,
                    tcp_connection_ms = ?outcome.timings.tcp_connection_ms,
                    tls_handshake_ms = ?outcome.timings.tls_handshake_ms,
                    server_processing_ms = ?outcome.timings.server_processing_ms,
                    content_transfer_ms = ?outcome.timings.content_transfer_ms,
                    total_ms = ?outcome.timings.total_ms,
                    request_timeout_ms = outcome.timeouts.request_timeout_ms,
                    dns_timeout_ms = outcome.timeouts.dns_timeout_ms,
                    tls_timeout_ms = outcome.timeouts.tls_timeout_ms,
                    "HTTP stats"
                ),
                classification => tracing::debug!(
                    url = %outcome.url,
                    %classification,
                    reason = outcome.timeout_reason(),
                    "request failed"
                ),
            },
            ControllerEvent::ConsecutiveRunTripped { run_size, cause } => {
                tracing::info!(?cause, "{run_size} consecutive timeouts occurred");
            }
            ControllerEvent::WindowThresholdExceeded {
                timeout_percent,
                threshold_percent,
                cause,
            } => tracing::debug!(
                ?cause,
                "window threshold reached [{timeout_percent}%] is > [{threshold_percent}%]"
            ),
            ControllerEvent::EscalationApplied {
                dimension,
                from,
                to,
                rebuild_transport,
            } => tracing::info!(
                rebuild_transport,
                "updating {dimension} timeout from {from:?} to {to:?}"
            ),
            ControllerEvent::EscalationRefused {
                dimension,
                attempted,
                max,
            } => tracing::warn!(
                ?attempted,
                "can't update {dimension} timeout, reached its maximum {max:?}"
            ),
        }
    }
}

/// Keeps events in memory, in arrival order.
///
/// Unbounded by default, which suits tests. Use
/// [`with_limit`](Self::with_limit) for a long-lived audit trail; once full,
/// the oldest event is dropped for each new one.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<VecDeque<ControllerEvent<'static>>>,
    limit: Option<usize>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most the newest `limit` events (at least one).
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(limit.max(1))),
            limit: Some(limit.max(1)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<ControllerEvent<'static>>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of everything retained so far.
    #[must_use]
    pub fn events(&self) -> Vec<ControllerEvent<'static>> {
        self.lock().iter().cloned().collect()
    }

    /// Remove and return everything retained so far.
    pub fn drain(&self) -> Vec<ControllerEvent<'static>> {
        self.lock().drain(..).collect()
    }
}

impl ObservabilitySink for RecordingSink {
    fn on_event(&self, event: &ControllerEvent<'_>) {
        let mut events = self.lock();
        if self.limit.is_some_and(|limit| events.len() >= limit) {
            events.pop_front();
        }
        events.push_back(event.clone().into_owned());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::Dimension;

    fn refused(attempted_ms: u64) -> ControllerEvent<'static> {
        ControllerEvent::EscalationRefused {
            dimension: Dimension::Request,
            attempted: Duration::from_millis(attempted_ms),
            max: Duration::from_millis(10),
        }
    }

    #[test]
    fn bounded_sink_keeps_newest_events() {
        let sink = RecordingSink::with_limit(2);
        for attempted in [20, 30, 40] {
            sink.on_event(&refused(attempted));
        }
        assert_eq!(sink.events(), vec![refused(30), refused(40)]);
    }

    #[test]
    fn drain_empties_the_sink() {
        let sink = RecordingSink::new();
        sink.on_event(&refused(20));
        assert_eq!(sink.drain().len(), 1);
        assert!(sink.events().is_empty());
    }
}
