//! Cache-padded atomic counters for controller activity

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

use super::events::ControllerEvent;
use super::sink::ObservabilitySink;
use crate::classify::Classification;

/// Lock-free running totals of what the controller has seen and done.
///
/// Fed through the same event stream as any other sink, so the counters
/// always agree with what was reported.
#[derive(Debug, Default)]
pub struct ControllerStats {
    pub outcomes: CachePadded<AtomicU64>,
    pub successes: CachePadded<AtomicU64>,
    pub dns_timeouts: CachePadded<AtomicU64>,
    pub tls_timeouts: CachePadded<AtomicU64>,
    pub request_timeouts: CachePadded<AtomicU64>,
    pub unknown_failures: CachePadded<AtomicU64>,
    pub consecutive_trips: CachePadded<AtomicU64>,
    pub window_trips: CachePadded<AtomicU64>,
    pub escalations_applied: CachePadded<AtomicU64>,
    pub escalations_refused: CachePadded<AtomicU64>,
}

/// Immutable snapshot of controller statistics at a point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerStatsSnapshot {
    pub outcomes: u64,
    pub successes: u64,
    pub dns_timeouts: u64,
    pub tls_timeouts: u64,
    pub request_timeouts: u64,
    pub unknown_failures: u64,
    pub consecutive_trips: u64,
    pub window_trips: u64,
    pub escalations_applied: u64,
    pub escalations_refused: u64,
}

impl ControllerStatsSnapshot {
    /// Outcomes that counted toward the detectors.
    #[must_use]
    pub fn timeouts(&self) -> u64 {
        self.dns_timeouts + self.tls_timeouts + self.request_timeouts
    }
}

#[inline]
fn bump(counter: &CachePadded<AtomicU64>) {
    counter.fetch_add(1, Ordering::Relaxed);
}

impl ControllerStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every counter with relaxed ordering.
    #[must_use]
    pub fn snapshot(&self) -> ControllerStatsSnapshot {
        ControllerStatsSnapshot {
            outcomes: self.outcomes.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            dns_timeouts: self.dns_timeouts.load(Ordering::Relaxed),
            tls_timeouts: self.tls_timeouts.load(Ordering::Relaxed),
            request_timeouts: self.request_timeouts.load(Ordering::Relaxed),
            unknown_failures: self.unknown_failures.load(Ordering::Relaxed),
            consecutive_trips: self.consecutive_trips.load(Ordering::Relaxed),
            window_trips: self.window_trips.load(Ordering::Relaxed),
            escalations_applied: self.escalations_applied.load(Ordering::Relaxed),
            escalations_refused: self.escalations_refused.load(Ordering::Relaxed),
        }
    }
}

impl ObservabilitySink for ControllerStats {
    fn on_event(&self, event: &ControllerEvent<'_>) {
        match event {
            ControllerEvent::OutcomeRecorded(outcome) => {
                bump(&self.outcomes);
                bump(match outcome.classification {
                    Classification::Success => &self.successes,
                    Classification::DnsTimeout => &self.dns_timeouts,
                    Classification::TlsTimeout => &self.tls_timeouts,
                    Classification::RequestTimeout => &self.request_timeouts,
                    Classification::Unknown => &self.unknown_failures,
                });
            }
            ControllerEvent::ConsecutiveRunTripped { .. } => bump(&self.consecutive_trips),
            ControllerEvent::WindowThresholdExceeded { .. } => bump(&self.window_trips),
            ControllerEvent::EscalationApplied { .. } => bump(&self.escalations_applied),
            ControllerEvent::EscalationRefused { .. } => bump(&self.escalations_refused),
        }
    }
}
