//! Per-request outcome records

use serde::{Deserialize, Serialize};

use super::classification::Classification;
use super::signal::{FailureSignal, classify};
use crate::config::TimeoutConfiguration;

/// Request phases a transport may report timings for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    DnsLookup,
    TcpConnection,
    TlsHandshake,
    ServerProcessing,
    ContentTransfer,
    Total,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::DnsLookup,
        Phase::TcpConnection,
        Phase::TlsHandshake,
        Phase::ServerProcessing,
        Phase::ContentTransfer,
        Phase::Total,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Phase::DnsLookup => "DNSLookup",
            Phase::TcpConnection => "TCPConnection",
            Phase::TlsHandshake => "TLSHandshake",
            Phase::ServerProcessing => "ServerProcessing",
            Phase::ContentTransfer => "ContentTransfer",
            Phase::Total => "Total",
        }
    }

    /// Resolve a label, ignoring whitespace and ASCII case
    /// (`"DNS lookup"` and `"DNSLookup"` are the same phase).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Phase> {
        let compact: String = label
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        Phase::ALL
            .into_iter()
            .find(|phase| phase.name().eq_ignore_ascii_case(&compact))
    }
}

/// Elapsed milliseconds per request phase. Absent phases were not reached or
/// not reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTimings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_lookup_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp_connection_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_handshake_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_processing_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_transfer_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_ms: Option<u64>,
}

impl PhaseTimings {
    #[must_use]
    pub fn get(&self, phase: Phase) -> Option<u64> {
        match phase {
            Phase::DnsLookup => self.dns_lookup_ms,
            Phase::TcpConnection => self.tcp_connection_ms,
            Phase::TlsHandshake => self.tls_handshake_ms,
            Phase::ServerProcessing => self.server_processing_ms,
            Phase::ContentTransfer => self.content_transfer_ms,
            Phase::Total => self.total_ms,
        }
    }

    pub fn set(&mut self, phase: Phase, millis: Option<u64>) {
        let slot = match phase {
            Phase::DnsLookup => &mut self.dns_lookup_ms,
            Phase::TcpConnection => &mut self.tcp_connection_ms,
            Phase::TlsHandshake => &mut self.tls_handshake_ms,
            Phase::ServerProcessing => &mut self.server_processing_ms,
            Phase::ContentTransfer => &mut self.content_transfer_ms,
            Phase::Total => &mut self.total_ms,
        };
        *slot = millis;
    }

    #[must_use]
    pub fn with(mut self, phase: Phase, millis: u64) -> Self {
        self.set(phase, Some(millis));
        self
    }

    /// Parse a `Name: N ms` breakdown as printed by request tracers.
    ///
    /// Entries are separated by commas or newlines. Unknown names are
    /// skipped; a known name with an unparsable value stays absent.
    #[must_use]
    pub fn parse(text: &str) -> PhaseTimings {
        let mut timings = PhaseTimings::default();
        for entry in text.split([',', '\n']) {
            let Some((label, value)) = entry.split_once(':') else {
                continue;
            };
            let Some(phase) = Phase::from_label(label) else {
                continue;
            };
            let value = value.trim();
            let value = value.strip_suffix("ms").unwrap_or(value).trim();
            timings.set(phase, value.parse().ok());
        }
        timings
    }
}

/// Timeouts that were in force when a request was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutSnapshot {
    pub request_timeout_ms: u64,
    pub dns_timeout_ms: u64,
    pub tls_timeout_ms: u64,
}

fn millis(d: std::time::Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl From<&TimeoutConfiguration> for TimeoutSnapshot {
    fn from(config: &TimeoutConfiguration) -> Self {
        Self {
            request_timeout_ms: millis(config.request_timeout),
            dns_timeout_ms: millis(config.dns_timeout),
            tls_timeout_ms: millis(config.tls_timeout),
        }
    }
}

/// One classified request attempt. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub classification: Classification,
    #[serde(flatten)]
    pub timings: PhaseTimings,
    pub url: String,
    #[serde(flatten)]
    pub timeouts: TimeoutSnapshot,
}

impl Outcome {
    #[must_use]
    pub fn new(
        classification: Classification,
        url: impl Into<String>,
        timeouts: &TimeoutConfiguration,
    ) -> Self {
        Self {
            classification,
            timings: PhaseTimings::default(),
            url: url.into(),
            timeouts: TimeoutSnapshot::from(timeouts),
        }
    }

    /// Classify a finished attempt and record it.
    #[must_use]
    pub fn from_attempt<S: FailureSignal + ?Sized>(
        failure: Option<&S>,
        url: impl Into<String>,
        timings: PhaseTimings,
        timeouts: &TimeoutConfiguration,
    ) -> Self {
        Self::new(classify(failure), url, timeouts).with_timings(timings)
    }

    #[must_use]
    pub fn with_timings(mut self, timings: PhaseTimings) -> Self {
        self.timings = timings;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.classification.is_timeout()
    }

    /// Numeric reason code (`-1`, 1, 2 or 4).
    #[must_use]
    pub fn timeout_reason(&self) -> i32 {
        self.classification.code()
    }
}
