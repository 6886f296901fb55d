//! Failure signals surfaced by a transport
//!
//! Transports describe a failed attempt through [`FailureSignal`]. Typed
//! errors are recognised structurally by walking their `source()` chain; free
//! text is only inspected as a last resort, since it couples classification
//! to one transport's wording.

use std::error::Error as StdError;
use std::io;

use super::classification::Classification;
use crate::error::{DnsTimedOut, RequestTimedOut, TlsHandshakeTimedOut};

/// The phase a failed request attempt died in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePhase {
    /// Name resolution or TCP dial timed out
    DnsDial,
    /// TLS handshake timed out
    TlsHandshake,
    /// The overall deadline passed while awaiting headers
    RequestDeadline,
    /// Anything else
    Other,
}

impl From<FailurePhase> for Classification {
    fn from(phase: FailurePhase) -> Self {
        match phase {
            FailurePhase::DnsDial => Classification::DnsTimeout,
            FailurePhase::TlsHandshake => Classification::TlsTimeout,
            FailurePhase::RequestDeadline => Classification::RequestTimeout,
            FailurePhase::Other => Classification::Unknown,
        }
    }
}

/// Anything a transport can hand back to describe why a request failed.
pub trait FailureSignal {
    fn failure_phase(&self) -> FailurePhase;
}

/// Classify a request attempt. `None` means the attempt succeeded.
pub fn classify<S: FailureSignal + ?Sized>(failure: Option<&S>) -> Classification {
    match failure {
        None => Classification::Success,
        Some(signal) => signal.failure_phase().into(),
    }
}

const DNS_PATTERNS: &[&str] = &["dial tcp"];
const TLS_PATTERNS: &[&str] = &["tls handshake timeout", "tls handshake timed out"];
const REQUEST_PATTERNS: &[&str] = &[
    "client.timeout exceeded while awaiting headers",
    "request deadline exceeded",
];

/// Match an error message against known per-phase wording.
///
/// Checked in DNS, TLS, request order; comparison ignores ASCII case.
#[must_use]
pub fn classify_text(message: &str) -> FailurePhase {
    let message = message.to_ascii_lowercase();
    let matches_any = |patterns: &[&str]| patterns.iter().any(|p| message.contains(p));

    if matches_any(DNS_PATTERNS) {
        FailurePhase::DnsDial
    } else if matches_any(TLS_PATTERNS) {
        FailurePhase::TlsHandshake
    } else if matches_any(REQUEST_PATTERNS) {
        FailurePhase::RequestDeadline
    } else {
        FailurePhase::Other
    }
}

fn marker_phase(err: &(dyn StdError + 'static)) -> Option<FailurePhase> {
    if err.is::<DnsTimedOut>() {
        Some(FailurePhase::DnsDial)
    } else if err.is::<TlsHandshakeTimedOut>() {
        Some(FailurePhase::TlsHandshake)
    } else if err.is::<RequestTimedOut>() || err.is::<tokio::time::error::Elapsed>() {
        Some(FailurePhase::RequestDeadline)
    } else {
        None
    }
}

/// Walk an error and its causes.
///
/// `io::Error::source` skips the custom error it wraps, so wrapped payloads
/// are entered through `get_ref` instead.
fn chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |&e| match e.downcast_ref::<io::Error>() {
        Some(io) => io.get_ref().map(|inner| inner as &(dyn StdError + 'static)),
        None => e.source(),
    })
}

/// Classify an error by its `source()` chain.
///
/// Marker types anywhere in the chain win over message text.
#[must_use]
pub fn classify_error(err: &(dyn StdError + 'static)) -> FailurePhase {
    if let Some(phase) = chain(err).find_map(marker_phase) {
        return phase;
    }
    chain(err)
        .map(|e| classify_text(&e.to_string()))
        .find(|phase| *phase != FailurePhase::Other)
        .unwrap_or(FailurePhase::Other)
}

/// Adapter giving any borrowed error the [`FailureSignal`] interface.
#[derive(Debug, Clone, Copy)]
pub struct ErrorChain<'a>(pub &'a (dyn StdError + 'static));

impl FailureSignal for ErrorChain<'_> {
    fn failure_phase(&self) -> FailurePhase {
        classify_error(self.0)
    }
}

impl FailureSignal for FailurePhase {
    fn failure_phase(&self) -> FailurePhase {
        *self
    }
}

impl FailureSignal for str {
    fn failure_phase(&self) -> FailurePhase {
        classify_text(self)
    }
}

impl FailureSignal for String {
    fn failure_phase(&self) -> FailurePhase {
        classify_text(self)
    }
}

impl FailureSignal for io::Error {
    fn failure_phase(&self) -> FailurePhase {
        classify_error(self)
    }
}

impl FailureSignal for tokio::time::error::Elapsed {
    fn failure_phase(&self) -> FailurePhase {
        FailurePhase::RequestDeadline
    }
}

impl FailureSignal for hyper_util::client::legacy::Error {
    fn failure_phase(&self) -> FailurePhase {
        match classify_error(self) {
            FailurePhase::Other if self.is_connect() && chain_timed_out(self) => {
                FailurePhase::DnsDial
            }
            phase => phase,
        }
    }
}

fn chain_timed_out(err: &(dyn StdError + 'static)) -> bool {
    chain(err).any(|e| {
        e.downcast_ref::<io::Error>()
            .is_some_and(|io| io.kind() == io::ErrorKind::TimedOut)
    })
}
