//! Classified timeout markers
//!
//! Transports wrap their failures in one of these markers so the classifier
//! can identify the failing phase by walking `source()` chains instead of
//! matching on error text.

use std::fmt;

/// The DNS lookup or TCP dial did not complete in time.
#[derive(Debug, Clone, Copy, Default)]
pub struct DnsTimedOut;

impl fmt::Display for DnsTimedOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dial timed out")
    }
}

impl std::error::Error for DnsTimedOut {}

/// The TLS handshake did not complete in time.
#[derive(Debug, Clone, Copy, Default)]
pub struct TlsHandshakeTimedOut;

impl fmt::Display for TlsHandshakeTimedOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("tls handshake timed out")
    }
}

impl std::error::Error for TlsHandshakeTimedOut {}

/// The overall request deadline passed while awaiting response headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestTimedOut;

impl fmt::Display for RequestTimedOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("request deadline exceeded while awaiting headers")
    }
}

impl std::error::Error for RequestTimedOut {}
