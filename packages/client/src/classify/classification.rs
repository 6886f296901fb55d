//! Request outcome classification and the timeout cause bitmask

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::config::Dimension;

/// Sentinel code for outcomes that carry no managed timeout.
pub const NO_TIMEOUT: i32 = -1;

/// The tagged result of one request attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Success,
    DnsTimeout,
    TlsTimeout,
    RequestTimeout,
    /// A failure this controller does not manage
    Unknown,
}

impl Classification {
    /// Whether this outcome counts toward either detector's timeout tally.
    #[inline]
    #[must_use]
    pub fn is_timeout(self) -> bool {
        !matches!(self, Classification::Success | Classification::Unknown)
    }

    /// The timeout dimension this outcome points at, if any.
    #[inline]
    #[must_use]
    pub fn dimension(self) -> Option<Dimension> {
        match self {
            Classification::DnsTimeout => Some(Dimension::Dns),
            Classification::TlsTimeout => Some(Dimension::Tls),
            Classification::RequestTimeout => Some(Dimension::Request),
            Classification::Success | Classification::Unknown => None,
        }
    }

    /// Bitmask form of this outcome; empty for success and unknown failures.
    #[inline]
    #[must_use]
    pub fn cause(self) -> TimeoutCause {
        self.dimension().map_or(TimeoutCause::NONE, TimeoutCause::from)
    }

    /// Numeric reason code: `-1` when no timeout, otherwise the cause bit.
    #[must_use]
    pub fn code(self) -> i32 {
        match self.cause() {
            cause if cause.is_empty() => NO_TIMEOUT,
            cause => i32::from(cause.bits()),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Classification::Success => "success",
            Classification::DnsTimeout => "dns timeout",
            Classification::TlsTimeout => "tls timeout",
            Classification::RequestTimeout => "request timeout",
            Classification::Unknown => "unknown failure",
        };
        f.write_str(name)
    }
}

/// OR-combinable set of timeout causes.
///
/// Bit values are stable: DNS = 1, TLS = 2, REQ = 4. Deserialized values
/// keep only those bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct TimeoutCause(u8);

impl TimeoutCause {
    pub const NONE: TimeoutCause = TimeoutCause(0);
    pub const DNS: TimeoutCause = TimeoutCause(1);
    pub const TLS: TimeoutCause = TimeoutCause(2);
    pub const REQUEST: TimeoutCause = TimeoutCause(4);

    const ALL_BITS: u8 = 0b111;

    /// Build from raw bits, dropping any bit that names no dimension.
    #[inline]
    #[must_use]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        TimeoutCause(bits & Self::ALL_BITS)
    }

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, other: TimeoutCause) -> bool {
        self.0 & other.0 == other.0
    }

    /// Highest-priority dimension present (DNS, then TLS, then request).
    #[must_use]
    pub fn primary(self) -> Option<Dimension> {
        Dimension::PRIORITY
            .into_iter()
            .find(|&dimension| self.contains(TimeoutCause::from(dimension)))
    }
}

impl From<u8> for TimeoutCause {
    fn from(bits: u8) -> Self {
        TimeoutCause::from_bits_truncate(bits)
    }
}

impl From<TimeoutCause> for u8 {
    fn from(cause: TimeoutCause) -> Self {
        cause.bits()
    }
}

impl From<Dimension> for TimeoutCause {
    fn from(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Dns => TimeoutCause::DNS,
            Dimension::Tls => TimeoutCause::TLS,
            Dimension::Request => TimeoutCause::REQUEST,
        }
    }
}

impl BitOr for TimeoutCause {
    type Output = TimeoutCause;

    fn bitor(self, rhs: TimeoutCause) -> TimeoutCause {
        TimeoutCause(self.0 | rhs.0)
    }
}

impl BitOrAssign for TimeoutCause {
    fn bitor_assign(&mut self, rhs: TimeoutCause) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for TimeoutCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("TimeoutCause(NONE)");
        }
        let names: Vec<&str> = Dimension::PRIORITY
            .into_iter()
            .filter(|&d| self.contains(TimeoutCause::from(d)))
            .map(Dimension::as_str)
            .collect();
        write!(f, "TimeoutCause({})", names.join(" | "))
    }
}
