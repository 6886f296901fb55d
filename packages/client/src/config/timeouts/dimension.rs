use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three timeout axes the controller manages.
///
/// Declaration order is escalation priority: when a trigger carries several
/// causes, the first dimension present wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// DNS lookup and TCP dial
    Dns,
    /// TLS handshake
    Tls,
    /// Overall request deadline
    Request,
}

impl Dimension {
    /// All dimensions in escalation priority order.
    pub const PRIORITY: [Dimension; 3] = [Dimension::Dns, Dimension::Tls, Dimension::Request];

    /// Whether raising this timeout requires a new dial/handshake object.
    ///
    /// Dial and handshake timeouts are fixed when the transport is built; the
    /// request deadline is read per request.
    #[inline]
    #[must_use]
    pub fn requires_rebuild(self) -> bool {
        matches!(self, Dimension::Dns | Dimension::Tls)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Dns => "DNS",
            Dimension::Tls => "TLS",
            Dimension::Request => "REQ",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
