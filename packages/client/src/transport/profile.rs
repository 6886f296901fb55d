//! Transport parameters as plain data

use std::time::Duration;

use super::TransportFactory;
use crate::config::TimeoutConfiguration;

/// Everything a dialing transport is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportProfile {
    /// DNS lookup plus TCP dial
    pub connect_timeout: Duration,
    pub tls_handshake_timeout: Duration,
    pub tcp_keepalive: Option<Duration>,
    pub max_idle: usize,
    pub max_idle_per_host: usize,
    pub idle_timeout: Duration,
    pub expect_continue_timeout: Duration,
}

impl TransportProfile {
    pub const MAX_IDLE: usize = 64;
    pub const IDLE_TIMEOUT: Duration = Duration::from_secs(90);
    pub const KEEPALIVE: Duration = Duration::from_secs(60);
    pub const EXPECT_CONTINUE_TIMEOUT: Duration = Duration::from_secs(1);

    #[must_use]
    pub fn from_timeouts(timeouts: &TimeoutConfiguration) -> Self {
        Self {
            connect_timeout: timeouts.dns_timeout,
            tls_handshake_timeout: timeouts.tls_timeout,
            tcp_keepalive: Some(Self::KEEPALIVE),
            max_idle: Self::MAX_IDLE,
            max_idle_per_host: Self::MAX_IDLE,
            idle_timeout: Self::IDLE_TIMEOUT,
            expect_continue_timeout: Self::EXPECT_CONTINUE_TIMEOUT,
        }
    }
}

/// Produces a [`TransportProfile`] per build.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileFactory;

impl TransportFactory for ProfileFactory {
    type Transport = TransportProfile;

    fn build(&self, timeouts: &TimeoutConfiguration) -> TransportProfile {
        TransportProfile::from_timeouts(timeouts)
    }
}
