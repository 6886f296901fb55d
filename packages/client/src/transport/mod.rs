//! Transport construction from timeout values
//!
//! Building a transport is a pure function of the current timeouts. The
//! controller never holds a live transport; whoever owns the client rebuilds
//! one through a [`TransportFactory`] when a DNS or TLS escalation lands.

pub mod connector;
pub mod profile;

pub use connector::{HttpConnectorFactory, TimedConnector};
pub use profile::{ProfileFactory, TransportProfile};

use crate::config::TimeoutConfiguration;

/// Builds the dial/handshake object a client sends requests through.
pub trait TransportFactory: Send + Sync {
    type Transport: Send + Sync + 'static;

    fn build(&self, timeouts: &TimeoutConfiguration) -> Self::Transport;
}

impl<F, T> TransportFactory for F
where
    F: Fn(&TimeoutConfiguration) -> T + Send + Sync,
    T: Send + Sync + 'static,
{
    type Transport = T;

    fn build(&self, timeouts: &TimeoutConfiguration) -> T {
        self(timeouts)
    }
}
