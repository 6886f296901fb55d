//! `hyper_util` connector construction

use std::time::Duration;

use hyper_util::client::legacy::connect::HttpConnector;

use super::TransportFactory;
use super::profile::TransportProfile;
use crate::config::TimeoutConfiguration;

/// An HTTP connector with its dial timeout applied, paired with the TLS
/// handshake budget for whichever TLS layer wraps it.
#[derive(Debug, Clone)]
pub struct TimedConnector {
    pub http: HttpConnector,
    pub tls_handshake_timeout: Duration,
}

/// Builds [`TimedConnector`]s from the current timeouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnectorFactory;

impl TransportFactory for HttpConnectorFactory {
    type Transport = TimedConnector;

    fn build(&self, timeouts: &TimeoutConfiguration) -> TimedConnector {
        let profile = TransportProfile::from_timeouts(timeouts);

        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_nodelay(true);
        http.set_connect_timeout(Some(profile.connect_timeout));
        http.set_keepalive(profile.tcp_keepalive);

        TimedConnector {
            http,
            tls_handshake_timeout: profile.tls_handshake_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dimension;

    #[test]
    fn rebuilt_connector_tracks_tls_budget() {
        let initial = TimeoutConfiguration::default();
        let escalated = initial.with_dimension(Dimension::Tls, Duration::from_millis(3000));

        let before = HttpConnectorFactory.build(&initial);
        let after = HttpConnectorFactory.build(&escalated);
        assert_eq!(before.tls_handshake_timeout, initial.tls_timeout);
        assert_eq!(after.tls_handshake_timeout, Duration::from_millis(3000));
    }
}
