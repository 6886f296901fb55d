//! Adaptive client demo
//!
//! Sends requests through a simulated transport whose dial, handshake and
//! server phases are slower than the starting timeouts. Run with
//! `RUST_LOG=debug` to watch the sliding window escalate DNS, then TLS, then
//! the request deadline until requests succeed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Context;
use pto::{Attempt, Phase, PhaseTimings, Pto, TimeoutConfiguration};
use tracing_subscriber::EnvFilter;

// All times are in milliseconds
const DNS_TIMEOUT: u64 = 10;
const TLS_TIMEOUT: u64 = 10;
const REQ_TIMEOUT: u64 = 10;
const TIMEOUT_INCREMENT: u64 = 10;
const MAX_TIMEOUT: u64 = 10_000;

const CONSECUTIVE_STYLE: bool = false;
const CONSECUTIVE_RUN_SIZE: u32 = 5;

const WINDOW_STYLE: bool = true;
const WINDOW_SIZE: usize = 5;
const WINDOW_THRESHOLD_PERCENT: u8 = 50;

const REQUESTS: usize = 100;

/// Dials with fixed timeouts; each phase takes a slightly jittered latency.
struct SimulatedDialer {
    dns_timeout: Duration,
    tls_timeout: Duration,
    jitter: AtomicU64,
}

impl SimulatedDialer {
    fn new(timeouts: &TimeoutConfiguration) -> Self {
        Self {
            dns_timeout: timeouts.dns_timeout,
            tls_timeout: timeouts.tls_timeout,
            jitter: AtomicU64::new(0),
        }
    }

    fn latency(&self, base_ms: u64) -> u64 {
        base_ms + self.jitter.fetch_add(7, Ordering::Relaxed) % 9
    }

    async fn get(&self, url: &str, request_timeout: Duration) -> Attempt<u16, String> {
        let mut timings = PhaseTimings::default();

        let dns = self.latency(30);
        if Duration::from_millis(dns) > self.dns_timeout {
            tokio::time::sleep(self.dns_timeout).await;
            return Attempt::new(Err(format!("dial tcp {url}: i/o timeout")));
        }
        timings.set(Phase::DnsLookup, Some(dns));

        let tls = self.latency(20);
        if Duration::from_millis(tls) > self.tls_timeout {
            tokio::time::sleep(self.tls_timeout).await;
            return Attempt::new(Err("net/http: TLS handshake timeout".to_owned()))
                .with_timings(timings);
        }
        timings.set(Phase::TlsHandshake, Some(tls));

        let server = self.latency(60);
        let elapsed = dns + tls + server;
        if Duration::from_millis(elapsed) > request_timeout {
            return Attempt::new(Err(
                "net/http: request canceled (Client.Timeout exceeded while awaiting headers)"
                    .to_owned(),
            ))
            .with_timings(timings);
        }
        tokio::time::sleep(Duration::from_millis(server)).await;
        timings.set(Phase::ServerProcessing, Some(server));
        timings.set(Phase::Total, Some(elapsed));

        Attempt::new(Ok(200)).with_timings(timings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let client = Pto::builder()
        .default_timeout(Duration::from_millis(REQ_TIMEOUT))
        .max_timeout(Duration::from_millis(MAX_TIMEOUT))
        .timeout_increment(Duration::from_millis(TIMEOUT_INCREMENT))
        .consecutive_run_size(CONSECUTIVE_RUN_SIZE)
        .consecutive_style(CONSECUTIVE_STYLE)
        .window_style(WINDOW_STYLE)
        .window_size(WINDOW_SIZE)
        .window_threshold_percent(WINDOW_THRESHOLD_PERCENT)
        .transport_timeouts(
            Duration::from_millis(DNS_TIMEOUT),
            Duration::from_millis(TLS_TIMEOUT),
        )
        .build(SimulatedDialer::new)
        .context("client creation")?;

    let url = "https://www.example.com";
    for i in 1..=REQUESTS {
        tracing::debug!("---REQ: [{i}] STARTED---");
        let result = client
            .execute(url, |generation| async move {
                generation
                    .transport
                    .get(url, generation.timeouts.request_timeout)
                    .await
            })
            .await;
        match result {
            Ok(status) => tracing::info!("Response: [{status}]"),
            Err(err) => tracing::info!("Resp Failed: {err}"),
        }
        tracing::debug!("---REQ: [{i}] ENDED---");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let stats = client.stats();
    let timeouts = client.snapshot().timeouts;
    tracing::info!(
        outcomes = stats.outcomes,
        successes = stats.successes,
        timeouts = stats.timeouts(),
        escalations = stats.escalations_applied,
        dns_timeout_ms = timeouts.dns_timeout.as_millis(),
        tls_timeout_ms = timeouts.tls_timeout.as_millis(),
        request_timeout_ms = timeouts.request_timeout.as_millis(),
        "finished"
    );
    Ok(())
}
