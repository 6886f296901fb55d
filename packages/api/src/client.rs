//! Adaptive client façade
//!
//! Holds the controller, the transport factory and the currently published
//! `(timeouts, transport)` pair. Requests read the published pair, report
//! their outcome, and a newer generation replaces it when an escalation
//! lands.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use pto_client::classify::{FailurePhase, FailureSignal, Outcome, PhaseTimings};
use pto_client::config::TimeoutConfiguration;
use pto_client::controller::{AdaptiveController, Decision};
use pto_client::telemetry::ControllerStatsSnapshot;
use pto_client::transport::TransportFactory;

/// A published configuration and the transport built for it.
#[derive(Debug)]
pub struct Generation<T> {
    pub timeouts: TimeoutConfiguration,
    pub transport: Arc<T>,
    /// Controller generation this pair was published for
    pub number: u64,
}

/// What one request attempt produced.
#[derive(Debug)]
pub struct Attempt<R, E> {
    pub result: Result<R, E>,
    /// Per-phase timings, when the transport traced them
    pub timings: PhaseTimings,
}

impl<R, E> Attempt<R, E> {
    pub fn new(result: Result<R, E>) -> Self {
        Self {
            result,
            timings: PhaseTimings::default(),
        }
    }

    #[must_use]
    pub fn with_timings(mut self, timings: PhaseTimings) -> Self {
        self.timings = timings;
        self
    }
}

impl<R, E> From<Result<R, E>> for Attempt<R, E> {
    fn from(result: Result<R, E>) -> Self {
        Self::new(result)
    }
}

/// Failure of a deadline-bounded request.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError<E> {
    /// The request timeout elapsed before the attempt finished
    #[error("request deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),
    /// The attempt itself failed
    #[error("{0}")]
    Failed(E),
}

impl<E: FailureSignal> FailureSignal for AttemptError<E> {
    fn failure_phase(&self) -> FailurePhase {
        match self {
            Self::DeadlineExceeded(_) => FailurePhase::RequestDeadline,
            Self::Failed(err) => err.failure_phase(),
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// HTTP client wrapper whose timeouts follow observed failures.
pub struct AdaptiveClient<F: TransportFactory> {
    controller: AdaptiveController,
    factory: F,
    published: RwLock<Arc<Generation<F::Transport>>>,
}

impl<F: TransportFactory> AdaptiveClient<F> {
    pub(crate) fn new(controller: AdaptiveController, factory: F) -> Self {
        let (timeouts, number) = controller.current_with_generation();
        let transport = Arc::new(factory.build(&timeouts));
        Self {
            controller,
            factory,
            published: RwLock::new(Arc::new(Generation {
                timeouts,
                transport,
                number,
            })),
        }
    }

    /// Timeouts and transport for the next request.
    pub fn snapshot(&self) -> Arc<Generation<F::Transport>> {
        Arc::clone(&self.published.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn controller(&self) -> &AdaptiveController {
        &self.controller
    }

    pub fn stats(&self) -> ControllerStatsSnapshot {
        self.controller.stats()
    }

    /// Record a finished attempt and publish whatever the controller decided.
    pub fn observe(&self, outcome: Outcome) -> Decision {
        let decision = self.controller.record(outcome);
        if decision.changed() {
            self.publish(&decision);
        }
        decision
    }

    fn publish(&self, decision: &Decision) {
        let mut published = self.published.write().unwrap_or_else(PoisonError::into_inner);
        // A later escalation may already be visible.
        if decision.generation <= published.number {
            return;
        }

        let current = &published.timeouts;
        let transport = if current.dns_timeout == decision.config.dns_timeout
            && current.tls_timeout == decision.config.tls_timeout
        {
            Arc::clone(&published.transport)
        } else {
            tracing::debug!(
                generation = decision.generation,
                dns_timeout_ms = millis(decision.config.dns_timeout),
                tls_timeout_ms = millis(decision.config.tls_timeout),
                "rebuilding transport"
            );
            Arc::new(self.factory.build(&decision.config))
        };

        *published = Arc::new(Generation {
            timeouts: decision.config,
            transport,
            number: decision.generation,
        });
    }

    /// Run one attempt through the current transport and record its outcome.
    ///
    /// `total_ms` is filled from wall-clock time when the attempt does not
    /// report it.
    pub async fn execute<R, E, Op, Fut>(&self, url: &str, op: Op) -> Result<R, E>
    where
        Op: FnOnce(Arc<Generation<F::Transport>>) -> Fut,
        Fut: Future<Output = Attempt<R, E>>,
        E: FailureSignal,
    {
        let generation = self.snapshot();
        let timeouts = generation.timeouts;
        let started = Instant::now();
        let Attempt {
            result,
            mut timings,
        } = op(generation).await;
        timings.total_ms.get_or_insert_with(|| millis(started.elapsed()));

        self.observe(Outcome::from_attempt(result.as_ref().err(), url, timings, &timeouts));
        result
    }

    /// Like [`execute`](Self::execute), bounded by the current request
    /// timeout. Hitting the bound is recorded as a request timeout.
    pub async fn execute_with_deadline<R, E, Op, Fut>(
        &self,
        url: &str,
        op: Op,
    ) -> Result<R, AttemptError<E>>
    where
        Op: FnOnce(Arc<Generation<F::Transport>>) -> Fut,
        Fut: Future<Output = Attempt<R, E>>,
        E: FailureSignal,
    {
        self.execute(url, move |generation| async move {
            let deadline = generation.timeouts.request_timeout;
            match tokio::time::timeout(deadline, op(generation)).await {
                Ok(Attempt { result, timings }) => Attempt {
                    result: result.map_err(AttemptError::Failed),
                    timings,
                },
                Err(_elapsed) => Attempt::new(Err(AttemptError::DeadlineExceeded(deadline))),
            }
        })
        .await
    }

    /// Blocking counterpart of [`execute`](Self::execute).
    pub fn execute_blocking<R, E, Op>(&self, url: &str, op: Op) -> Result<R, E>
    where
        Op: FnOnce(&Generation<F::Transport>) -> Attempt<R, E>,
        E: FailureSignal,
    {
        let generation = self.snapshot();
        let started = Instant::now();
        let Attempt {
            result,
            mut timings,
        } = op(generation.as_ref());
        timings.total_ms.get_or_insert_with(|| millis(started.elapsed()));

        self.observe(Outcome::from_attempt(
            result.as_ref().err(),
            url,
            timings,
            &generation.timeouts,
        ));
        result
    }
}

impl<F: TransportFactory> fmt::Debug for AdaptiveClient<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let published = self.snapshot();
        f.debug_struct("AdaptiveClient")
            .field("controller", &self.controller)
            .field("timeouts", &published.timeouts)
            .field("generation", &published.number)
            .finish_non_exhaustive()
    }
}
