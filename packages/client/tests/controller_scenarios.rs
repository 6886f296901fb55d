use std::sync::Arc;
use std::thread;
use std::time::Duration;

use pto_client::prelude::*;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn scenario_config() -> AdaptiveConfig {
    AdaptiveConfig::default()
        .with_default_timeout(ms(10))
        .with_transport_timeouts(ms(10), ms(10))
        .with_max_timeout(ms(10_000))
        .with_timeout_increment(ms(10))
}

fn feed(controller: &AdaptiveController, classification: Classification) -> Decision {
    let outcome = Outcome::new(classification, "https://www.example.com", &controller.current());
    controller.record(outcome)
}

#[test]
fn five_request_timeouts_raise_request_deadline() {
    let config = scenario_config()
        .with_consecutive_run_size(5)
        .with_consecutive_style(true);
    let controller = AdaptiveController::with_sink(config, Arc::new(NoopSink)).expect("valid");

    for _ in 0..4 {
        let decision = feed(&controller, Classification::RequestTimeout);
        assert!(decision.escalation.is_none());
        assert!(!controller.consecutive_detector().all_timeouts());
    }
    let decision = feed(&controller, Classification::RequestTimeout);
    assert!(controller.consecutive_detector().all_timeouts());
    assert_eq!(decision.config.request_timeout, ms(20));
    assert!(!decision.rebuild_transport());
}

#[test]
fn window_escalates_dns_once_over_threshold() {
    let config = scenario_config()
        .with_window_size(5)
        .with_window_threshold_percent(50)
        .with_window_style(true);
    let sink = Arc::new(RecordingSink::new());
    let controller = AdaptiveController::with_sink(config, sink.clone()).expect("valid");

    for classification in [
        Classification::Success,
        Classification::Success,
        Classification::DnsTimeout,
        Classification::Success,
        Classification::DnsTimeout,
    ] {
        let decision = feed(&controller, classification);
        assert!(decision.escalation.is_none());
    }
    let snapshot = controller.window_snapshot();
    assert_eq!(snapshot.len, 5);
    assert_eq!(snapshot.timeout_count, 2);

    let decision = feed(&controller, Classification::DnsTimeout);
    assert_eq!(decision.config.dns_timeout, ms(20));
    assert!(decision.rebuild_transport());
    assert!(sink.events().contains(&ControllerEvent::WindowThresholdExceeded {
        timeout_percent: 60,
        threshold_percent: 50,
        cause: TimeoutCause::DNS,
    }));
}

#[test]
fn reconfiguring_run_size_forgets_history() {
    let config = scenario_config()
        .with_consecutive_run_size(3)
        .with_consecutive_style(true);
    let controller = AdaptiveController::with_sink(config, Arc::new(NoopSink)).expect("valid");

    feed(&controller, Classification::TlsTimeout);
    feed(&controller, Classification::TlsTimeout);
    controller.set_consecutive_run_size(2).expect("in range");

    let detector = controller.consecutive_detector();
    assert_eq!(detector.cursor(), 0);
    assert_eq!(detector.bitmap(), 0b11);

    let decision = feed(&controller, Classification::TlsTimeout);
    assert!(decision.escalation.is_none());
    let decision = feed(&controller, Classification::TlsTimeout);
    assert_eq!(decision.config.tls_timeout, ms(20));
}

#[test]
fn escalation_stops_at_ceiling() {
    let config = scenario_config()
        .with_max_timeout(ms(40))
        .with_consecutive_run_size(1)
        .with_consecutive_style(true);
    let controller = AdaptiveController::with_sink(config, Arc::new(NoopSink)).expect("valid");

    let raised: Vec<Duration> = (0..6)
        .map(|_| feed(&controller, Classification::RequestTimeout).config.request_timeout)
        .collect();
    assert_eq!(raised, vec![ms(20), ms(30), ms(40), ms(40), ms(40), ms(40)]);

    let stats = controller.stats();
    assert_eq!(stats.escalations_applied, 3);
    assert_eq!(stats.escalations_refused, 3);
    assert_eq!(stats.request_timeouts, 6);
}

#[test]
fn toggling_style_uses_history_gathered_while_disabled() {
    let config = scenario_config().with_consecutive_run_size(3);
    let controller = AdaptiveController::with_sink(config, Arc::new(NoopSink)).expect("valid");

    feed(&controller, Classification::DnsTimeout);
    feed(&controller, Classification::DnsTimeout);
    controller.set_consecutive_style(true);
    let decision = feed(&controller, Classification::DnsTimeout);
    assert_eq!(decision.config.dns_timeout, ms(20));
}

#[test]
fn concurrent_callers_see_consistent_state() {
    const THREADS: u64 = 8;
    const PER_THREAD: u64 = 500;

    let config = scenario_config()
        .with_max_timeout(ms(1_000))
        .with_consecutive_run_size(1)
        .with_consecutive_style(true)
        .with_window_size(16)
        .with_window_threshold_percent(10)
        .with_window_style(true);
    let controller =
        Arc::new(AdaptiveController::with_sink(config, Arc::new(NoopSink)).expect("valid"));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let controller = Arc::clone(&controller);
            thread::spawn(move || {
                let mut last_generation = 0;
                for i in 0..PER_THREAD {
                    let classification = match (t + i) % 4 {
                        0 => Classification::DnsTimeout,
                        1 => Classification::TlsTimeout,
                        2 => Classification::RequestTimeout,
                        _ => Classification::Success,
                    };
                    let decision = feed(&controller, classification);
                    for dimension in Dimension::PRIORITY {
                        assert!(decision.config.get(dimension) <= decision.config.max_timeout);
                    }
                    assert!(decision.generation >= last_generation);
                    last_generation = decision.generation;
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let stats = controller.stats();
    assert_eq!(stats.outcomes, THREADS * PER_THREAD);
    let (config, generation) = controller.current_with_generation();
    assert_eq!(generation, stats.escalations_applied);

    let raised = [config.dns_timeout, config.tls_timeout, config.request_timeout]
        .into_iter()
        .map(|t| (t - ms(10)).as_millis() / 10)
        .sum::<u128>();
    assert_eq!(raised, u128::from(generation));

    let window = controller.window_snapshot();
    assert_eq!(window.len, 16);
    assert!(window.timeout_count <= 16);
}
