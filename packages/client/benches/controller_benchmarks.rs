//! Controller hot-path benchmarks
//!
//! - Outcome classification from error text
//! - Single-threaded `record` throughput with both styles on
//! - Contended `record` throughput across threads

use std::sync::Arc;
use std::time::{Duration, Instant};

use pto_client::prelude::*;

fn main() {
    println!("🏁 Adaptive Controller Benchmarks\n");

    bench_classification();
    bench_record();
    bench_contended_record();
}

fn controller() -> AdaptiveController {
    let config = AdaptiveConfig::default()
        .with_default_timeout(Duration::from_millis(10))
        .with_transport_timeouts(Duration::from_millis(10), Duration::from_millis(10))
        .with_timeout_increment(Duration::from_millis(1))
        .with_max_timeout(Duration::from_secs(3600))
        .with_consecutive_style(true)
        .with_window_style(true)
        .with_window_size(32);
    AdaptiveController::with_sink(config, Arc::new(NoopSink)).expect("valid benchmark config")
}

/// Benchmark error text classification
fn bench_classification() {
    println!("📊 1. Classification");

    let messages = [
        "dial tcp 10.0.0.1:443: i/o timeout",
        "net/http: TLS handshake timeout",
        "net/http: request canceled (Client.Timeout exceeded while awaiting headers)",
        "unexpected EOF",
    ];
    let iterations = 100_000;

    let start = Instant::now();
    for i in 0..iterations {
        let _ = classify(Some(messages[i % messages.len()]));
    }
    let duration = start.elapsed();

    println!("   {iterations} classifications in {duration:?}");
    println!(
        "   Throughput: {:.0} classifications/sec",
        iterations as f64 / duration.as_secs_f64()
    );
    println!();
}

/// Benchmark uncontended outcome recording
fn bench_record() {
    println!("📊 2. Record Throughput (1 thread)");

    let controller = controller();
    let config = controller.current();
    let iterations = 100_000;

    let start = Instant::now();
    for i in 0..iterations {
        let classification = if i % 3 == 0 {
            Classification::Success
        } else {
            Classification::RequestTimeout
        };
        let _ = controller.record(Outcome::new(classification, "https://bench.local", &config));
    }
    let duration = start.elapsed();

    println!("   {iterations} outcomes in {duration:?}");
    println!("   Average: {:?} per outcome", duration / iterations);
    println!("   Escalations: {}", controller.stats().escalations_applied);
    println!();
}

/// Benchmark outcome recording under contention
fn bench_contended_record() {
    println!("📊 3. Record Throughput (contended)");

    let per_thread = 20_000;
    for thread_count in [1, 2, 4, 8] {
        let controller = Arc::new(controller());
        let start = Instant::now();

        let handles: Vec<_> = (0..thread_count)
            .map(|t| {
                let controller = Arc::clone(&controller);
                std::thread::spawn(move || {
                    let config = controller.current();
                    for i in 0..per_thread {
                        let classification = if (i + t) % 2 == 0 {
                            Classification::DnsTimeout
                        } else {
                            Classification::Success
                        };
                        let _ = controller.record(Outcome::new(
                            classification,
                            "https://bench.local",
                            &config,
                        ));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("benchmark thread panicked");
        }
        let duration = start.elapsed();
        let total = thread_count * per_thread;

        println!(
            "   {thread_count} threads: {total} outcomes in {duration:?} ({:.0} outcomes/sec)",
            total as f64 / duration.as_secs_f64()
        );
    }
    println!();
}
