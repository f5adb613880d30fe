//! Performance benchmarks for the simulation and wire format

use server::codec::{parse_action, StateCodec};
use shared::{Ball, PaddleAction, Simulator};
use std::time::Instant;

/// Benchmarks raw simulator throughput
#[test]
fn benchmark_simulator_step() {
    let mut sim = Simulator::default();
    let iterations = 100_000;
    let start = Instant::now();

    for i in 0..iterations {
        let intent = if i % 120 < 60 {
            PaddleAction::Up
        } else {
            PaddleAction::Down
        };
        sim.step(intent);
    }

    let duration = start.elapsed();
    println!(
        "Simulator step: {} ticks in {:?} ({:.2} μs/tick)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // 100k ticks is almost half an hour of play
    assert!(duration.as_millis() < 5000);
}

/// Benchmarks stepping with a crowded field
#[test]
fn stress_test_many_balls() {
    let mut sim = Simulator::default();
    for seed in 0..200 {
        sim.state_mut().balls.push(Ball::serve(seed));
    }

    let iterations = 1000;
    let start = Instant::now();

    for _ in 0..iterations {
        sim.step(PaddleAction::Stay);
    }

    let duration = start.elapsed();
    println!(
        "Crowded field: {} ticks in {:?} ({:.2} μs/tick)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(!sim.state().balls.is_empty());
    assert!(duration.as_millis() < 5000);
}

/// Benchmarks state encoding, the per-tick cost on the send path
#[test]
fn benchmark_state_encoding() {
    let mut sim = Simulator::default();
    for seed in 0..8 {
        sim.state_mut().balls.push(Ball::serve(seed));
    }
    let codec = StateCodec::new(true);

    let iterations = 10_000;
    let start = Instant::now();
    let mut total_bytes = 0;

    for _ in 0..iterations {
        total_bytes += codec.encode(&sim).unwrap().len();
    }

    let duration = start.elapsed();
    println!(
        "State encoding: {} encodes ({} bytes) in {:?} ({:.2} μs/encode)",
        iterations,
        total_bytes,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 5000);
}

/// Benchmarks inbound action scanning
#[test]
fn benchmark_action_parsing() {
    let messages = [
        "{\"type\": \"action\", \"data\": {\"action\": -1, \"timestamp\": 1712345678.25}}\n",
        "{\"type\": \"action\", \"data\": {\"action\": 1}}\n",
        "not json at all",
    ];

    let iterations = 100_000;
    let start = Instant::now();
    let mut parsed = 0;

    for i in 0..iterations {
        if parse_action(messages[i % messages.len()]).is_some() {
            parsed += 1;
        }
    }

    let duration = start.elapsed();
    println!(
        "Action parsing: {} messages in {:?} ({:.2} ns/message)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    assert_eq!(parsed, iterations - iterations / 3);
    assert!(duration.as_millis() < 1000);
}
