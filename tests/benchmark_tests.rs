//! Performance benchmarks for the wire codec

use shared::{
    decode_snapshot, encode_intent, encode_snapshot, Color, Direction, Food, Intent, Player,
    Snapshot, WireLimits,
};
use std::time::Instant;

fn crowded_world() -> Snapshot {
    Snapshot {
        status: 1,
        food: (0..255u16)
            .map(|i| Food::new(i * 5, i * 3, Color::new(i as u8, 0, 255 - i as u8), 4.0))
            .collect(),
        players: (0..255u16)
            .map(|i| {
                Player::new(
                    i * 4,
                    i * 2,
                    Color::new(0, i as u8, 0),
                    10.0 + i as f32,
                    format!("player{:03}", i),
                )
            })
            .collect(),
    }
}

/// Benchmarks decoding of the largest snapshot the protocol can describe
#[tokio::test]
async fn benchmark_decode_full_snapshot() {
    let bytes = encode_snapshot(&crowded_world()).unwrap();
    let limits = WireLimits::default();

    let iterations = 1_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let mut source: &[u8] = &bytes;
        let snapshot = decode_snapshot(&mut source, &limits).await.unwrap();
        assert_eq!(snapshot.players.len(), 255);
    }

    let duration = start.elapsed();
    println!(
        "Snapshot decode ({} bytes): {} iterations in {:?} ({:.2} μs/iter)",
        bytes.len(),
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 5 seconds even in debug builds
    assert!(duration.as_secs() < 5);
}

/// Benchmarks snapshot encoding used by test servers
#[test]
fn benchmark_encode_full_snapshot() {
    let world = crowded_world();

    let iterations = 1_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let bytes = encode_snapshot(&world).unwrap();
        assert!(!bytes.is_empty());
    }

    let duration = start.elapsed();
    println!(
        "Snapshot encode: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_secs() < 5);
}

/// Benchmarks per-tick intent encoding
#[test]
fn benchmark_encode_intent() {
    let intents = [
        Intent::none(),
        Intent::from_directions([Direction::Up]),
        Intent::from_directions([Direction::Up, Direction::Left]),
        Intent::from_directions(Direction::ALL),
    ];

    let iterations = 100_000;
    let start = Instant::now();

    let mut total = 0;
    for i in 0..iterations {
        total += encode_intent(&intents[i % intents.len()]).len();
    }

    let duration = start.elapsed();
    println!(
        "Intent encode: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    assert_eq!(total, iterations / 4 * (1 + 2 + 3 + 5));
    assert!(duration.as_millis() < 1000);
}
