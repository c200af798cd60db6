//! Parsing and aggregation benchmarks.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use chatlens::config::LinguisticConfig;
use chatlens::stats::{compute_basic_stats, compute_linguistic_stats, compute_temporal_stats};
use chatlens::ChatParser;

/// Generates a realistic two-person log with the given message count.
fn generate_chat(messages: usize) -> String {
    let bodies = [
        "hey, how was your day?",
        "pretty good! just got back from the gym",
        "<Media omitted>",
        "want to grab dinner later this week",
        "sure, thursday works for me",
        "PTT-20230105-WA0001.opus (file attached)",
    ];
    let mut log = String::new();
    for i in 0..messages {
        let sender = if i % 2 == 0 { "Alice" } else { "Bob" };
        let day = 1 + (i / 480) % 28;
        let hour = (i / 20) % 24;
        let minute = i % 60;
        let body = bodies[i % bodies.len()];
        log.push_str(&format!(
            "{day}/6/23, {hour:02}:{minute:02} - {sender}: {body}\n"
        ));
    }
    log
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for &size in &[100usize, 1_000, 10_000] {
        let log = generate_chat(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &log, |b, log| {
            let parser = ChatParser::new();
            b.iter(|| parser.parse_str(black_box(log)).unwrap());
        });
    }
    group.finish();
}

fn bench_aggregators(c: &mut Criterion) {
    let log = generate_chat(10_000);
    let chat = ChatParser::new().parse_str(&log).unwrap();
    let config = LinguisticConfig::default();

    c.bench_function("basic_stats_10k", |b| {
        b.iter(|| compute_basic_stats(black_box(&chat)));
    });
    c.bench_function("temporal_stats_10k", |b| {
        b.iter(|| compute_temporal_stats(black_box(&chat)));
    });
    c.bench_function("linguistic_stats_10k", |b| {
        b.iter(|| compute_linguistic_stats(black_box(&chat), black_box(&config)));
    });
}

criterion_group!(benches, bench_parsing, bench_aggregators);
criterion_main!(benches);
