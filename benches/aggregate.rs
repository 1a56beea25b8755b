use chat_peaks::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Roughly a busy three hour stream: bursts every few minutes over a steady baseline
fn synthetic_table(events: u64) -> EventTable {
    let rows = (0..events)
        .map(|i| {
            let time = i * 10_800 / events;
            let author = if (time / 180) % 3 == 0 {
                format!("viewer{}", i % 900)
            } else {
                format!("viewer{}", i % 60)
            };
            Event::message(time, author, "KEKW that was insane")
        })
        .collect();
    EventTable::new(rows).expect("synthetic authors are non-empty")
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    for size in [10_000u64, 100_000] {
        let table = synthetic_table(size);
        for policy in [WindowPolicy::Sliding, WindowPolicy::Tumbling] {
            let params = WindowParams::new(12, policy, 0).expect("valid params");
            group.bench_with_input(BenchmarkId::new(policy.to_string(), size), &table, |b, t| {
                b.iter(|| aggregate(black_box(t), &params))
            });
        }
    }
    group.finish();
}

fn bench_select_peaks(c: &mut Criterion) {
    let table = synthetic_table(100_000);
    let series = aggregate(&table, &WindowParams::new(12, WindowPolicy::Sliding, 0).expect("valid params"));
    let params = PeakParams::new(120, 100).expect("valid params");

    c.bench_function("select_peaks/100k", |b| {
        b.iter(|| select_peaks(black_box(&series), &params))
    });
}

criterion_group!(benches, bench_aggregate, bench_select_peaks);
criterion_main!(benches);
