use chrono::{DateTime, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fleetwatch_store::AggregationStore;

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

/// Benchmark record_heartbeat latency when the minute is already known (hot path)
fn bench_record_heartbeat_same_minute(c: &mut Criterion) {
    let store = AggregationStore::new(["bench-device"]);
    let sent_at = at(1_704_110_400);

    c.bench_function("record_heartbeat_same_minute", |b| {
        b.iter(|| {
            store
                .record_heartbeat(black_box("bench-device"), black_box(sent_at))
                .unwrap();
        });
    });
}

/// Benchmark record_heartbeat latency when every call opens a new minute
fn bench_record_heartbeat_new_minute(c: &mut Criterion) {
    let store = AggregationStore::new(["bench-device"]);
    let mut secs = 0i64;

    c.bench_function("record_heartbeat_new_minute", |b| {
        b.iter(|| {
            secs += 60;
            store
                .record_heartbeat(black_box("bench-device"), black_box(at(secs)))
                .unwrap();
        });
    });
}

/// Benchmark record_upload latency (hot path)
fn bench_record_upload(c: &mut Criterion) {
    let store = AggregationStore::new(["bench-device"]);
    let sent_at = at(1_704_110_400);

    c.bench_function("record_upload", |b| {
        b.iter(|| {
            store
                .record_upload(black_box("bench-device"), sent_at, black_box(2_500.0))
                .unwrap();
        });
    });
}

/// Benchmark read_stats with varying numbers of recorded minutes
fn bench_read_stats_varying_minutes(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_stats_varying_minutes");

    for minutes in [1i64, 60, 1_440, 10_080].iter() {
        let store = AggregationStore::new(["bench-device"]);
        for m in 0..*minutes {
            store.record_heartbeat("bench-device", at(m * 60)).unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(minutes), minutes, |b, _| {
            b.iter(|| {
                black_box(store.read_stats(black_box("bench-device")).unwrap());
            });
        });
    }
    group.finish();
}

/// Benchmark lookup misses for unknown devices
fn bench_unknown_device(c: &mut Criterion) {
    let ids: Vec<String> = (0..1_000).map(|i| format!("device-{}", i)).collect();
    let store = AggregationStore::new(ids);

    c.bench_function("read_stats_unknown_device", |b| {
        b.iter(|| {
            let _ = black_box(store.read_stats(black_box("device-missing")));
        });
    });
}

/// Benchmark snapshot across fleets of different sizes
fn bench_snapshot_varying_fleet(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_varying_fleet");

    for fleet in [10usize, 100, 1_000].iter() {
        let ids: Vec<String> = (0..*fleet).map(|i| format!("device-{}", i)).collect();
        let store = AggregationStore::new(ids.clone());
        for id in &ids {
            store.record_heartbeat(id, at(0)).unwrap();
            store.record_upload(id, at(0), 1_000.0).unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(fleet), fleet, |b, _| {
            b.iter(|| black_box(store.snapshot()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_record_heartbeat_same_minute,
    bench_record_heartbeat_new_minute,
    bench_record_upload,
    bench_read_stats_varying_minutes,
    bench_unknown_device,
    bench_snapshot_varying_fleet
);
criterion_main!(benches);
