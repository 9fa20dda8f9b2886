use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{TimeZone, Utc};
use stocksync_core::{ProductSyncRecord, RecordMetadata, SyncConfiguration, SyncPriority, WarehouseId};
use stocksync_engine::{NoInventory, plan, prepare};

fn records(count: usize) -> Vec<ProductSyncRecord> {
    (0..count)
        .map(|i| {
            let priority = SyncPriority::ALL[i % SyncPriority::ALL.len()];
            ProductSyncRecord::new(format!("0190a5a8-3f3e-7cc0-8f5e-{i:012x}"), (i % 2_000) as i64)
                .with_metadata(RecordMetadata {
                    priority: Some(priority),
                    region: Some(["US", "EU", "JAPAN"][i % 3].to_string()),
                    is_complex: i % 7 == 0,
                    ..RecordMetadata::default()
                })
        })
        .collect()
}

fn bench_batch_planning(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_planning");
    let config = SyncConfiguration {
        batch_size: 100,
        ..SyncConfiguration::default()
    };

    for size in [100usize, 1_000, 10_000] {
        let input = records(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| plan(black_box(input), black_box(&config)));
        });
    }

    group.finish();
}

fn bench_full_cycle(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let target = WarehouseId::new("us-warehouse");
    let config = SyncConfiguration::default();
    let input = records(1_000);

    c.bench_function("prepare_1000_records", |b| {
        b.iter(|| prepare(black_box(&input), &target, &NoInventory, &config, now));
    });
}

criterion_group!(benches, bench_batch_planning, bench_full_cycle);
criterion_main!(benches);
