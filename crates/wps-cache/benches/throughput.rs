//! Benchmarks for wps-cache manager operations

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;
use tokio::runtime::Runtime;
use wps_cache::{CacheManager, MemoryBackend, MemoryConfig};

fn create_cache() -> CacheManager<MemoryBackend> {
    CacheManager::new(MemoryBackend::new(MemoryConfig::default()))
}

fn bench_set(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = create_cache();

    let mut group = c.benchmark_group("set");
    group.throughput(Throughput::Elements(1));

    group.bench_function("forced_small_value", |b| {
        b.iter(|| {
            rt.block_on(async {
                black_box(cache.set(black_box("key"), "posts", &42i32, true, 0).await);
            });
        });
    });

    group.bench_function("forced_1kb_value", |b| {
        let value = "x".repeat(1024);
        b.iter(|| {
            rt.block_on(async {
                black_box(cache.set(black_box("key"), "posts", &value, true, 0).await);
            });
        });
    });

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = create_cache();

    rt.block_on(async {
        cache.set("key", "posts", &42i32, false, 3600).await;
    });

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("hit", |b| {
        b.iter(|| {
            rt.block_on(async {
                black_box(cache.get(black_box("key"), "posts", 0i32).await);
            });
        });
    });

    group.bench_function("miss", |b| {
        b.iter(|| {
            rt.block_on(async {
                black_box(cache.get(black_box("nonexistent"), "posts", 0i32).await);
            });
        });
    });

    group.finish();
}

fn bench_flush_group(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = create_cache();

    let mut group = c.benchmark_group("flush_group");
    group.throughput(Throughput::Elements(100));

    group.bench_function("100_members", |b| {
        b.iter(|| {
            rt.block_on(async {
                for i in 0..100u32 {
                    cache.set(&i.to_string(), "posts", &i, true, 0).await;
                }
                black_box(cache.flush_group("posts").await);
            });
        });
    });

    group.finish();
}

criterion_group!(benches, bench_set, bench_get, bench_flush_group);
criterion_main!(benches);
