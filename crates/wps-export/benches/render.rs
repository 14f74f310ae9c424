//! Benchmarks for export rendering

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use std::hint::black_box;
use wps_export::{render, ExportFormat, OdsOptions};

fn rows(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "id": i,
                "title": format!("Post number {i}"),
                "status": if i % 3 == 0 { "draft" } else { "publish" },
                "comments": i % 17,
            })
        })
        .collect()
}

fn bench_formats(c: &mut Criterion) {
    let options = OdsOptions::default();
    let mut group = c.benchmark_group("render");

    for count in [100usize, 1_000] {
        let data = rows(count);
        group.throughput(Throughput::Elements(count as u64));

        for tag in ["csv", "json", "xml", "php_array", "serialized", "ods"] {
            let format = ExportFormat::parse(tag);
            group.bench_with_input(BenchmarkId::new(tag, count), &data, |b, data| {
                b.iter(|| black_box(render(&format, black_box(data), &options).unwrap()));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_formats);
criterion_main!(benches);
