//! Criterion microbenches for beecell parsing, rendering and catalog ordering.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - Annotation JSON parsing (from_annotations_json_str, from_annotations_json_slice)
//! - Annotation CSV rendering (to_annotations_csv_string)
//! - Catalog sort and pagination over a synthetic image set

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use std::hint::black_box;

use beecell::catalog::{paginate, sort_records, ImageRecord};
use beecell::model::io_csv::to_annotations_csv_string;
use beecell::model::io_json::{from_annotations_json_slice, from_annotations_json_str};
use beecell::model::{Annotation, CellClass, ImageKey};

// Include test fixtures at compile time (no file I/O during benchmark)
const ANNOTATIONS_FIXTURE: &str = include_str!("../tests/fixtures/sample_annotations.json");

/// A busy frame: a few hundred points cycling through every class.
fn dense_frame(len: usize) -> Vec<Annotation> {
    (0..len)
        .map(|i| {
            Annotation::new(CellClass::ALL[i % 8], (i % 64) as f64 * 9.5, (i / 64) as f64 * 9.5)
                .with_timestamp("2026-01-01T00:00:00.000000")
        })
        .collect()
}

fn synthetic_records(len: usize) -> Vec<ImageRecord> {
    (0..len)
        .map(|i| {
            let filename = format!("frame_{:05}.jpg", (i * 7919) % len);
            ImageRecord::new(
                ImageKey::from_file_name(&filename).expect("valid stem"),
                filename.clone(),
                format!("images/{}", filename),
                (i * 31) % 17,
            )
        })
        .collect()
}

fn bench_json_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotations_json_parse");
    group.throughput(Throughput::Bytes(ANNOTATIONS_FIXTURE.len() as u64));

    group.bench_function("from_annotations_json_str", |b| {
        b.iter(|| {
            let list = from_annotations_json_str(black_box(ANNOTATIONS_FIXTURE)).unwrap();
            black_box(list)
        })
    });

    let bytes = ANNOTATIONS_FIXTURE.as_bytes();
    group.bench_function("from_annotations_json_slice", |b| {
        b.iter(|| {
            let list = from_annotations_json_slice(black_box(bytes)).unwrap();
            black_box(list)
        })
    });

    group.finish();
}

fn bench_csv_render(c: &mut Criterion) {
    let annotations = dense_frame(400);

    let mut group = c.benchmark_group("annotations_csv_render");
    group.throughput(Throughput::Elements(annotations.len() as u64));

    group.bench_function("to_annotations_csv_string", |b| {
        b.iter(|| {
            let csv = to_annotations_csv_string(black_box(&annotations)).unwrap();
            black_box(csv)
        })
    });

    group.finish();
}

/// Sorting and slicing dominate a catalog request once the counts are loaded.
fn bench_catalog_page(c: &mut Criterion) {
    let records = synthetic_records(2_000);

    let mut group = c.benchmark_group("catalog");
    group.throughput(Throughput::Elements(records.len() as u64));

    group.bench_function("sort_and_paginate", |b| {
        b.iter_batched(
            || records.clone(),
            |mut records| {
                sort_records(&mut records);
                black_box(paginate(records, black_box(7), 20))
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_json_parse, bench_csv_render, bench_catalog_page);
criterion_main!(benches);
