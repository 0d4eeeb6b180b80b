//! Selection and report rendering over synthetic measurements

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use aoco_advisor::{
    BenchmarkResult, ColumnBenchmark, ColumnDescriptor, ColumnReport, CompressionType,
    CompressionVariant, ReportRenderer, SelectionPolicy, TrialOutcome, VariantCatalog,
};

/// One measured result per catalog variant, sizes spread around 1 MB
fn measurements(column: &str) -> Vec<BenchmarkResult> {
    VariantCatalog::all_variants()
        .into_iter()
        .enumerate()
        .map(|(i, variant)| {
            let size_bytes = 1_000_000 - (i as u64 * 7_919) % 120_000;
            BenchmarkResult {
                column_name: column.to_string(),
                ordinal: 1,
                variant,
                size_bytes,
                size_human: format!("{} bytes", size_bytes),
            }
        })
        .collect()
}

fn bench_select(c: &mut Criterion) {
    let results = measurements("amount");
    let current = CompressionVariant::new(CompressionType::Zlib, 5);

    let mut group = c.benchmark_group("select");
    for threshold in [50u8, 90, 99] {
        let policy = SelectionPolicy::new(threshold);
        group.bench_with_input(BenchmarkId::from_parameter(threshold), &policy, |b, policy| {
            b.iter(|| policy.select(black_box(&results), Some(&current)))
        });
    }
    group.finish();
}

fn bench_render_column(c: &mut Criterion) {
    let results = measurements("amount");
    let column = ColumnDescriptor::new("amount", 1)
        .with_original(CompressionVariant::new(CompressionType::Zlib, 5));
    let benchmark = ColumnBenchmark::new(
        column,
        results.into_iter().map(TrialOutcome::Measured).collect(),
    );
    let report = ColumnReport::resolve(benchmark, &SelectionPolicy::new(90));

    c.bench_function("render_column", |b| {
        b.iter(|| ReportRenderer.render_column(black_box(&report)))
    });
}

criterion_group!(benches, bench_select, bench_render_column);
criterion_main!(benches);
