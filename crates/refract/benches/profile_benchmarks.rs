//! Benchmarks for the sampling, statistics and association stages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use refract::assoc::{AssociationConfig, AssociationEngine};
use refract::infer::TypeSampler;
use refract::profile::IndexBuildOptions;
use refract::stats::StatsComputer;
use refract::DataTable;

fn synthetic_table(rows: usize) -> DataTable {
    let headers = vec![
        "order_id".to_string(),
        "created_at".to_string(),
        "amount".to_string(),
        "quantity".to_string(),
        "channel".to_string(),
    ];
    let data = (0..rows)
        .map(|i| {
            vec![
                format!("ord-{i:06}"),
                format!("2024-{:02}-{:02}", (i % 12) + 1, (i % 28) + 1),
                format!("{}.{:02}", 50 + (i * 13) % 900, i % 100),
                format!("{}", 1 + i % 9),
                ["online", "retail", "partner"][i % 3].to_string(),
            ]
        })
        .collect();
    DataTable::new(headers, data, b',')
}

fn bench_type_inference(c: &mut Criterion) {
    let table = synthetic_table(10_000);
    let sampler = TypeSampler::new();

    c.bench_function("classify_10k_rows_5_cols", |b| {
        b.iter(|| {
            for col in 0..table.column_count() {
                black_box(sampler.classify_column(&table, col));
            }
        })
    });
}

fn bench_column_statistics(c: &mut Criterion) {
    let table = synthetic_table(10_000);
    let sampler = TypeSampler::new();
    let decisions: Vec<_> = (0..table.column_count())
        .map(|col| sampler.classify_column(&table, col))
        .collect();

    c.bench_function("profile_10k_rows_5_cols", |b| {
        b.iter(|| {
            let computer = StatsComputer::new(IndexBuildOptions::default());
            for (col, decision) in decisions.iter().enumerate() {
                black_box(computer.profile_column(&table, col, decision));
            }
        })
    });
}

fn bench_association(c: &mut Criterion) {
    let table = synthetic_table(5_000);
    let sampler = TypeSampler::new();
    let computer = StatsComputer::new(IndexBuildOptions::default());
    let profiles: Vec<_> = (0..table.column_count())
        .map(|col| {
            let decision = sampler.classify_column(&table, col);
            computer.profile_column(&table, col, &decision)
        })
        .collect();

    c.bench_function("associations_5k_rows", |b| {
        b.iter(|| {
            let engine = AssociationEngine::new(AssociationConfig {
                max_columns: 20,
                top_k_per_column: 5,
            });
            black_box(engine.compute(&table, &profiles));
        })
    });
}

criterion_group!(
    benches,
    bench_type_inference,
    bench_column_statistics,
    bench_association
);
criterion_main!(benches);
