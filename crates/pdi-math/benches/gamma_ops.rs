//! Criterion benchmarks for `pdi-math`.
//!
//! Focus on the density kernel that dominates posterior grid scoring.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pdi_math::math::gamma::gamma_log_pdf;
use pdi_math::math::stable::log_gamma;

fn bench_gamma_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("gamma");

    // Parameter regimes seen for persistence coordinates.
    for (name, alpha, beta) in [
        ("sub_exponential", 0.7, 1.2),
        ("creation_like", 7.0, 0.7),
        ("destruction_like", 8.0, 1.9),
        ("concentrated", 60.0, 12.0),
    ] {
        group.bench_with_input(
            BenchmarkId::new("gamma_log_pdf", name),
            &(alpha, beta),
            |b, &(a, bta)| {
                b.iter(|| {
                    let x = 3.7_f64;
                    black_box(gamma_log_pdf(black_box(x), black_box(a), black_box(bta)));
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("log_gamma", name), &alpha, |b, &a| {
            b.iter(|| black_box(log_gamma(black_box(a))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gamma_kernels);
criterion_main!(benches);
