//! Shadow projection benchmarks
//!
//! Sampling and projecting the true function dominates a 1D shadow chart;
//! everything else is indexing into stored arrays.
//!
//! Run with: cargo bench --bench shadow_projection

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use subspace_plots::catalog::get_function;
use subspace_plots::extract::{project_samples, sample_domain, ShadowSampling};

const SAMPLE_COUNTS: [usize; 3] = [500, 2_500, 10_000];

/// Benchmark uniform domain sampling
fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_domain");
    let function = get_function("sin5D").expect("catalog model");

    for samples in SAMPLE_COUNTS {
        let sampling = ShadowSampling { samples, seed: 42 };
        group.bench_with_input(BenchmarkId::new("sin5D", samples), &sampling, |b, s| {
            b.iter(|| sample_domain(function.as_ref(), black_box(*s)));
        });
    }
    group.finish();
}

/// Benchmark sampling plus projection onto the leading eigenvector
fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("project_samples");

    for model in ["sin5D", "exp10D"] {
        let function = get_function(model).expect("catalog model");
        let direction = function.eigenvector().expect("ridge eigenvector");
        let sampling = ShadowSampling {
            samples: 2_500,
            seed: 42,
        };
        group.bench_with_input(BenchmarkId::new(model, sampling.samples), &direction, |b, w| {
            b.iter(|| project_samples(function.as_ref(), black_box(w), sampling));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sampling, bench_projection);
criterion_main!(benches);
