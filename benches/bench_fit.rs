#[macro_use]
extern crate criterion;

use criterion::{BenchmarkId, Criterion};
use rand::prelude::*;
use rand::rngs::StdRng;
use rlinear::{
    with_intercept, BaggedRegressor, ColumnMajorMatrix, Dataset, EnsembleParams,
    OrdinaryLeastSquares, Ridge, RidgeParams,
};

/// Random dataset with a known linear relationship, the size of a small housing dataset.
fn dataset(n_rows: usize, n_features: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(0);
    let features =
        ColumnMajorMatrix::from_function(n_rows, n_features, |_, _| rng.gen_range(-1.0..1.0));
    let target = (0..n_rows)
        .map(|row| {
            (0..n_features)
                .map(|col| (col + 1) as f64 * features[(row, col)])
                .sum::<f64>()
                + 3.
        })
        .collect();
    Dataset { features, target }
}

fn bench_estimators(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimators");
    for &n_features in &[4, 13, 50] {
        let train = dataset(354, n_features);
        let x = with_intercept(&train.features);
        group.bench_with_input(BenchmarkId::new("ols", n_features), &x, |b, x| {
            b.iter(|| rlinear::ols(x, &train.target).expect("ols"))
        });
        group.bench_with_input(BenchmarkId::new("ridge", n_features), &x, |b, x| {
            b.iter(|| rlinear::ridge(x, &train.target, 0.1).expect("ridge"))
        });
    }
    group.finish();
}

fn bench_bootstrap(c: &mut Criterion) {
    let train = dataset(354, 13);
    let params = EnsembleParams {
        n_iterations: 100,
        bootstrap: true,
    };
    c.bench_function("bootstrap ols", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(1);
            BaggedRegressor::build(&train, OrdinaryLeastSquares::default(), &params, &mut rng)
                .expect("ensemble")
        })
    });
    c.bench_function("bootstrap ridge", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(1);
            let ridge = Ridge::new(RidgeParams { lambda: 0.1 });
            BaggedRegressor::build(&train, ridge, &params, &mut rng).expect("ensemble")
        })
    });
}

criterion_group!(benches, bench_estimators, bench_bootstrap);
criterion_main!(benches);
