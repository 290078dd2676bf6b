use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kolosal_curves::prelude::*;
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

fn create_regression_data(n_rows: usize, n_features: usize) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let features = Array2::from_shape_fn((n_rows, n_features), |_| rng.gen::<f64>() * 10.0);
    let targets: Array1<f64> = features
        .rows()
        .into_iter()
        .map(|row| row.sum() + rng.gen::<f64>() * 0.1)
        .collect();

    Dataset::from_arrays(features, targets).unwrap()
}

fn bench_linear_curve(c: &mut Criterion) {
    let mut group = c.benchmark_group("linear_curve");

    for n_rows in [500, 2000, 8000].iter() {
        let dataset = create_regression_data(*n_rows, 10);
        let config = LearningCurveConfig::new(TrainSizes::Relative(vec![0.1, 0.325, 0.55, 0.775, 1.0]))
            .with_folds(5)
            .with_shuffle(true)
            .with_random_state(42);

        group.bench_with_input(BenchmarkId::new("rows", n_rows), &dataset, |b, dataset| {
            b.iter(|| learning_curve(&EstimatorConfig::linear(), black_box(dataset), &config).unwrap())
        });
    }

    group.finish();
}

fn bench_forest_curve(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_curve");
    group.sample_size(10); // Fewer samples for ensemble fits

    let dataset = create_regression_data(1000, 8);
    let estimator = EstimatorConfig::RandomForest {
        n_estimators: 20,
        max_depth: Some(8),
        max_features: MaxFeatures::Sqrt,
        random_state: Some(1),
    };

    for jobs in [1usize, 4].iter() {
        let config = LearningCurveConfig::new(TrainSizes::Relative(vec![0.25, 0.5, 1.0]))
            .with_folds(5)
            .with_shuffle(true)
            .with_random_state(42)
            .with_parallel(ParallelConfig::new().with_jobs(*jobs));

        group.bench_with_input(BenchmarkId::new("jobs", jobs), &dataset, |b, dataset| {
            b.iter(|| learning_curve(&estimator, black_box(dataset), &config).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_linear_curve, bench_forest_curve);
criterion_main!(benches);
