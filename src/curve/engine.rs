//! Learning-curve computation

use super::config::LearningCurveConfig;
use super::result::LearningCurve;
use crate::data::Dataset;
use crate::error::{CurveError, Result};
use crate::training::{CVSplit, Estimator, ErrorMetric, KFold};
use crate::utils::parallel_map;
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Computes learning curves for one configuration, any number of estimators
#[derive(Debug, Clone, Default)]
pub struct LearningCurveRunner {
    config: LearningCurveConfig,
}

impl LearningCurveRunner {
    pub fn new(config: LearningCurveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LearningCurveConfig {
        &self.config
    }

    /// Compute the curve of `estimator` on `dataset`.
    ///
    /// For every training size `n` and every fold, the estimator is fitted on the
    /// first `n` records of that fold's training pool and scored on the pool itself
    /// and on the held-out fold. Errors are averaged over all folds.
    ///
    /// Fails with [`CurveError::InvalidConfiguration`] before any fitting when the
    /// dataset, fold count or sizes are unusable, and with
    /// [`CurveError::EstimatorFit`] when any single fit or prediction fails.
    pub fn run(&self, estimator: &dyn Estimator, dataset: &Dataset) -> Result<LearningCurve> {
        let start = Instant::now();
        let n_samples = dataset.len();
        let n_folds = self.config.n_folds;

        if n_samples == 0 {
            return Err(CurveError::InvalidConfiguration("dataset is empty".to_string()));
        }

        let splits = self.splitter().split(n_samples)?;
        let smallest_pool = splits
            .iter()
            .map(|s| s.train_indices.len())
            .min()
            .unwrap_or(0);
        let sizes = self.config.train_sizes.resolve(smallest_pool)?;

        if !self.config.shuffle && sizes.len() > 1 {
            warn!(
                n_sizes = sizes.len(),
                "Folds are not shuffled; small training sizes reuse the same leading records in every fold"
            );
        }

        let name = estimator.name();
        info!(
            estimator = %name,
            n_samples,
            n_folds,
            sizes = ?sizes,
            metric = %self.config.metric,
            "Computing learning curve"
        );

        let tasks: Vec<(usize, usize)> = (0..sizes.len())
            .flat_map(|si| (0..n_folds).map(move |fi| (si, fi)))
            .collect();

        let metric = self.config.metric;
        let outcomes = parallel_map(tasks, &self.config.parallel, |(si, fi)| {
            evaluate(estimator, dataset, &splits[fi], sizes[si], metric).map(|errors| (si, fi, errors))
        })?;

        let mut train_scores = Array2::<f64>::zeros((sizes.len(), n_folds));
        let mut validation_scores = Array2::<f64>::zeros((sizes.len(), n_folds));
        for outcome in outcomes {
            let (si, fi, (train_error, validation_error)) = outcome?;
            train_scores[[si, fi]] = train_error;
            validation_scores[[si, fi]] = validation_error;
        }

        let curve = LearningCurve::from_scores(
            name,
            metric,
            n_samples,
            sizes,
            train_scores,
            validation_scores,
        );

        info!(
            estimator = %curve.estimator,
            fits = curve.len() * n_folds,
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Learning curve complete"
        );

        Ok(curve)
    }

    /// Compute one curve per estimator over identical folds and sizes
    pub fn run_all<E: Estimator>(&self, estimators: &[E], dataset: &Dataset) -> Result<Vec<LearningCurve>> {
        let runner = self.with_pinned_shuffle();
        estimators
            .iter()
            .map(|e| runner.run(e, dataset))
            .collect()
    }

    /// A runner whose unseeded shuffle is fixed to one freshly drawn seed.
    ///
    /// Runs made through the returned runner all see the same folds. Seeded or
    /// unshuffled configurations are returned unchanged.
    pub fn with_pinned_shuffle(&self) -> Self {
        let mut config = self.config.clone();
        if config.shuffle && config.random_state.is_none() {
            let seed = ChaCha8Rng::from_entropy().gen::<u64>();
            debug!(seed, "Pinned shuffle seed for this batch of curves");
            config.random_state = Some(seed);
        }
        Self { config }
    }

    fn splitter(&self) -> KFold {
        let kfold = KFold::new(self.config.n_folds).with_shuffle(self.config.shuffle);
        match self.config.random_state {
            Some(seed) => kfold.with_random_state(seed),
            None => kfold,
        }
    }
}

/// Compute a learning curve with a one-off configuration
pub fn learning_curve(
    estimator: &dyn Estimator,
    dataset: &Dataset,
    config: &LearningCurveConfig,
) -> Result<LearningCurve> {
    LearningCurveRunner::new(config.clone()).run(estimator, dataset)
}

/// Error of always predicting the mean target, for use as a diagnosis baseline
pub fn baseline_error(targets: &Array1<f64>, metric: ErrorMetric) -> Result<f64> {
    let mean = targets
        .mean()
        .ok_or_else(|| CurveError::InvalidInput("no targets to compute a baseline from".to_string()))?;
    let constant = Array1::from_elem(targets.len(), mean);
    metric.compute(targets, &constant)
}

fn evaluate(
    estimator: &dyn Estimator,
    dataset: &Dataset,
    split: &CVSplit,
    train_size: usize,
    metric: ErrorMetric,
) -> Result<(f64, f64)> {
    let attribute = |source: CurveError| CurveError::EstimatorFit {
        estimator: estimator.name(),
        train_size,
        fold: split.fold_idx,
        source: Box::new(source),
    };

    let (x_train, y_train) = dataset.select(&split.train_indices[..train_size]);
    let (x_val, y_val) = dataset.select(&split.test_indices);

    let model = estimator.fit(&x_train, &y_train).map_err(attribute)?;
    let train_pred = model.predict(&x_train).map_err(attribute)?;
    let val_pred = model.predict(&x_val).map_err(attribute)?;

    let train_error = metric.compute(&y_train, &train_pred).map_err(attribute)?;
    let validation_error = metric.compute(&y_val, &val_pred).map_err(attribute)?;

    debug!(
        train_size,
        fold = split.fold_idx,
        train_error,
        validation_error,
        "Evaluated fold"
    );

    Ok((train_error, validation_error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::TrainSizes;
    use crate::training::{EstimatorConfig, Predictor};
    use crate::utils::ParallelConfig;
    use ndarray::array;

    fn line_dataset(n: usize) -> Dataset {
        let x = Array2::from_shape_fn((n, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(n, |i| 3.0 * i as f64 + 1.0);
        Dataset::from_arrays(x, y).unwrap()
    }

    #[test]
    fn test_curve_shape() {
        let config = LearningCurveConfig::new(TrainSizes::Absolute(vec![2, 4, 8]))
            .with_folds(5);
        let curve = learning_curve(&EstimatorConfig::linear(), &line_dataset(10), &config).unwrap();

        assert_eq!(curve.train_sizes, vec![2, 4, 8]);
        assert_eq!(curve.train_errors.len(), 3);
        assert_eq!(curve.validation_errors.len(), 3);
        assert_eq!(curve.train_scores.dim(), (3, 5));
        assert_eq!(curve.n_samples, 10);
    }

    #[test]
    fn test_exact_model_has_zero_error() {
        let config = LearningCurveConfig::new(TrainSizes::Absolute(vec![2, 8])).with_folds(5);
        let curve = learning_curve(&EstimatorConfig::linear(), &line_dataset(10), &config).unwrap();

        for e in curve.train_errors.iter().chain(curve.validation_errors.iter()) {
            assert!(*e < 1e-12, "error {}", e);
        }
    }

    #[test]
    fn test_size_exceeding_pool_rejected() {
        let config = LearningCurveConfig::new(TrainSizes::Absolute(vec![9])).with_folds(5);
        let result = learning_curve(&EstimatorConfig::linear(), &line_dataset(10), &config);
        assert!(matches!(result, Err(CurveError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let dataset = Dataset::from_arrays(Array2::zeros((0, 1)), Array1::zeros(0)).unwrap();
        let config = LearningCurveConfig::new(TrainSizes::Absolute(vec![1])).with_folds(2);
        let result = learning_curve(&EstimatorConfig::linear(), &dataset, &config);
        assert!(matches!(result, Err(CurveError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_too_few_records_for_folds() {
        let config = LearningCurveConfig::new(TrainSizes::Absolute(vec![1])).with_folds(5);
        let result = learning_curve(&EstimatorConfig::linear(), &line_dataset(3), &config);
        assert!(matches!(result, Err(CurveError::InvalidConfiguration(_))));
    }

    struct ConstantEstimator;

    struct Constant(f64);

    impl Predictor for Constant {
        fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
            Ok(Array1::from_elem(x.nrows(), self.0))
        }
    }

    impl Estimator for ConstantEstimator {
        fn name(&self) -> String {
            "constant".to_string()
        }

        fn fit(&self, _x: &Array2<f64>, y: &Array1<f64>) -> Result<Box<dyn Predictor>> {
            Ok(Box::new(Constant(y.mean().unwrap_or(0.0))))
        }
    }

    #[test]
    fn test_custom_estimator_and_sequential_match() {
        let dataset = line_dataset(12);
        let config = LearningCurveConfig::new(TrainSizes::Absolute(vec![1, 3, 9]))
            .with_folds(4)
            .with_shuffle(true)
            .with_random_state(11);

        let pooled = learning_curve(&ConstantEstimator, &dataset, &config).unwrap();
        let sequential = learning_curve(
            &ConstantEstimator,
            &dataset,
            &config.clone().with_parallel(ParallelConfig::sequential()),
        )
        .unwrap();

        assert_eq!(pooled.train_scores, sequential.train_scores);
        assert_eq!(pooled.validation_scores, sequential.validation_scores);
        assert_eq!(pooled.train_errors[0], 0.0);
    }

    #[test]
    fn test_unseeded_shuffle_shares_folds_across_estimators() {
        let dataset = line_dataset(40);
        let config = LearningCurveConfig::new(TrainSizes::Absolute(vec![3, 12, 30]))
            .with_folds(4)
            .with_shuffle(true);
        let runner = LearningCurveRunner::new(config);

        let curves = runner.run_all(&[ConstantEstimator, ConstantEstimator], &dataset).unwrap();
        assert_eq!(curves[0].train_scores, curves[1].train_scores);
        assert_eq!(curves[0].validation_scores, curves[1].validation_scores);

        let pinned = runner.with_pinned_shuffle();
        assert!(pinned.config().random_state.is_some());
        assert!(runner.config().random_state.is_none());
        assert_eq!(pinned.with_pinned_shuffle().config().random_state, pinned.config().random_state);
    }

    #[test]
    fn test_unshuffled_runner_is_not_pinned() {
        let runner = LearningCurveRunner::new(LearningCurveConfig::default());
        assert_eq!(runner.with_pinned_shuffle().config().random_state, None);
    }

    #[test]
    fn test_baseline_error() {
        let targets = array![1.0, 3.0];
        assert_eq!(baseline_error(&targets, ErrorMetric::MeanSquaredError).unwrap(), 1.0);
        assert!(baseline_error(&Array1::zeros(0), ErrorMetric::MeanSquaredError).is_err());
    }
}
