//! Learning-curve results

use crate::training::ErrorMetric;
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// One point on a curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub train_size: usize,
    pub error: f64,
}

/// Training and validation error per training size, for one estimator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningCurve {
    pub estimator: String,
    pub metric: ErrorMetric,
    /// Records in the dataset the curve was computed on
    pub n_samples: usize,
    pub train_sizes: Vec<usize>,
    /// Per-fold training error, shape `(sizes, folds)`
    pub train_scores: Array2<f64>,
    /// Per-fold validation error, shape `(sizes, folds)`
    pub validation_scores: Array2<f64>,
    /// Fold-averaged training error, aligned with `train_sizes`
    pub train_errors: Vec<f64>,
    /// Fold-averaged validation error, aligned with `train_sizes`
    pub validation_errors: Vec<f64>,
}

impl LearningCurve {
    pub(crate) fn from_scores(
        estimator: String,
        metric: ErrorMetric,
        n_samples: usize,
        train_sizes: Vec<usize>,
        train_scores: Array2<f64>,
        validation_scores: Array2<f64>,
    ) -> Self {
        let train_errors = row_means(&train_scores);
        let validation_errors = row_means(&validation_scores);

        Self {
            estimator,
            metric,
            n_samples,
            train_sizes,
            train_scores,
            validation_scores,
            train_errors,
            validation_errors,
        }
    }

    /// Number of training sizes
    pub fn len(&self) -> usize {
        self.train_sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train_sizes.is_empty()
    }

    pub fn n_folds(&self) -> usize {
        self.train_scores.ncols()
    }

    pub fn train_points(&self) -> Vec<CurvePoint> {
        points(&self.train_sizes, &self.train_errors)
    }

    pub fn validation_points(&self) -> Vec<CurvePoint> {
        points(&self.train_sizes, &self.validation_errors)
    }

    /// Population standard deviation of training error across folds
    pub fn train_std(&self) -> Vec<f64> {
        row_stds(&self.train_scores)
    }

    /// Population standard deviation of validation error across folds
    pub fn validation_std(&self) -> Vec<f64> {
        row_stds(&self.validation_scores)
    }

    /// Largest error on either curve, handy for axis limits
    pub fn max_error(&self) -> f64 {
        self.train_errors
            .iter()
            .chain(self.validation_errors.iter())
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }
}

fn points(sizes: &[usize], errors: &[f64]) -> Vec<CurvePoint> {
    sizes
        .iter()
        .zip(errors.iter())
        .map(|(&train_size, &error)| CurvePoint { train_size, error })
        .collect()
}

fn row_means(scores: &Array2<f64>) -> Vec<f64> {
    let k = scores.ncols() as f64;
    scores.axis_iter(Axis(0)).map(|row| row.sum() / k).collect()
}

fn row_stds(scores: &Array2<f64>) -> Vec<f64> {
    scores.axis_iter(Axis(0)).map(|row| row.std(0.0)).collect()
}
