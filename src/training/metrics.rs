//! Regression error metrics

use crate::error::{CurveError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error metric measured on each side of a learning curve. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMetric {
    #[default]
    MeanSquaredError,
    RootMeanSquaredError,
    MeanAbsoluteError,
}

impl ErrorMetric {
    pub fn compute(&self, y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
        if y_true.len() != y_pred.len() {
            return Err(CurveError::ShapeError {
                expected: format!("predictions length = {}", y_true.len()),
                actual: format!("predictions length = {}", y_pred.len()),
            });
        }
        if y_true.is_empty() {
            return Err(CurveError::InvalidInput(
                "cannot score an empty set of predictions".to_string(),
            ));
        }

        let n = y_true.len() as f64;
        let errors = y_true - y_pred;

        let value = match self {
            ErrorMetric::MeanSquaredError => errors.mapv(|e| e * e).sum() / n,
            ErrorMetric::RootMeanSquaredError => (errors.mapv(|e| e * e).sum() / n).sqrt(),
            ErrorMetric::MeanAbsoluteError => errors.mapv(f64::abs).sum() / n,
        };

        Ok(value)
    }

    /// Short label used in tables and exports
    pub fn short_name(&self) -> &'static str {
        match self {
            ErrorMetric::MeanSquaredError => "mse",
            ErrorMetric::RootMeanSquaredError => "rmse",
            ErrorMetric::MeanAbsoluteError => "mae",
        }
    }
}

impl fmt::Display for ErrorMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorMetric::MeanSquaredError => "Mean squared error",
            ErrorMetric::RootMeanSquaredError => "Root mean squared error",
            ErrorMetric::MeanAbsoluteError => "Mean absolute error",
        };
        f.write_str(name)
    }
}

impl FromStr for ErrorMetric {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mse" | "mean_squared_error" => Ok(ErrorMetric::MeanSquaredError),
            "rmse" | "root_mean_squared_error" => Ok(ErrorMetric::RootMeanSquaredError),
            "mae" | "mean_absolute_error" => Ok(ErrorMetric::MeanAbsoluteError),
            other => Err(CurveError::InvalidInput(format!("unknown metric '{}'", other))),
        }
    }
}
