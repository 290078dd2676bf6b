//! In-memory labeled dataset

use crate::error::{CurveError, Result};
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Ordered records of named numeric features plus one numeric target.
///
/// Rows of `features` are records; `targets[i]` belongs to row `i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    feature_names: Vec<String>,
    target_name: String,
    features: Array2<f64>,
    targets: Array1<f64>,
}

impl Dataset {
    /// Build a dataset from arrays, checking that shapes agree
    pub fn new(
        feature_names: Vec<String>,
        target_name: impl Into<String>,
        features: Array2<f64>,
        targets: Array1<f64>,
    ) -> Result<Self> {
        if features.nrows() != targets.len() {
            return Err(CurveError::ShapeError {
                expected: format!("targets length = {}", features.nrows()),
                actual: format!("targets length = {}", targets.len()),
            });
        }
        if feature_names.len() != features.ncols() {
            return Err(CurveError::ShapeError {
                expected: format!("{} feature names", features.ncols()),
                actual: format!("{} feature names", feature_names.len()),
            });
        }

        Ok(Self {
            feature_names,
            target_name: target_name.into(),
            features,
            targets,
        })
    }

    /// Build a dataset with generated feature names (`x0`, `x1`, ...)
    pub fn from_arrays(features: Array2<f64>, targets: Array1<f64>) -> Result<Self> {
        let names = (0..features.ncols()).map(|i| format!("x{}", i)).collect();
        Self::new(names, "y", features, targets)
    }

    /// Extract a dataset from a DataFrame.
    ///
    /// With `features = None` every column except the target is used.
    /// Null cells are rejected rather than imputed.
    pub fn from_dataframe(df: &DataFrame, target: &str, features: Option<&[String]>) -> Result<Self> {
        let feature_cols: Vec<String> = match features {
            Some(cols) => cols.to_vec(),
            None => df
                .get_column_names()
                .into_iter()
                .filter(|name| name.as_str() != target)
                .map(|s| s.to_string())
                .collect(),
        };

        if feature_cols.is_empty() {
            return Err(CurveError::DataError(
                "no feature columns besides the target".to_string(),
            ));
        }

        let targets: Array1<f64> = Array1::from_vec(column_values(df, target)?);

        let col_data: Vec<Vec<f64>> = feature_cols
            .iter()
            .map(|name| column_values(df, name))
            .collect::<Result<Vec<Vec<f64>>>>()?;

        let n_rows = df.height();
        let col_refs: Vec<&[f64]> = col_data.iter().map(|c| c.as_slice()).collect();
        let features = Array2::from_shape_fn((n_rows, feature_cols.len()), |(r, c)| col_refs[c][r]);

        Self::new(feature_cols, target, features, targets)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    pub fn targets(&self) -> &Array1<f64> {
        &self.targets
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Copy out the records at `indices`, in that order
    pub fn select(&self, indices: &[usize]) -> (Array2<f64>, Array1<f64>) {
        (
            self.features.select(Axis(0), indices),
            self.targets.select(Axis(0), indices),
        )
    }

    /// Population variance of the target, i.e. the MSE of always predicting the mean
    pub fn target_variance(&self) -> Option<f64> {
        let mean = self.targets.mean()?;
        Some(self.targets.mapv(|v| (v - mean).powi(2)).sum() / self.len() as f64)
    }
}

fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| CurveError::FeatureNotFound(name.to_string()))?;

    if column.null_count() > 0 {
        return Err(CurveError::DataError(format!(
            "column '{}' has {} missing values",
            name,
            column.null_count()
        )));
    }

    let as_f64 = column
        .cast(&DataType::Float64)
        .map_err(|e| CurveError::DataError(e.to_string()))?;

    // A failed numeric cast turns values into nulls
    if as_f64.null_count() > 0 {
        return Err(CurveError::DataError(format!(
            "column '{}' is not numeric",
            name
        )));
    }

    let values = as_f64
        .f64()
        .map_err(|e| CurveError::DataError(e.to_string()))?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect();

    Ok(values)
}
