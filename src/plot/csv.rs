use super::{CurveSink, PlotConfig};
use crate::curve::LearningCurve;
use crate::error::Result;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes curves as a long-format CSV table, one row per estimator and training size
#[derive(Debug, Clone)]
pub struct CsvExport {
    path: PathBuf,
}

impl CsvExport {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Columns: estimator, metric, train_size, train_error, validation_error,
    /// train_std, validation_std
    pub fn to_dataframe(curves: &[LearningCurve]) -> Result<DataFrame> {
        let mut estimator = Vec::new();
        let mut metric = Vec::new();
        let mut train_size = Vec::new();
        let mut train_error = Vec::new();
        let mut validation_error = Vec::new();
        let mut train_std = Vec::new();
        let mut validation_std = Vec::new();

        for curve in curves {
            let t_std = curve.train_std();
            let v_std = curve.validation_std();
            for i in 0..curve.len() {
                estimator.push(curve.estimator.clone());
                metric.push(curve.metric.short_name().to_string());
                train_size.push(curve.train_sizes[i] as u64);
                train_error.push(curve.train_errors[i]);
                validation_error.push(curve.validation_errors[i]);
                train_std.push(t_std[i]);
                validation_std.push(v_std[i]);
            }
        }

        let df = df!(
            "estimator" => estimator,
            "metric" => metric,
            "train_size" => train_size,
            "train_error" => train_error,
            "validation_error" => validation_error,
            "train_std" => train_std,
            "validation_std" => validation_std,
        )?;

        Ok(df)
    }
}

impl CurveSink for CsvExport {
    fn emit(&self, curves: &[LearningCurve], _config: &PlotConfig) -> Result<()> {
        let mut df = Self::to_dataframe(curves)?;
        let mut file = File::create(&self.path)?;
        CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;

        info!(path = %self.path.display(), rows = df.height(), "Wrote learning curve table");
        Ok(())
    }
}
