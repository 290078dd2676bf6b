use super::{CurveSink, PlotConfig};
use crate::curve::LearningCurve;
use crate::error::Result;
use crate::training::ErrorMetric;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// A JSON report of one or more curves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveReport {
    pub generated_at: DateTime<Utc>,
    pub title: Option<String>,
    pub curves: Vec<CurveRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveRecord {
    pub estimator: String,
    pub metric: ErrorMetric,
    pub n_samples: usize,
    pub n_folds: usize,
    pub points: Vec<PointRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointRecord {
    pub train_size: usize,
    pub train_error: f64,
    pub validation_error: f64,
    pub train_std: f64,
    pub validation_std: f64,
    pub train_folds: Vec<f64>,
    pub validation_folds: Vec<f64>,
}

impl From<&LearningCurve> for CurveRecord {
    fn from(curve: &LearningCurve) -> Self {
        let train_std = curve.train_std();
        let validation_std = curve.validation_std();

        let points = (0..curve.len())
            .map(|i| PointRecord {
                train_size: curve.train_sizes[i],
                train_error: curve.train_errors[i],
                validation_error: curve.validation_errors[i],
                train_std: train_std[i],
                validation_std: validation_std[i],
                train_folds: curve.train_scores.row(i).to_vec(),
                validation_folds: curve.validation_scores.row(i).to_vec(),
            })
            .collect();

        Self {
            estimator: curve.estimator.clone(),
            metric: curve.metric,
            n_samples: curve.n_samples,
            n_folds: curve.n_folds(),
            points,
        }
    }
}

/// Writes a pretty-printed [`CurveReport`]
#[derive(Debug, Clone)]
pub struct JsonExport {
    path: PathBuf,
}

impl JsonExport {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn report(curves: &[LearningCurve], config: &PlotConfig) -> CurveReport {
        CurveReport {
            generated_at: Utc::now(),
            title: config.title.clone(),
            curves: curves.iter().map(CurveRecord::from).collect(),
        }
    }
}

impl CurveSink for JsonExport {
    fn emit(&self, curves: &[LearningCurve], config: &PlotConfig) -> Result<()> {
        let report = Self::report(curves, config);
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(writer, &report)?;

        info!(path = %self.path.display(), curves = curves.len(), "Wrote learning curve report");
        Ok(())
    }
}
