//! Experiment files
//!
//! An experiment file is a JSON document naming a dataset, the estimators to compare
//! and how their curves are computed and written out.

use crate::curve::{DiagnosisThresholds, LearningCurveConfig};
use crate::data::{DataLoader, Dataset};
use crate::error::{CurveError, Result};
use crate::plot::{CsvExport, CurveSink, JsonExport, PlotConfig, SvgChart};
use crate::training::EstimatorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where to write results; any subset may be set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub svg: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

impl OutputPaths {
    pub fn is_empty(&self) -> bool {
        self.svg.is_none() && self.csv.is_none() && self.json.is_none()
    }

    pub fn sinks(&self) -> Vec<Box<dyn CurveSink>> {
        let mut sinks: Vec<Box<dyn CurveSink>> = Vec::new();
        if let Some(path) = &self.svg {
            sinks.push(Box::new(SvgChart::new(path)));
        }
        if let Some(path) = &self.csv {
            sinks.push(Box::new(CsvExport::new(path)));
        }
        if let Some(path) = &self.json {
            sinks.push(Box::new(JsonExport::new(path)));
        }
        sinks
    }

    fn rebase(&mut self, base: &Path) {
        for path in [&mut self.svg, &mut self.csv, &mut self.json].into_iter().flatten() {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Dataset file; relative paths are resolved against the experiment file
    pub data: PathBuf,
    pub target: String,
    /// Feature columns; every other numeric column when unset
    #[serde(default)]
    pub features: Option<Vec<String>>,
    pub estimators: Vec<EstimatorConfig>,
    #[serde(default)]
    pub curve: LearningCurveConfig,
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub outputs: OutputPaths,
    #[serde(default)]
    pub diagnosis: DiagnosisThresholds,
}

impl ExperimentConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_json(&text)
            .map_err(|e| CurveError::ConfigError(format!("{}: {}", path.display(), e)))?;

        if let Some(base) = path.parent() {
            if config.data.is_relative() {
                config.data = base.join(&config.data);
            }
            config.outputs.rebase(base);
        }

        debug!(path = %path.display(), estimators = config.estimators.len(), "Loaded experiment");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| CurveError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target.trim().is_empty() {
            return Err(CurveError::ConfigError("target column is empty".to_string()));
        }
        if self.estimators.is_empty() {
            return Err(CurveError::ConfigError("no estimators listed".to_string()));
        }
        if self.curve.n_folds < 2 {
            return Err(CurveError::ConfigError(format!(
                "n_folds must be at least 2, got {}",
                self.curve.n_folds
            )));
        }
        Ok(())
    }

    pub fn load_dataset(&self) -> Result<Dataset> {
        DataLoader::new().load_dataset(&self.data, &self.target, self.features.as_deref())
    }
}
