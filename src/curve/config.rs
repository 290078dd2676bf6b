//! Learning-curve configuration

use crate::error::{CurveError, Result};
use crate::training::ErrorMetric;
use crate::utils::ParallelConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Requested training-set sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainSizes {
    /// Record counts, used as given
    Absolute(Vec<usize>),
    /// Fractions in (0, 1] of the smallest training pool
    Relative(Vec<f64>),
}

impl Default for TrainSizes {
    fn default() -> Self {
        TrainSizes::Relative(vec![0.1, 0.325, 0.55, 0.775, 1.0])
    }
}

impl TrainSizes {
    /// Resolve to record counts against the smallest training pool.
    ///
    /// Absolute sizes keep the caller's order. Relative sizes are floored, raised to
    /// at least one record, and deduplicated.
    pub fn resolve(&self, smallest_pool: usize) -> Result<Vec<usize>> {
        match self {
            TrainSizes::Absolute(sizes) => {
                if sizes.is_empty() {
                    return Err(CurveError::InvalidConfiguration(
                        "no training sizes requested".to_string(),
                    ));
                }
                if let Some(&bad) = sizes.iter().find(|&&s| s == 0 || s > smallest_pool) {
                    return Err(CurveError::InvalidConfiguration(format!(
                        "training size {} is outside 1..={} (smallest training pool)",
                        bad, smallest_pool
                    )));
                }
                Ok(sizes.clone())
            }
            TrainSizes::Relative(fractions) => {
                if fractions.is_empty() {
                    return Err(CurveError::InvalidConfiguration(
                        "no training sizes requested".to_string(),
                    ));
                }
                if let Some(&bad) = fractions.iter().find(|&&f| !(f > 0.0 && f <= 1.0)) {
                    return Err(CurveError::InvalidConfiguration(format!(
                        "training fraction {} is outside (0, 1]",
                        bad
                    )));
                }

                let mut sizes: Vec<usize> = Vec::with_capacity(fractions.len());
                for &f in fractions {
                    let size = ((f * smallest_pool as f64).floor() as usize).max(1);
                    if !sizes.contains(&size) {
                        sizes.push(size);
                    }
                }

                if sizes.len() < fractions.len() {
                    warn!(
                        requested = fractions.len(),
                        distinct = sizes.len(),
                        smallest_pool,
                        "Some relative training sizes map to the same record count and were dropped"
                    );
                }

                Ok(sizes)
            }
        }
    }
}

/// Configuration for a learning-curve run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningCurveConfig {
    pub train_sizes: TrainSizes,
    /// Number of cross-validation folds (k)
    pub n_folds: usize,
    /// Shuffle record order before cutting folds.
    ///
    /// Without shuffling every fold's pool starts with the same leading records, so
    /// small training sizes reuse near-identical subsets across folds.
    pub shuffle: bool,
    /// Seed for shuffling (entropy when unset)
    pub random_state: Option<u64>,
    pub metric: ErrorMetric,
    pub parallel: ParallelConfig,
}

impl Default for LearningCurveConfig {
    fn default() -> Self {
        Self {
            train_sizes: TrainSizes::default(),
            n_folds: 5,
            shuffle: false,
            random_state: None,
            metric: ErrorMetric::MeanSquaredError,
            parallel: ParallelConfig::default(),
        }
    }
}

impl LearningCurveConfig {
    pub fn new(train_sizes: TrainSizes) -> Self {
        Self {
            train_sizes,
            ..Default::default()
        }
    }

    pub fn with_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn with_metric(mut self, metric: ErrorMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_sizes_keep_order() {
        let sizes = TrainSizes::Absolute(vec![8, 1, 5]).resolve(8).unwrap();
        assert_eq!(sizes, vec![8, 1, 5]);
    }

    #[test]
    fn test_absolute_size_too_large() {
        let result = TrainSizes::Absolute(vec![1, 9]).resolve(8);
        assert!(matches!(result, Err(CurveError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_zero_and_empty_sizes() {
        assert!(TrainSizes::Absolute(vec![0]).resolve(8).is_err());
        assert!(TrainSizes::Absolute(vec![]).resolve(8).is_err());
        assert!(TrainSizes::Relative(vec![]).resolve(8).is_err());
    }

    #[test]
    fn test_relative_sizes() {
        let sizes = TrainSizes::Relative(vec![0.1, 0.5, 1.0]).resolve(40).unwrap();
        assert_eq!(sizes, vec![4, 20, 40]);
    }

    #[test]
    fn test_relative_sizes_deduplicated() {
        let sizes = TrainSizes::Relative(vec![0.01, 0.02, 1.0]).resolve(10).unwrap();
        assert_eq!(sizes, vec![1, 10]);
    }

    #[test]
    fn test_relative_out_of_range() {
        assert!(TrainSizes::Relative(vec![0.0]).resolve(10).is_err());
        assert!(TrainSizes::Relative(vec![1.5]).resolve(10).is_err());
        assert!(TrainSizes::Relative(vec![f64::NAN]).resolve(10).is_err());
    }

    #[test]
    fn test_config_json_defaults() {
        let config: LearningCurveConfig =
            serde_json::from_str(r#"{"train_sizes": {"absolute": [1, 5]}, "n_folds": 3}"#).unwrap();
        assert_eq!(config.train_sizes, TrainSizes::Absolute(vec![1, 5]));
        assert_eq!(config.n_folds, 3);
        assert!(!config.shuffle);
        assert_eq!(config.metric, ErrorMetric::MeanSquaredError);
    }
}
