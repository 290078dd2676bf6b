//! Estimator and predictor capabilities

use super::decision_tree::DecisionTree;
use super::linear_models::{LinearRegression, PolynomialRegression};
use super::random_forest::{MaxFeatures, RandomForest};
use crate::error::{CurveError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fitted model
pub trait Predictor: Send + Sync {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}

/// Something that can be fitted to data.
///
/// Every call to [`Estimator::fit`] must return an independent model; no state is
/// shared between fits, so the learning-curve loop may call it concurrently.
pub trait Estimator: Send + Sync {
    /// Human-readable name used in logs, tables and chart titles
    fn name(&self) -> String;

    fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<Box<dyn Predictor>>;
}

impl Predictor for LinearRegression {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        LinearRegression::predict(self, x)
    }
}

impl Predictor for PolynomialRegression {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        PolynomialRegression::predict(self, x)
    }
}

impl Predictor for DecisionTree {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        DecisionTree::predict(self, x)
    }
}

impl Predictor for RandomForest {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        RandomForest::predict(self, x)
    }
}

/// Serializable estimator description, used by the CLI and experiment files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EstimatorConfig {
    LinearRegression {
        #[serde(default = "default_true")]
        fit_intercept: bool,
    },
    Ridge {
        #[serde(default = "default_alpha")]
        alpha: f64,
    },
    Polynomial {
        degree: usize,
        #[serde(default)]
        alpha: f64,
    },
    DecisionTree {
        #[serde(default)]
        max_depth: Option<usize>,
        #[serde(default = "default_min_samples_leaf")]
        min_samples_leaf: usize,
    },
    RandomForest {
        #[serde(default = "default_n_estimators")]
        n_estimators: usize,
        #[serde(default)]
        max_depth: Option<usize>,
        #[serde(default = "default_max_features")]
        max_features: MaxFeatures,
        #[serde(default)]
        random_state: Option<u64>,
    },
}

fn default_true() -> bool {
    true
}

fn default_alpha() -> f64 {
    1.0
}

fn default_min_samples_leaf() -> usize {
    1
}

fn default_n_estimators() -> usize {
    100
}

fn default_max_features() -> MaxFeatures {
    MaxFeatures::All
}

impl EstimatorConfig {
    pub fn linear() -> Self {
        EstimatorConfig::LinearRegression { fit_intercept: true }
    }

    pub fn random_forest(n_estimators: usize) -> Self {
        EstimatorConfig::RandomForest {
            n_estimators,
            max_depth: None,
            max_features: MaxFeatures::All,
            random_state: None,
        }
    }
}

impl fmt::Display for EstimatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimatorConfig::LinearRegression { .. } => write!(f, "Linear Regression"),
            EstimatorConfig::Ridge { alpha } => write!(f, "Ridge (alpha={})", alpha),
            EstimatorConfig::Polynomial { degree, .. } => write!(f, "Polynomial (degree={})", degree),
            EstimatorConfig::DecisionTree { max_depth: Some(d), .. } => write!(f, "Decision Tree (depth={})", d),
            EstimatorConfig::DecisionTree { .. } => write!(f, "Decision Tree"),
            EstimatorConfig::RandomForest { n_estimators, .. } => {
                write!(f, "Random Forest ({} trees)", n_estimators)
            }
        }
    }
}

/// Parses the short names accepted on the command line:
/// `linear`, `ridge[:alpha]`, `poly:<degree>`, `tree[:depth]`, `forest[:n_trees]`.
impl FromStr for EstimatorConfig {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, arg) = match s.split_once(':') {
            Some((k, a)) => (k, Some(a)),
            None => (s, None),
        };

        let invalid = |what: &str, a: &str| CurveError::InvalidInput(format!("invalid {} '{}' in '{}'", what, a, s));
        let parse_count = |what: &str| -> Result<Option<usize>> {
            arg.map(|a| a.parse::<usize>().map_err(|_| invalid(what, a))).transpose()
        };

        match kind.to_lowercase().as_str() {
            "linear" | "linear_regression" => Ok(EstimatorConfig::linear()),
            "ridge" => {
                let alpha = match arg {
                    Some(a) => a
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite() && *v >= 0.0)
                        .ok_or_else(|| invalid("alpha", a))?,
                    None => default_alpha(),
                };
                Ok(EstimatorConfig::Ridge { alpha })
            }
            "poly" | "polynomial" => {
                let degree = parse_count("degree")?
                    .ok_or_else(|| CurveError::InvalidInput(format!("'{}' needs a degree, e.g. poly:3", s)))?;
                if degree == 0 {
                    return Err(invalid("degree", "0"));
                }
                Ok(EstimatorConfig::Polynomial { degree, alpha: 0.0 })
            }
            "tree" | "decision_tree" => Ok(EstimatorConfig::DecisionTree {
                max_depth: parse_count("depth")?,
                min_samples_leaf: 1,
            }),
            "forest" | "random_forest" => {
                let n_estimators = parse_count("tree count")?.unwrap_or_else(default_n_estimators);
                if n_estimators == 0 {
                    return Err(invalid("tree count", "0"));
                }
                Ok(EstimatorConfig::random_forest(n_estimators))
            }
            other => Err(CurveError::InvalidInput(format!("unknown model '{}'", other))),
        }
    }
}

impl Estimator for EstimatorConfig {
    fn name(&self) -> String {
        self.to_string()
    }

    fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<Box<dyn Predictor>> {
        match self {
            EstimatorConfig::LinearRegression { fit_intercept } => {
                let mut model = LinearRegression::new().with_fit_intercept(*fit_intercept);
                model.fit(x, y)?;
                Ok(Box::new(model))
            }
            EstimatorConfig::Ridge { alpha } => {
                let mut model = LinearRegression::new().with_alpha(*alpha);
                model.fit(x, y)?;
                Ok(Box::new(model))
            }
            EstimatorConfig::Polynomial { degree, alpha } => {
                let mut model = PolynomialRegression::new(*degree, *alpha);
                model.fit(x, y)?;
                Ok(Box::new(model))
            }
            EstimatorConfig::DecisionTree { max_depth, min_samples_leaf } => {
                let mut model = DecisionTree::new().with_min_samples_leaf(*min_samples_leaf);
                if let Some(d) = max_depth {
                    model = model.with_max_depth(*d);
                }
                model.fit(x, y)?;
                Ok(Box::new(model))
            }
            EstimatorConfig::RandomForest { n_estimators, max_depth, max_features, random_state } => {
                let mut model = RandomForest::new(*n_estimators).with_max_features(*max_features);
                if let Some(d) = max_depth {
                    model = model.with_max_depth(*d);
                }
                if let Some(seed) = random_state {
                    model = model.with_random_state(*seed);
                }
                model.fit(x, y)?;
                Ok(Box::new(model))
            }
        }
    }
}
