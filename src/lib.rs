//! Kolosal Curves - learning curves for regression models
//!
//! For a list of training-set sizes, fits an estimator on growing subsets of every
//! cross-validation fold's training pool and reports fold-averaged training and
//! validation error. The two curves show whether a model suffers from bias (both
//! errors high and close) or variance (a wide gap between them).
//!
//! # Modules
//!
//! - [`curve`] - Learning-curve computation, results and bias/variance diagnosis
//! - [`training`] - Estimators, k-fold splitting and error metrics
//! - [`data`] - In-memory datasets and file loading
//! - [`plot`] - SVG charts and CSV/JSON export
//! - [`config`] - JSON experiment files
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use kolosal_curves::prelude::*;
//! use ndarray::{Array1, Array2};
//!
//! let x = Array2::from_shape_fn((10, 1), |(i, _)| i as f64);
//! let y = Array1::from_shape_fn(10, |i| 2.0 * i as f64 + 1.0);
//! let dataset = Dataset::from_arrays(x, y)?;
//!
//! let config = LearningCurveConfig::new(TrainSizes::Absolute(vec![1, 5, 8])).with_folds(5);
//! let curve = learning_curve(&EstimatorConfig::linear(), &dataset, &config)?;
//! assert_eq!(curve.train_errors.len(), 3);
//! # Ok::<(), kolosal_curves::CurveError>(())
//! ```

// Core error handling
pub mod error;

// Learning curves
pub mod curve;
pub mod training;

// Data
pub mod data;

// Output
pub mod plot;

// Utilities
pub mod config;
pub mod utils;

// Services
pub mod cli;

pub use error::{CurveError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{CurveError, Result};

    // Curves
    pub use crate::curve::{
        baseline_error, learning_curve, CurvePoint, Diagnosis, DiagnosisThresholds, LearningCurve,
        LearningCurveConfig, LearningCurveRunner, TrainSizes, Verdict,
    };

    // Estimators
    pub use crate::training::{
        DecisionTree, ErrorMetric, Estimator, EstimatorConfig, KFold, LinearRegression,
        MaxFeatures, PolynomialRegression, Predictor, RandomForest,
    };

    // Data
    pub use crate::data::{DataLoader, Dataset};

    // Output
    pub use crate::plot::{CsvExport, CurveSink, JsonExport, PlotConfig, SvgChart};

    // Experiments
    pub use crate::config::{ExperimentConfig, OutputPaths};

    // Parallelism
    pub use crate::utils::ParallelConfig;
}
