//! Learning curves
//!
//! A learning curve records how training and validation error of an estimator move
//! as the number of training records grows, averaged over k cross-validation folds.

mod config;
mod diagnosis;
mod engine;
mod result;

pub use config::{LearningCurveConfig, TrainSizes};
pub use diagnosis::{Diagnosis, DiagnosisThresholds, Verdict};
pub use engine::{baseline_error, learning_curve, LearningCurveRunner};
pub use result::{CurvePoint, LearningCurve};
