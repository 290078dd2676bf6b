//! Estimators, fold splitting and error metrics
//!
//! Provides the regression models a learning curve is computed for:
//! - Linear models (OLS, ridge, polynomial)
//! - Decision tree and random forest regressors
//! - K-fold cross-validation splitting
//! - Regression error metrics

pub mod cross_validation;
pub mod decision_tree;
pub mod estimator;
pub mod linear_models;
pub mod metrics;
pub mod random_forest;

pub use cross_validation::{CVSplit, KFold};
pub use decision_tree::{DecisionTree, TreeNode};
pub use estimator::{Estimator, EstimatorConfig, Predictor};
pub use linear_models::{LinearRegression, PolynomialRegression};
pub use metrics::ErrorMetric;
pub use random_forest::{MaxFeatures, RandomForest};
