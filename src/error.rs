//! Error types for learning-curve computation

use thiserror::Error;

/// Result type alias for curve operations
pub type Result<T> = std::result::Result<T, CurveError>;

/// Main error type
#[derive(Error, Debug)]
pub enum CurveError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Estimator '{estimator}' failed at train_size={train_size}, fold={fold}: {source}")]
    EstimatorFit {
        estimator: String,
        train_size: usize,
        fold: usize,
        #[source]
        source: Box<CurveError>,
    },

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Plot error: {0}")]
    PlotError(String),

    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),
}

impl From<polars::error::PolarsError> for CurveError {
    fn from(err: polars::error::PolarsError) -> Self {
        CurveError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for CurveError {
    fn from(err: serde_json::Error) -> Self {
        CurveError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for CurveError {
    fn from(err: ndarray::ShapeError) -> Self {
        CurveError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = CurveError::InvalidConfiguration("k must be at least 2".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: k must be at least 2");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CurveError = io_err.into();
        assert!(matches!(err, CurveError::IoError(_)));
    }

    #[test]
    fn test_estimator_fit_keeps_source() {
        let err = CurveError::EstimatorFit {
            estimator: "Linear Regression".to_string(),
            train_size: 5,
            fold: 1,
            source: Box::new(CurveError::ComputationError("singular".to_string())),
        };
        assert!(err.to_string().contains("train_size=5"));
        let source = err.source().map(|s| s.to_string()).unwrap_or_default();
        assert_eq!(source, "Computation error: singular");
    }
}
