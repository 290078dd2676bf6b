//! Bias/variance reading of a finished curve

use super::result::LearningCurve;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Thresholds for [`LearningCurve::diagnose`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosisThresholds {
    /// Relative gap `(validation - train) / validation` at the largest size above
    /// which the model is flagged as high-variance
    pub variance_gap_ratio: f64,
    /// Training error as a fraction of the baseline error above which the model
    /// is flagged as high-bias
    pub bias_error_ratio: f64,
}

impl Default for DiagnosisThresholds {
    fn default() -> Self {
        Self {
            variance_gap_ratio: 0.3,
            bias_error_ratio: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    HighVariance,
    HighBias,
    HighBiasAndVariance,
    Balanced,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Verdict::HighVariance => "high variance (more data or regularization should help)",
            Verdict::HighBias => "high bias (a more flexible model should help)",
            Verdict::HighBiasAndVariance => "high bias and high variance",
            Verdict::Balanced => "balanced",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub verdict: Verdict,
    pub final_train_error: f64,
    pub final_validation_error: f64,
    /// `validation - train` at the largest training size
    pub gap: f64,
    /// Error of always predicting the target mean, same metric
    pub baseline_error: f64,
}

impl LearningCurve {
    /// Classify the curve at its largest training size.
    ///
    /// `baseline_error` is the error of a constant mean predictor under the curve's
    /// metric. Returns `None` for an empty curve.
    pub fn diagnose(&self, baseline_error: f64, thresholds: &DiagnosisThresholds) -> Option<Diagnosis> {
        let last = self
            .train_sizes
            .iter()
            .enumerate()
            .max_by_key(|(_, &size)| size)
            .map(|(i, _)| i)?;

        let train = self.train_errors[last];
        let validation = self.validation_errors[last];
        let gap = validation - train;

        let relative_gap = if validation > 0.0 { gap / validation } else { 0.0 };
        let high_variance = relative_gap >= thresholds.variance_gap_ratio;
        let high_bias = baseline_error > 0.0 && train >= thresholds.bias_error_ratio * baseline_error;

        let verdict = match (high_bias, high_variance) {
            (true, true) => Verdict::HighBiasAndVariance,
            (true, false) => Verdict::HighBias,
            (false, true) => Verdict::HighVariance,
            (false, false) => Verdict::Balanced,
        };

        Some(Diagnosis {
            verdict,
            final_train_error: train,
            final_validation_error: validation,
            gap,
            baseline_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::ErrorMetric;
    use ndarray::array;

    fn curve(train: f64, validation: f64) -> LearningCurve {
        LearningCurve::from_scores(
            "m".to_string(),
            ErrorMetric::MeanSquaredError,
            20,
            vec![2, 8],
            array![[0.0, 0.0], [train, train]],
            array![[9.0, 9.0], [validation, validation]],
        )
    }

    #[test]
    fn test_high_variance() {
        let d = curve(0.1, 2.0).diagnose(10.0, &DiagnosisThresholds::default()).unwrap();
        assert_eq!(d.verdict, Verdict::HighVariance);
        assert!((d.gap - 1.9).abs() < 1e-12);
    }

    #[test]
    fn test_high_bias() {
        let d = curve(8.0, 9.0).diagnose(10.0, &DiagnosisThresholds::default()).unwrap();
        assert_eq!(d.verdict, Verdict::HighBias);
    }

    #[test]
    fn test_both_and_balanced() {
        let thresholds = DiagnosisThresholds::default();
        assert_eq!(
            curve(6.0, 12.0).diagnose(10.0, &thresholds).unwrap().verdict,
            Verdict::HighBiasAndVariance
        );
        assert_eq!(curve(1.0, 1.2).diagnose(10.0, &thresholds).unwrap().verdict, Verdict::Balanced);
    }

    #[test]
    fn test_uses_largest_size_not_last_position() {
        let c = LearningCurve::from_scores(
            "m".to_string(),
            ErrorMetric::MeanSquaredError,
            20,
            vec![8, 2],
            array![[1.0], [0.0]],
            array![[1.1], [9.0]],
        );
        let d = c.diagnose(10.0, &DiagnosisThresholds::default()).unwrap();
        assert_eq!(d.final_train_error, 1.0);
        assert_eq!(d.verdict, Verdict::Balanced);
    }
}
