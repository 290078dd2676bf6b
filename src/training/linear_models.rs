//! Linear model implementations

use crate::error::{CurveError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Lower-triangular Cholesky factor of a symmetric matrix, `None` if not positive definite
fn cholesky(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }

            if i == j {
                let diag = a[[i, i]] - sum;
                // Relative floor catches pivots that are zero up to rounding
                if diag <= 1e-12 * a[[i, i]].abs() || !diag.is_finite() {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    Some(l)
}

/// Solve `L L^T x = b` by forward then backward substitution
fn cholesky_substitute(l: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = l.nrows();

    let mut y = Array1::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    x
}

/// Solve the normal equations `(X^T X) w = X^T y`.
///
/// Rank-deficient systems (fewer records than features, a single record, duplicated
/// columns) get a vanishing ridge term, which converges to the minimum-norm solution.
fn solve_normal_equations(xtx: &Array2<f64>, xty: &Array1<f64>) -> Result<Array1<f64>> {
    let n = xtx.nrows();
    if n != xtx.ncols() || n != xty.len() {
        return Err(CurveError::ShapeError {
            expected: format!("{}x{} system", n, n),
            actual: format!("{}x{} matrix, rhs length {}", xtx.nrows(), xtx.ncols(), xty.len()),
        });
    }

    if let Some(l) = cholesky(xtx) {
        return Ok(cholesky_substitute(&l, xty));
    }

    let scale = (xtx.diag().iter().map(|v| v.abs()).sum::<f64>() / n.max(1) as f64).max(1.0);
    let mut jitter = 1e-10 * scale;

    for _ in 0..6 {
        let mut a_reg = xtx.clone();
        for k in 0..n {
            a_reg[[k, k]] += jitter;
        }
        if let Some(l) = cholesky(&a_reg) {
            return Ok(cholesky_substitute(&l, xty));
        }
        jitter *= 100.0;
    }

    Err(CurveError::ComputationError(
        "normal equations are not solvable even with regularization".to_string(),
    ))
}

/// Ordinary least squares with optional L2 penalty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Fitted coefficients (weights)
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept (bias)
    pub intercept: Option<f64>,
    /// Whether to fit intercept
    pub fit_intercept: bool,
    /// Regularization strength (L2); zero means plain OLS
    pub alpha: f64,
    /// Whether model is fitted
    pub is_fitted: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
            alpha: 0.0,
            is_fitted: false,
        }
    }

    /// Enable/disable fitting intercept
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Set regularization strength (ridge regression)
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Fit the model to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(CurveError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(CurveError::InvalidInput("cannot fit on zero samples".to_string()));
        }
        if self.alpha < 0.0 {
            return Err(CurveError::InvalidInput(format!("alpha must be >= 0, got {}", self.alpha)));
        }

        let (x_centered, y_centered, means) = if self.fit_intercept {
            let x_mean = x
                .mean_axis(Axis(0))
                .ok_or_else(|| CurveError::ComputationError("empty feature matrix".to_string()))?;
            let y_mean = y.mean().unwrap_or(0.0);

            let x_centered = x - &x_mean.view().insert_axis(Axis(0));
            let y_centered = y - y_mean;

            (x_centered, y_centered, Some((x_mean, y_mean)))
        } else {
            (x.clone(), y.clone(), None)
        };

        let mut xtx = x_centered.t().dot(&x_centered);
        for i in 0..n_features {
            xtx[[i, i]] += self.alpha;
        }
        let xty = x_centered.t().dot(&y_centered);

        let coefficients = solve_normal_equations(&xtx, &xty)?;

        let intercept = match means {
            Some((x_mean, y_mean)) => y_mean - coefficients.dot(&x_mean),
            None => 0.0,
        };

        self.coefficients = Some(coefficients);
        self.intercept = Some(intercept);
        self.is_fitted = true;

        Ok(self)
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = match (&self.coefficients, self.is_fitted) {
            (Some(c), true) => c,
            _ => return Err(CurveError::ModelNotFitted),
        };

        if x.ncols() != coefficients.len() {
            return Err(CurveError::ShapeError {
                expected: format!("{} features", coefficients.len()),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok(x.dot(coefficients) + self.intercept.unwrap_or(0.0))
    }
}

/// Polynomial regression: expands features then fits a linear model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolynomialRegression {
    pub degree: usize,
    pub alpha: f64,
    inner: LinearRegression,
    n_original_features: usize,
}

impl PolynomialRegression {
    pub fn new(degree: usize, alpha: f64) -> Self {
        Self {
            degree: degree.max(1),
            alpha,
            inner: LinearRegression::new().with_alpha(alpha),
            n_original_features: 0,
        }
    }

    /// Original columns, then squares and pairwise products, then higher powers per column
    pub(crate) fn expand_features(x: &Array2<f64>, degree: usize) -> Array2<f64> {
        let n = x.nrows();
        let p = x.ncols();

        if degree <= 1 {
            return x.clone();
        }

        let mut cols: Vec<Array1<f64>> = (0..p).map(|j| x.column(j).to_owned()).collect();

        for i in 0..p {
            for j in i..p {
                cols.push(&x.column(i) * &x.column(j));
            }
        }

        for d in 3..=degree {
            for j in 0..p {
                cols.push(x.column(j).mapv(|v| v.powi(d as i32)));
            }
        }

        let mut result = Array2::zeros((n, cols.len()));
        for (j, col) in cols.into_iter().enumerate() {
            result.column_mut(j).assign(&col);
        }
        result
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        self.n_original_features = x.ncols();
        let x_poly = Self::expand_features(x, self.degree);
        self.inner.fit(&x_poly, y)?;
        Ok(self)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.inner.is_fitted {
            return Err(CurveError::ModelNotFitted);
        }
        if x.ncols() != self.n_original_features {
            return Err(CurveError::ShapeError {
                expected: format!("{} features", self.n_original_features),
                actual: format!("{} features", x.ncols()),
            });
        }
        let x_poly = Self::expand_features(x, self.degree);
        self.inner.predict(&x_poly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_linear_regression_simple() {
        let x = array![
            [1.0, 1.0],
            [2.0, 1.0],
            [1.0, 2.0],
            [2.0, 2.0],
            [3.0, 1.0],
        ];
        // y = 2*x1 + 3*x2 + 1
        let y = array![6.0, 8.0, 9.0, 11.0, 10.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        assert!(model.is_fitted);
        let coef = model.coefficients.as_ref().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-8);
        assert!((coef[1] - 3.0).abs() < 1e-8);
        assert!((model.intercept.unwrap() - 1.0).abs() < 1e-8);

        let predictions = model.predict(&x).unwrap();
        for (p, t) in predictions.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-8);
        }
    }

    #[test]
    fn test_single_sample_interpolated_exactly() {
        let x = array![[3.5]];
        let y = array![7.25];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let pred = model.predict(&x).unwrap();
        assert_eq!(pred[0], 7.25);
    }

    #[test]
    fn test_more_features_than_samples() {
        let x = array![[1.0, 2.0, 3.0], [2.0, 1.0, 0.0]];
        let y = array![1.0, 2.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let pred = model.predict(&x).unwrap();
        assert!((pred[0] - 1.0).abs() < 1e-6);
        assert!((pred[1] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_ridge_shrinks_coefficients() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let mut ols = LinearRegression::new();
        ols.fit(&x, &y).unwrap();
        let mut ridge = LinearRegression::new().with_alpha(10.0);
        ridge.fit(&x, &y).unwrap();

        let ols_coef = ols.coefficients.as_ref().unwrap()[0];
        let ridge_coef = ridge.coefficients.as_ref().unwrap()[0];
        assert!(ridge_coef < ols_coef);
        assert!(ridge_coef > 0.0);
    }

    #[test]
    fn test_predict_before_fit() {
        let model = LinearRegression::new();
        let result = model.predict(&array![[1.0]]);
        assert!(matches!(result, Err(CurveError::ModelNotFitted)));
    }

    #[test]
    fn test_negative_alpha_rejected() {
        let mut model = LinearRegression::new().with_alpha(-1.0);
        let result = model.fit(&array![[1.0], [2.0]], &array![1.0, 2.0]);
        assert!(matches!(result, Err(CurveError::InvalidInput(_))));
    }

    #[test]
    fn test_polynomial_regression_quadratic() {
        // y = x^2
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![1.0, 4.0, 9.0, 16.0, 25.0];
        let mut model = PolynomialRegression::new(2, 0.0);
        model.fit(&x, &y).unwrap();

        let preds = model.predict(&x).unwrap();
        for (p, t) in preds.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-6, "pred {} vs {}", p, t);
        }
    }

    #[test]
    fn test_polynomial_feature_expansion() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let expanded = PolynomialRegression::expand_features(&x, 2);
        // x1, x2, x1^2, x1*x2, x2^2
        assert_eq!(expanded.ncols(), 5);
        assert_eq!(expanded[[1, 3]], 12.0);

        let cubic = PolynomialRegression::expand_features(&x, 3);
        assert_eq!(cubic.ncols(), 7);
        assert_eq!(cubic[[0, 6]], 8.0);
    }
}
