//! Random forest regressor

use super::decision_tree::DecisionTree;
use crate::error::{CurveError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Strategy for max features
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// Square root of n_features
    Sqrt,
    /// Log2 of n_features
    Log2,
    /// Fraction of n_features
    Fraction(f64),
    /// Fixed number
    Fixed(usize),
    /// All features
    All,
}

/// Bagged ensemble of regression trees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum depth per tree
    pub max_depth: Option<usize>,
    /// Features drawn per tree
    pub max_features: MaxFeatures,
    /// Random state
    pub random_state: Option<u64>,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RandomForest {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            max_features: MaxFeatures::All,
            random_state: None,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set max features strategy
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set random state
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    fn compute_max_features(&self, n_features: usize) -> usize {
        match self.max_features {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().ceil() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2().ceil() as usize,
            MaxFeatures::Fraction(f) => (n_features as f64 * f).ceil() as usize,
            MaxFeatures::Fixed(n) => n,
            MaxFeatures::All => n_features,
        }
        .clamp(1, n_features.max(1))
    }

    /// Fit the forest on bootstrap resamples. Any tree failure aborts the whole fit.
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
        if self.n_estimators == 0 {
            return Err(CurveError::InvalidInput("n_estimators must be at least 1".to_string()));
        }

        let max_features = self.compute_max_features(n_features);
        let base_seed = self.random_state.unwrap_or(42);

        let trees: Vec<DecisionTree> = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| -> Result<DecisionTree> {
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(tree_idx as u64));

                let sample_indices: Vec<usize> =
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();

                let x_boot = x.select(Axis(0), &sample_indices);
                let y_boot = y.select(Axis(0), &sample_indices);

                let mut tree = DecisionTree::new();
                if let Some(d) = self.max_depth {
                    tree = tree.with_max_depth(d);
                }
                if max_features < n_features {
                    let mut cols = sample(&mut rng, n_features, max_features).into_vec();
                    cols.sort_unstable();
                    tree = tree.with_feature_indices(cols);
                }

                tree.fit(&x_boot, &y_boot)?;
                Ok(tree)
            })
            .collect::<Result<Vec<DecisionTree>>>()?;

        self.trees = trees;

        Ok(self)
    }

    /// Mean prediction across trees
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(CurveError::ModelNotFitted);
        }

        let all_predictions: Vec<Array1<f64>> = self
            .trees
            .par_iter()
            .map(|tree| tree.predict(x))
            .collect::<Result<Vec<_>>>()?;

        // Running mean: trees that agree leave the value untouched
        let mut mean = Array1::<f64>::zeros(x.nrows());
        for (i, preds) in all_predictions.iter().enumerate() {
            let weight = (i + 1) as f64;
            mean.zip_mut_with(preds, |m, &p| *m += (p - *m) / weight);
        }

        Ok(mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_regressor() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0];

        let mut rf = RandomForest::new(10).with_random_state(42);
        rf.fit(&x, &y).unwrap();

        let predictions = rf.predict(&x).unwrap();
        let mse: f64 = predictions
            .iter()
            .zip(y.iter())
            .map(|(p, a)| (p - a).powi(2))
            .sum::<f64>()
            / y.len() as f64;

        assert!(mse < 2.0, "MSE too high: {}", mse);
        assert_eq!(rf.trees.len(), 10);
    }

    #[test]
    fn test_single_sample() {
        let x = array![[1.0, 2.0]];
        let y = array![3.0];

        let mut rf = RandomForest::new(5).with_random_state(1);
        rf.fit(&x, &y).unwrap();
        assert_eq!(rf.predict(&x).unwrap()[0], 3.0);
    }

    #[test]
    fn test_seeded_forest_is_deterministic() {
        let x = array![[1.0, 0.5], [2.0, 0.1], [3.0, 0.9], [4.0, 0.3], [5.0, 0.7], [6.0, 0.2]];
        let y = array![1.2, 1.9, 3.3, 3.8, 5.1, 6.2];

        let mut a = RandomForest::new(8)
            .with_random_state(3)
            .with_max_features(MaxFeatures::Sqrt);
        let mut b = a.clone();
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();

        assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
    }

    #[test]
    fn test_identical_leaves_average_exactly() {
        // Summing 100 copies of 0.1 and dividing does not give 0.1 back
        let x = array![[1.0, 4.0]];
        let y = array![0.1];

        let mut rf = RandomForest::new(100).with_random_state(5);
        rf.fit(&x, &y).unwrap();

        assert_eq!(rf.predict(&x).unwrap()[0], 0.1);
        assert_eq!(rf.predict(&array![[9.0, -2.0]]).unwrap()[0], 0.1);
    }

    #[test]
    fn test_predict_before_fit() {
        let rf = RandomForest::new(3);
        assert!(matches!(rf.predict(&array![[1.0]]), Err(CurveError::ModelNotFitted)));
    }
}
