//! Regression tree (variance-reduction splits)

use crate::error::{CurveError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node with prediction value
    Leaf {
        value: f64,
        n_samples: usize,
    },
    /// Internal node with split
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
    },
}

/// Regression tree model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Option<TreeNode>,
    /// Maximum depth
    pub max_depth: Option<usize>,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Columns considered for splits (None = all)
    pub feature_indices: Option<Vec<usize>>,
    n_features: usize,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_leaf: 1,
            feature_indices: None,
            n_features: 0,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// Restrict split search to the given columns
    pub fn with_feature_indices(mut self, indices: Vec<usize>) -> Self {
        self.feature_indices = Some(indices);
        self
    }

    /// Fit the tree to training data. A single sample produces a one-leaf tree.
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
        if let Some(cols) = &self.feature_indices {
            if let Some(&bad) = cols.iter().find(|&&c| c >= n_features) {
                return Err(CurveError::InvalidInput(format!(
                    "feature index {} out of range for {} features",
                    bad, n_features
                )));
            }
        }

        self.n_features = n_features;

        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(self.build_tree(x, y, &indices, 0));

        Ok(self)
    }

    fn build_tree(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        depth: usize,
    ) -> TreeNode {
        let n_samples = indices.len();
        let y_subset: Vec<f64> = indices.iter().map(|&i| y[i]).collect();
        let leaf = || TreeNode::Leaf {
            value: mean(&y_subset),
            n_samples,
        };

        let should_stop = n_samples < 2 * self.min_samples_leaf
            || self.max_depth.map_or(false, |d| depth >= d)
            || is_constant(&y_subset);

        if should_stop {
            return leaf();
        }

        let Some((feature, threshold)) = self.find_best_split(x, &y_subset, indices) else {
            return leaf();
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, feature]] <= threshold);

        if left_indices.len() < self.min_samples_leaf || right_indices.len() < self.min_samples_leaf {
            return leaf();
        }

        let left = Box::new(self.build_tree(x, y, &left_indices, depth + 1));
        let right = Box::new(self.build_tree(x, y, &right_indices, depth + 1));

        TreeNode::Split {
            feature_idx: feature,
            threshold,
            left,
            right,
            n_samples,
        }
    }

    /// Best (feature, threshold) by variance reduction over the candidate columns
    fn find_best_split(&self, x: &Array2<f64>, y_subset: &[f64], indices: &[usize]) -> Option<(usize, f64)> {
        let candidates: Vec<usize> = match &self.feature_indices {
            Some(cols) => cols.clone(),
            None => (0..x.ncols()).collect(),
        };

        let n = indices.len() as f64;
        let parent_impurity = variance(y_subset);
        let total_sum: f64 = y_subset.iter().sum();
        let total_sq: f64 = y_subset.iter().map(|v| v * v).sum();

        let feature_results: Vec<Option<(usize, f64, f64)>> = candidates
            .par_iter()
            .map(|&feature_idx| {
                // (feature value, target) sorted by feature value
                let mut pairs: Vec<(f64, f64)> = indices
                    .iter()
                    .zip(y_subset.iter())
                    .map(|(&i, &yi)| (x[[i, feature_idx]], yi))
                    .collect();
                pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

                let mut left_sum = 0.0;
                let mut left_sq = 0.0;
                let mut best: Option<(f64, f64)> = None;

                for k in 0..pairs.len() - 1 {
                    left_sum += pairs[k].1;
                    left_sq += pairs[k].1 * pairs[k].1;

                    if pairs[k].0 == pairs[k + 1].0 {
                        continue;
                    }

                    let left_count = k + 1;
                    let right_count = pairs.len() - left_count;
                    if left_count < self.min_samples_leaf || right_count < self.min_samples_leaf {
                        continue;
                    }

                    let left_imp = variance_from_sums(left_count, left_sum, left_sq);
                    let right_imp =
                        variance_from_sums(right_count, total_sum - left_sum, total_sq - left_sq);
                    let weighted = (left_count as f64 * left_imp + right_count as f64 * right_imp) / n;
                    let gain = parent_impurity - weighted;

                    if gain > 1e-12 && best.map_or(true, |(g, _)| gain > g) {
                        best = Some((gain, (pairs[k].0 + pairs[k + 1].0) / 2.0));
                    }
                }

                best.map(|(gain, threshold)| (feature_idx, threshold, gain))
            })
            .collect();

        feature_results
            .into_iter()
            .flatten()
            .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(feature, threshold, _)| (feature, threshold))
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(CurveError::ModelNotFitted)?;

        if x.ncols() != self.n_features {
            return Err(CurveError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok(x.rows().into_iter().map(|row| predict_sample(root, row)).collect())
    }
}

fn predict_sample(node: &TreeNode, sample: ArrayView1<f64>) -> f64 {
    match node {
        TreeNode::Leaf { value, .. } => *value,
        TreeNode::Split { feature_idx, threshold, left, right, .. } => {
            if sample[*feature_idx] <= *threshold {
                predict_sample(left, sample)
            } else {
                predict_sample(right, sample)
            }
        }
    }
}

fn mean(y: &[f64]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    y.iter().sum::<f64>() / y.len() as f64
}

fn variance(y: &[f64]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    let m = mean(y);
    y.iter().map(|&v| (v - m).powi(2)).sum::<f64>() / y.len() as f64
}

// Var = E[X²] - E[X]², clamped against cancellation
fn variance_from_sums(count: usize, sum: f64, sq_sum: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let n = count as f64;
    (sq_sum / n - (sum / n).powi(2)).max(0.0)
}

fn is_constant(y: &[f64]) -> bool {
    match y.first() {
        None => true,
        Some(&first) => y.iter().all(|&v| (v - first).abs() < 1e-12),
    }
}
