//! K-fold cross-validation splitting

use crate::error::{CurveError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A single train/test split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CVSplit {
    /// Training pool, in index order of the (possibly shuffled) permutation
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    pub fold_idx: usize,
}

/// K-fold splitter.
///
/// Folds are contiguous runs of the index permutation. When `n_splits` does not
/// divide the sample count, the first `n % n_splits` folds hold one extra record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KFold {
    pub n_splits: usize,
    pub shuffle: bool,
    pub random_state: Option<u64>,
}

impl Default for KFold {
    fn default() -> Self {
        Self::new(5)
    }
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: false,
            random_state: None,
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Set random state for reproducible shuffling
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Sizes of each fold for `n_samples` records
    pub fn fold_sizes(&self, n_samples: usize) -> Vec<usize> {
        let base = n_samples / self.n_splits.max(1);
        let remainder = n_samples % self.n_splits.max(1);
        (0..self.n_splits)
            .map(|i| if i < remainder { base + 1 } else { base })
            .collect()
    }

    /// Generate train/test splits
    pub fn split(&self, n_samples: usize) -> Result<Vec<CVSplit>> {
        if self.n_splits < 2 {
            return Err(CurveError::InvalidConfiguration(format!(
                "number of folds must be at least 2, got {}",
                self.n_splits
            )));
        }
        if n_samples < self.n_splits {
            return Err(CurveError::InvalidConfiguration(format!(
                "n_samples ({}) must be >= number of folds ({})",
                n_samples, self.n_splits
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();

        if self.shuffle {
            let mut rng = match self.random_state {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            };
            indices.shuffle(&mut rng);
        }

        let mut splits = Vec::with_capacity(self.n_splits);
        let mut current = 0;

        for (fold_idx, fold_size) in self.fold_sizes(n_samples).into_iter().enumerate() {
            let test_indices: Vec<usize> = indices[current..current + fold_size].to_vec();
            let train_indices: Vec<usize> = indices[..current]
                .iter()
                .chain(indices[current + fold_size..].iter())
                .copied()
                .collect();

            splits.push(CVSplit {
                train_indices,
                test_indices,
                fold_idx,
            });

            current += fold_size;
        }

        Ok(splits)
    }
}
