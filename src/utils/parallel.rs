//! Parallel processing utilities

use crate::error::{CurveError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for parallel processing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Number of worker threads (None = rayon's global pool)
    pub n_jobs: Option<usize>,
}

impl ParallelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single worker thread, also used by any rayon work the mapped closure starts
    pub fn sequential() -> Self {
        Self { n_jobs: Some(1) }
    }

    /// Set number of threads
    pub fn with_jobs(mut self, n: usize) -> Self {
        self.n_jobs = Some(n);
        self
    }

    /// Get the number of threads to use
    pub fn num_threads(&self) -> usize {
        self.n_jobs.unwrap_or_else(rayon::current_num_threads)
    }
}

/// Map `f` over `items`, keeping input order in the output.
///
/// With `n_jobs = Some(n)` the map runs inside a dedicated pool of `n` threads, so
/// nested `par_iter` calls (tree split search, forest fitting) are bounded too.
pub fn parallel_map<T, U, F>(items: Vec<T>, config: &ParallelConfig, f: F) -> Result<Vec<U>>
where
    T: Send + Sync,
    U: Send,
    F: Fn(T) -> U + Send + Sync,
{
    match config.n_jobs {
        None => Ok(items.into_par_iter().map(f).collect()),
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| CurveError::ThreadPoolError(e.to_string()))?;

            Ok(pool.install(|| items.into_par_iter().map(f).collect()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_map_keeps_order() {
        let items: Vec<i32> = (0..1000).collect();
        let results = parallel_map(items, &ParallelConfig::new(), |x| x * 2).unwrap();

        assert_eq!(results.len(), 1000);
        assert_eq!(results[0], 0);
        assert_eq!(results[500], 1000);
    }

    #[test]
    fn test_sequential_and_pooled_agree() {
        let items: Vec<u64> = (0..64).collect();
        let seq = parallel_map(items.clone(), &ParallelConfig::sequential(), |x| x * x).unwrap();
        let pooled = parallel_map(items, &ParallelConfig::new().with_jobs(3), |x| x * x).unwrap();
        assert_eq!(seq, pooled);
    }

    #[test]
    fn test_sequential_bounds_nested_work() {
        let items: Vec<usize> = (0..8).collect();
        let seen = parallel_map(items, &ParallelConfig::sequential(), |_| {
            let inner: Vec<usize> = (0..16).into_par_iter().map(|_| rayon::current_num_threads()).collect();
            (rayon::current_num_threads(), inner)
        })
        .unwrap();

        for (outer, inner) in seen {
            assert_eq!(outer, 1);
            assert!(inner.iter().all(|&n| n == 1));
        }
    }

    #[test]
    fn test_parallel_config() {
        let config = ParallelConfig::new().with_jobs(4);
        assert_eq!(config.num_threads(), 4);
        assert_eq!(ParallelConfig::sequential().num_threads(), 1);
    }
}
