//! Numeric knobs of the kernel selection decision tree
//!
//! Every constant the dispatcher compares against lives here, so a
//! deployment can re-benchmark and override them without touching the
//! selection logic. The presets are starting calibrations per element
//! family. They only affect speed: any threshold values select a kernel
//! that computes the same product.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Thresholds read once when a dispatcher is built.
///
/// # Examples
///
/// ```
/// use ringmat_dispatch::DispatchThresholds;
///
/// let t = DispatchThresholds::real().with_cache_capacity(8);
/// assert_eq!(t.cache_capacity, 8);
/// assert!(t.near_square_ratio >= 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DispatchThresholds {
    /// Operand entry total under which the cache is bypassed and the
    /// standard kernel runs directly.
    pub small_problem_entries: usize,
    /// Largest `max(m, n, k) / min(m, n, k)` still treated as square.
    pub near_square_ratio: f64,
    /// Square problems with largest dimension below this use `Standard`.
    pub square_standard_max: usize,
    /// ... below this use `Reordered`.
    pub square_reordered_max: usize,
    /// ... below this use `ConcurrentReordered`, otherwise
    /// `ConcurrentBlockedReordered`.
    pub square_concurrent_max: usize,
    /// Smallest dimension worth splitting across the pool.
    pub min_parallel_dim: usize,
    /// Products with fewer than this many multiply-adds (`m·n·k`) stay
    /// sequential.
    pub sequential_work_max: usize,
    /// When the inner dimension dominates, output row counts up to this use
    /// `ConcurrentStandard`.
    pub inner_standard_rows_max: usize,
    /// Matrix-vector products with at most this many rows stay sequential.
    pub vector_sequential_rows_max: usize,
    /// `A·Bᵀ` with fewer rows than this uses `MultTranspose`.
    pub transpose_standard_max: usize,
    /// ... fewer than this uses `MultTransposeBlocked`.
    pub transpose_blocked_max: usize,
    /// ... fewer than this uses `MultTransposeConcurrent`, otherwise
    /// `MultTransposeBlockedConcurrent`.
    pub transpose_concurrent_max: usize,
    /// Entries in each shape cache.
    pub cache_capacity: usize,
}

impl DispatchThresholds {
    /// Preset for `f32` and `f64`.
    pub fn real() -> Self {
        Self {
            small_problem_entries: 1000,
            near_square_ratio: 4.0 / 3.0,
            square_standard_max: 8,
            square_reordered_max: 40,
            square_concurrent_max: 3072,
            min_parallel_dim: 5,
            sequential_work_max: 64 * 64 * 16,
            inner_standard_rows_max: 50,
            vector_sequential_rows_max: 600,
            transpose_standard_max: 40,
            transpose_blocked_max: 55,
            transpose_concurrent_max: 1200,
            cache_capacity: 64,
        }
    }

    /// Preset for complex elements: each multiply-add costs roughly four
    /// real ones, so parallelism pays off at smaller sizes.
    pub fn complex() -> Self {
        Self {
            square_reordered_max: 30,
            square_concurrent_max: 250,
            sequential_work_max: 32 * 32 * 16,
            vector_sequential_rows_max: 300,
            transpose_standard_max: 25,
            transpose_blocked_max: 25,
            transpose_concurrent_max: 750,
            ..Self::real()
        }
    }

    /// Preset for exact fields such as `Zmod`.
    pub fn field() -> Self {
        Self {
            square_reordered_max: 30,
            square_concurrent_max: 500,
            ..Self::real()
        }
    }

    /// Preset for any other semiring.
    pub fn semiring() -> Self {
        Self::real()
    }

    pub fn with_small_problem_entries(mut self, entries: usize) -> Self {
        self.small_problem_entries = entries;
        self
    }

    /// Set the shape cache capacity (floored at 1).
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity.max(1);
        self
    }
}

impl Default for DispatchThresholds {
    fn default() -> Self {
        Self::real()
    }
}
