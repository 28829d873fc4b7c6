//! Shape-driven dispatch of dense products
//!
//! [`DenseMatMulDispatcher`] is the single entry point for dense `A·B`,
//! `A·x` and `A·Bᵀ`. Each call takes one of two paths:
//!
//! 1. **Fast path**: if the operands hold fewer than
//!    `small_problem_entries` entries in total, the shapes are validated and
//!    the sequential standard kernel runs directly. The cache is not touched.
//! 2. **Cached path**: the shape pair is looked up in the dispatcher's LRU
//!    cache. On a hit the cached kernel runs without re-validating the
//!    shapes; shapes are immutable, so a pair that validated once stays
//!    valid. On a miss the shapes are validated, the decision tree picks a
//!    kernel, and the choice is cached before it runs.
//!
//! The cache lock is released before any kernel runs, so concurrent callers
//! only contend on the lookup itself.
//!
//! # Examples
//!
//! ```
//! use ringmat_core::DenseMatrix;
//! use ringmat_dispatch::{DenseMatMulDispatcher, DispatchThresholds};
//! use ringmat_exec::ExecContext;
//!
//! let ctx = ExecContext::with_parallelism(2, 64).unwrap();
//! let dispatcher = DenseMatMulDispatcher::<f64>::new(ctx, DispatchThresholds::real());
//!
//! let a = DenseMatrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
//! let b = DenseMatrix::from_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
//!
//! let c = dispatcher.dispatch(&a, &b).unwrap();
//! assert_eq!(c.data(), &[19.0, 22.0, 43.0, 50.0]);
//! ```

use crate::algorithm::MatMulAlgorithm;
use crate::cache::{CacheStats, ShapeCache, ShapePairKey};
use crate::error::DispatchResult;
use crate::thresholds::DispatchThresholds;
use ringmat_core::shape::{ensure_matmul_shapes, ensure_matvec_shapes, ensure_mult_transpose_shapes};
use ringmat_core::{DenseMatrix, DenseVector, Semiring, Shape};
use ringmat_exec::ExecContext;
use std::fmt;
use std::marker::PhantomData;

/// Kernel selector and invoker for dense products over `T`.
pub struct DenseMatMulDispatcher<T> {
    ctx: ExecContext,
    thresholds: DispatchThresholds,
    matmul_cache: ShapeCache<MatMulAlgorithm>,
    vector_cache: ShapeCache<MatMulAlgorithm>,
    transpose_cache: ShapeCache<MatMulAlgorithm>,
    _element: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for DenseMatMulDispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseMatMulDispatcher")
            .field("element", &std::any::type_name::<T>())
            .field("parallelism", &self.ctx.parallelism())
            .field("block_size", &self.ctx.block_size())
            .field("cached", &self.matmul_cache.len())
            .finish()
    }
}

/// Build one shape cache; the capacity is floored at 1.
fn shape_cache(capacity: usize) -> ShapeCache<MatMulAlgorithm> {
    let capacity = capacity.max(1);
    match ShapeCache::new(capacity) {
        Some(cache) => cache,
        None => unreachable!("capacity floored at 1"),
    }
}

impl<T: Semiring> DenseMatMulDispatcher<T> {
    pub fn new(ctx: ExecContext, thresholds: DispatchThresholds) -> Self {
        let capacity = thresholds.cache_capacity;
        Self {
            ctx,
            thresholds,
            matmul_cache: shape_cache(capacity),
            vector_cache: shape_cache(capacity),
            transpose_cache: shape_cache(capacity),
            _element: PhantomData,
        }
    }

    pub fn context(&self) -> &ExecContext {
        &self.ctx
    }

    pub fn thresholds(&self) -> &DispatchThresholds {
        &self.thresholds
    }

    fn is_small(&self, a: &[T], b: &[T]) -> bool {
        a.len() + b.len() < self.thresholds.small_problem_entries
    }

    /// Cached algorithm for `key`, or `select` it (after `validate`) and
    /// cache the result.
    fn resolve(
        &self,
        cache: &ShapeCache<MatMulAlgorithm>,
        key: ShapePairKey,
        validate: impl FnOnce(&Shape, &Shape) -> DispatchResult<()>,
        select: impl FnOnce(&Shape, &Shape) -> MatMulAlgorithm,
    ) -> DispatchResult<MatMulAlgorithm> {
        if let Some(algorithm) = cache.get(&key) {
            return Ok(algorithm);
        }
        validate(&key.left, &key.right)?;
        let algorithm = select(&key.left, &key.right);
        log::debug!(
            "selected {} for {} x {} ({})",
            algorithm,
            key.left,
            key.right,
            std::any::type_name::<T>()
        );
        cache.put(key, algorithm);
        Ok(algorithm)
    }

    /// Compute `a · b`.
    ///
    /// # Errors
    ///
    /// - [`ShapeError::MatMulMismatch`](ringmat_core::ShapeError) if
    ///   `a.cols() != b.rows()` (checked on the fast path and on cache misses)
    /// - [`ExecError::TaskFailed`](ringmat_exec::ExecError) if a concurrent
    ///   kernel task fails
    pub fn dispatch(&self, a: &DenseMatrix<T>, b: &DenseMatrix<T>) -> DispatchResult<DenseMatrix<T>> {
        let algorithm = if self.is_small(a.data(), b.data()) {
            ensure_matmul_shapes(a.shape(), b.shape())?;
            MatMulAlgorithm::Standard
        } else {
            let key = ShapePairKey::new(a.shape().clone(), b.shape().clone());
            self.resolve(
                &self.matmul_cache,
                key,
                |s1, s2| Ok(ensure_matmul_shapes(s1, s2).map(|_| ())?),
                |s1, s2| self.select_algorithm(s1, s2),
            )?
        };

        let data = algorithm.kernel::<T>()(&self.ctx, a.data(), a.shape(), b.data(), b.shape())?;
        Ok(DenseMatrix::from_vec(a.rows(), b.cols(), data)?)
    }

    /// Compute `a · x`.
    ///
    /// # Errors
    ///
    /// [`ShapeError::MatVecMismatch`](ringmat_core::ShapeError) if
    /// `x.len() != a.cols()`, or a task failure.
    pub fn dispatch_vector(&self, a: &DenseMatrix<T>, x: &DenseVector<T>) -> DispatchResult<DenseVector<T>> {
        let algorithm = if self.is_small(a.data(), x.data()) {
            ensure_matvec_shapes(a.shape(), x.shape())?;
            MatMulAlgorithm::StandardVector
        } else {
            let key = ShapePairKey::new(a.shape().clone(), x.shape().clone());
            self.resolve(
                &self.vector_cache,
                key,
                |s1, s2| Ok(ensure_matvec_shapes(s1, s2).map(|_| ())?),
                |s1, _| self.select_vector_algorithm(s1),
            )?
        };

        let data = algorithm.kernel::<T>()(&self.ctx, a.data(), a.shape(), x.data(), x.shape())?;
        Ok(DenseVector::from_vec(data))
    }

    /// Compute `a · bᵀ` where `b` is stored untransposed.
    ///
    /// # Errors
    ///
    /// [`ShapeError::TransposeMismatch`](ringmat_core::ShapeError) if
    /// `a.cols() != b.cols()`, or a task failure.
    pub fn dispatch_transpose(
        &self,
        a: &DenseMatrix<T>,
        b: &DenseMatrix<T>,
    ) -> DispatchResult<DenseMatrix<T>> {
        let algorithm = if self.is_small(a.data(), b.data()) {
            ensure_mult_transpose_shapes(a.shape(), b.shape())?;
            MatMulAlgorithm::MultTranspose
        } else {
            let key = ShapePairKey::new(a.shape().clone(), b.shape().clone());
            self.resolve(
                &self.transpose_cache,
                key,
                |s1, s2| Ok(ensure_mult_transpose_shapes(s1, s2).map(|_| ())?),
                |s1, _| self.select_transpose_algorithm(s1),
            )?
        };

        let data = algorithm.kernel::<T>()(&self.ctx, a.data(), a.shape(), b.data(), b.shape())?;
        Ok(DenseMatrix::from_vec(a.rows(), b.rows(), data)?)
    }

    /// Decision tree for `A (m×n) · B (n×k)`.
    ///
    /// Shapes must already be validated.
    pub fn select_algorithm(&self, shape1: &Shape, shape2: &Shape) -> MatMulAlgorithm {
        let t = &self.thresholds;
        let (m, n, k) = (shape1.rows(), shape1.cols(), shape2.cols());

        // B is a single column: the product is a matrix-vector product.
        if k == 1 {
            return if m <= t.vector_sequential_rows_max {
                MatMulAlgorithm::StandardVector
            } else {
                MatMulAlgorithm::ConcurrentBlockedVector
            };
        }

        let lo = m.min(n).min(k);
        let hi = m.max(n).max(k);
        let aspect = hi as f64 / lo.max(1) as f64;

        if aspect <= t.near_square_ratio {
            return if hi < t.square_standard_max {
                MatMulAlgorithm::Standard
            } else if hi < t.square_reordered_max {
                MatMulAlgorithm::Reordered
            } else if hi < t.square_concurrent_max {
                MatMulAlgorithm::ConcurrentReordered
            } else {
                MatMulAlgorithm::ConcurrentBlockedReordered
            };
        }

        let work = m.saturating_mul(n).saturating_mul(k);
        let too_small = lo < t.min_parallel_dim || work < t.sequential_work_max;

        if hi == m {
            // Tall output: plenty of rows to split.
            if too_small {
                MatMulAlgorithm::Reordered
            } else {
                MatMulAlgorithm::ConcurrentReordered
            }
        } else if hi == n {
            // Long inner dimension: dot products dominate.
            if too_small {
                MatMulAlgorithm::Reordered
            } else if m <= t.inner_standard_rows_max {
                MatMulAlgorithm::ConcurrentStandard
            } else {
                MatMulAlgorithm::ConcurrentReordered
            }
        } else if too_small || m < t.min_parallel_dim {
            // Wide output: rows are the unit of parallel work.
            MatMulAlgorithm::Reordered
        } else {
            MatMulAlgorithm::ConcurrentReordered
        }
    }

    /// Decision tree for `A (m×n) · x`.
    pub fn select_vector_algorithm(&self, shape1: &Shape) -> MatMulAlgorithm {
        if shape1.rows() <= self.thresholds.vector_sequential_rows_max {
            MatMulAlgorithm::StandardVector
        } else {
            MatMulAlgorithm::ConcurrentBlockedVector
        }
    }

    /// Decision tree for `A (m×n) · Bᵀ`, by the row count of `A`.
    pub fn select_transpose_algorithm(&self, shape1: &Shape) -> MatMulAlgorithm {
        let t = &self.thresholds;
        let rows = shape1.rows();
        if rows < t.transpose_standard_max {
            MatMulAlgorithm::MultTranspose
        } else if rows < t.transpose_blocked_max {
            MatMulAlgorithm::MultTransposeBlocked
        } else if rows < t.transpose_concurrent_max {
            MatMulAlgorithm::MultTransposeConcurrent
        } else {
            MatMulAlgorithm::MultTransposeBlockedConcurrent
        }
    }

    /// Statistics of the `A·B` shape cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.matmul_cache.stats()
    }

    /// Statistics of the `A·x` shape cache.
    pub fn vector_cache_stats(&self) -> CacheStats {
        self.vector_cache.stats()
    }

    /// Statistics of the `A·Bᵀ` shape cache.
    pub fn transpose_cache_stats(&self) -> CacheStats {
        self.transpose_cache.stats()
    }

    /// Empty all three shape caches.
    pub fn clear_cache(&self) {
        self.matmul_cache.clear();
        self.vector_cache.clear();
        self.transpose_cache.clear();
    }

    /// The algorithm cached for `A·B` with these shapes, without refreshing
    /// its recency.
    pub fn cached_algorithm(&self, shape1: &Shape, shape2: &Shape) -> Option<MatMulAlgorithm> {
        self.matmul_cache
            .peek(&ShapePairKey::new(shape1.clone(), shape2.clone()))
    }
}
