//! Integration tests for ringmat-dispatch
//!
//! Dispatched products must match a plain reference product whatever kernel
//! the decision tree picks, and the shape cache must never change an answer.

use proptest::prelude::*;
use ringmat_core::num_complex::Complex;
use ringmat_core::{ApproxEq, DenseMatrix, DenseVector, Semiring, Shape, ShapeError, Zmod};
use ringmat_dispatch::{DenseMatMulDispatcher, DispatchError, DispatchThresholds, MatMulAlgorithm};
use ringmat_exec::ExecContext;

fn ctx(parallelism: usize) -> ExecContext {
    ExecContext::with_parallelism(parallelism, 4).unwrap()
}

/// Always take the cached path.
fn uncapped(thresholds: DispatchThresholds) -> DispatchThresholds {
    thresholds.with_small_problem_entries(0)
}

fn reference<T: Semiring>(a: &DenseMatrix<T>, b: &DenseMatrix<T>) -> Vec<T> {
    let (m, n, k) = (a.rows(), a.cols(), b.cols());
    let mut out = vec![T::zero(); m * k];
    for i in 0..m {
        for j in 0..k {
            let mut sum = T::zero();
            for l in 0..n {
                sum = sum + a.data()[i * n + l].clone() * b.data()[l * k + j].clone();
            }
            out[i * k + j] = sum;
        }
    }
    out
}

fn matrix_f64(rows: usize, cols: usize, seed: u64) -> DenseMatrix<f64> {
    let mut state = seed;
    let data = (0..rows * cols)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) % 17) as f64 - 8.0
        })
        .collect();
    DenseMatrix::from_vec(rows, cols, data).unwrap()
}

// ============================================================================
// Fixed examples
// ============================================================================

#[test]
fn test_two_by_two_every_family() {
    let a = DenseMatrix::from_vec(2, 2, vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
    let b = DenseMatrix::from_vec(2, 2, vec![5.0f32, 6.0, 7.0, 8.0]).unwrap();
    let d = DenseMatMulDispatcher::new(ctx(2), DispatchThresholds::real());
    assert_eq!(d.dispatch(&a, &b).unwrap().data(), &[19.0, 22.0, 43.0, 50.0]);

    let z = |v: u64| Zmod::<11>::from(v);
    let a = DenseMatrix::from_vec(2, 2, vec![z(1), z(2), z(3), z(4)]).unwrap();
    let b = DenseMatrix::from_vec(2, 2, vec![z(5), z(6), z(7), z(8)]).unwrap();
    let d = DenseMatMulDispatcher::new(ctx(2), uncapped(DispatchThresholds::field()));
    // 19, 22, 43, 50 mod 11
    assert_eq!(d.dispatch(&a, &b).unwrap().data(), &[z(8), z(0), z(10), z(6)]);
}

#[test]
fn test_complex_product() {
    let c = |re: f64, im: f64| Complex::new(re, im);
    let a = DenseMatrix::from_vec(1, 2, vec![c(1.0, 1.0), c(0.0, 2.0)]).unwrap();
    let b = DenseMatrix::from_vec(2, 1, vec![c(2.0, 0.0), c(1.0, -1.0)]).unwrap();
    let d = DenseMatMulDispatcher::new(ctx(2), uncapped(DispatchThresholds::complex()));

    // (1+i)·2 + 2i·(1-i) = 2+2i + 2+2i
    let out = d.dispatch(&a, &b).unwrap();
    assert!(out.data()[0].approx_eq(&c(4.0, 4.0), 1e-12));
    // k == 1 routes to a vector kernel
    assert!(d.cached_algorithm(a.shape(), b.shape()).unwrap().is_vector());
}

#[test]
fn test_shape_mismatch() {
    let d = DenseMatMulDispatcher::<f64>::new(ctx(2), DispatchThresholds::real());
    let a = matrix_f64(3, 4, 1);
    let b = matrix_f64(3, 4, 2);

    let err = d.dispatch(&a, &b).unwrap_err();
    assert_eq!(
        err,
        DispatchError::Shape(ShapeError::MatMulMismatch { m1: 3, n1: 4, m2: 3, n2: 4 })
    );
    // same column count: multiply-transpose is fine
    assert_eq!(d.dispatch_transpose(&a, &b).unwrap().data().len(), 9);
}

#[test]
fn test_empty_inner_dimension() {
    let d = DenseMatMulDispatcher::<f64>::new(ctx(2), uncapped(DispatchThresholds::real()));
    let a = DenseMatrix::from_vec(3, 0, vec![]).unwrap();
    let b = DenseMatrix::from_vec(0, 2, vec![]).unwrap();
    let out = d.dispatch(&a, &b).unwrap();
    assert_eq!(out.shape(), &Shape::matrix(3, 2));
    assert!(out.data().iter().all(|v| *v == 0.0));
}

// ============================================================================
// Cache behaviour
// ============================================================================

#[test]
fn test_cache_hit_matches_fresh_selection() {
    let d = DenseMatMulDispatcher::<f64>::new(ctx(3), uncapped(DispatchThresholds::real()));
    let shapes = [(20, 20, 20), (60, 5, 60), (3, 70, 90), (200, 10, 10), (10, 300, 12)];

    for &(m, n, k) in &shapes {
        let a = matrix_f64(m, n, 3);
        let b = matrix_f64(n, k, 4);
        let first = d.dispatch(&a, &b).unwrap();
        let second = d.dispatch(&a, &b).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.data(), reference(&a, &b).as_slice());
        assert_eq!(
            d.cached_algorithm(a.shape(), b.shape()),
            Some(d.select_algorithm(a.shape(), b.shape()))
        );
    }

    let stats = d.cache_stats();
    assert_eq!(stats.misses, shapes.len());
    assert_eq!(stats.hits, shapes.len());
    assert_eq!(stats.entries, shapes.len());
}

#[test]
fn test_fast_path_never_caches() {
    let d = DenseMatMulDispatcher::<f64>::new(ctx(2), DispatchThresholds::real());
    for _ in 0..3 {
        d.dispatch(&matrix_f64(10, 10, 1), &matrix_f64(10, 10, 2)).unwrap();
    }
    let stats = d.cache_stats();
    assert_eq!(stats.hits + stats.misses + stats.entries, 0);
}

#[test]
fn test_capacity_two_eviction() {
    let thresholds = uncapped(DispatchThresholds::real()).with_cache_capacity(2);
    let d = DenseMatMulDispatcher::<f64>::new(ctx(2), thresholds);
    let pair = |n: usize| (matrix_f64(n, n, 5), matrix_f64(n, n, 6));

    let (a1, b1) = pair(2);
    let (a2, b2) = pair(3);
    let (a3, b3) = pair(4);
    d.dispatch(&a1, &b1).unwrap();
    d.dispatch(&a2, &b2).unwrap();
    d.dispatch(&a3, &b3).unwrap();

    assert!(d.cached_algorithm(a1.shape(), b1.shape()).is_none());
    assert!(d.cached_algorithm(a2.shape(), b2.shape()).is_some());
    assert!(d.cached_algorithm(a3.shape(), b3.shape()).is_some());
    assert_eq!(d.cache_stats().evictions, 1);

    // the evicted pair is simply re-selected
    assert_eq!(d.dispatch(&a1, &b1).unwrap().data(), reference(&a1, &b1).as_slice());
}

#[test]
fn test_shared_dispatcher_across_threads() {
    let d = std::sync::Arc::new(DenseMatMulDispatcher::<i64>::new(
        ctx(2),
        uncapped(DispatchThresholds::semiring()).with_cache_capacity(3),
    ));
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let d = std::sync::Arc::clone(&d);
            std::thread::spawn(move || {
                for n in 1..8usize {
                    let a = DenseMatrix::from_vec(n, n, vec![t as i64; n * n]).unwrap();
                    let c = d.dispatch(&a, &a).unwrap();
                    let expected = (t as i64) * (t as i64) * n as i64;
                    assert!(c.data().iter().all(|v| *v == expected));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert!(d.cache_stats().entries <= 3);
}

// ============================================================================
// Kernel equivalence
// ============================================================================

#[test]
fn test_forced_kernels_agree_with_dispatch() {
    let d = DenseMatMulDispatcher::<f64>::new(ctx(4), uncapped(DispatchThresholds::real()));
    let a = matrix_f64(33, 17, 7);
    let b = matrix_f64(17, 29, 8);
    let expected = d.dispatch(&a, &b).unwrap();

    for alg in MatMulAlgorithm::ALL
        .into_iter()
        .filter(|alg| !alg.is_vector() && !alg.is_transpose())
    {
        let out = alg.kernel::<f64>()(d.context(), a.data(), a.shape(), b.data(), b.shape()).unwrap();
        assert_eq!(out, expected.data(), "{}", alg);
    }
}

#[test]
fn test_vector_and_transpose_match_reference() {
    let d = DenseMatMulDispatcher::<f64>::new(ctx(4), uncapped(DispatchThresholds::real()));
    for rows in [3usize, 45, 700] {
        let a = matrix_f64(rows, 9, rows as u64);
        let x = matrix_f64(9, 1, 11);
        let y = d.dispatch_vector(&a, &DenseVector::from_vec(x.data().to_vec())).unwrap();
        assert_eq!(y.data(), reference(&a, &x).as_slice());

        let b = matrix_f64(6, 9, 12);
        let t = d.dispatch_transpose(&a, &b).unwrap();
        assert_eq!(t.shape(), &Shape::matrix(rows, 6));
        assert_eq!(t.data(), reference(&a, &b.transpose()).as_slice());
    }
}

/// Every cutoff scaled down so each branch of the decision tree is reachable
/// with small operands.
fn scaled_thresholds() -> DispatchThresholds {
    DispatchThresholds {
        small_problem_entries: 0,
        near_square_ratio: 4.0 / 3.0,
        square_standard_max: 4,
        square_reordered_max: 8,
        square_concurrent_max: 16,
        min_parallel_dim: 2,
        sequential_work_max: 64,
        inner_standard_rows_max: 6,
        vector_sequential_rows_max: 8,
        transpose_standard_max: 4,
        transpose_blocked_max: 8,
        transpose_concurrent_max: 16,
        cache_capacity: 64,
    }
}

#[test]
fn test_scaled_thresholds_straddle_every_cutoff() {
    use ringmat_dispatch::MatMulAlgorithm::*;

    let cases = [
        // single column of B
        ((8, 5, 1), StandardVector),
        ((9, 5, 1), ConcurrentBlockedVector),
        // near-square tiers
        ((3, 3, 3), Standard),
        ((4, 4, 4), Reordered),
        ((7, 7, 7), Reordered),
        ((8, 8, 8), ConcurrentReordered),
        ((15, 15, 15), ConcurrentReordered),
        ((16, 16, 16), ConcurrentBlockedReordered),
        ((17, 16, 17), ConcurrentBlockedReordered),
        // tall output, either side of the work and dimension floors
        ((15, 2, 2), Reordered),
        ((20, 2, 2), ConcurrentReordered),
        ((20, 1, 3), Reordered),
        // long inner dimension, either side of the row cutoff
        ((1, 20, 3), Reordered),
        ((6, 20, 3), ConcurrentStandard),
        ((7, 20, 3), ConcurrentReordered),
        // wide output
        ((2, 2, 15), Reordered),
        ((1, 3, 20), Reordered),
        ((3, 3, 20), ConcurrentReordered),
    ];

    for workers in [1, 4] {
        let d = DenseMatMulDispatcher::<f64>::new(ctx(workers), scaled_thresholds());
        for &((m, n, k), expected) in &cases {
            let a = matrix_f64(m, n, (m * 31 + n) as u64);
            let b = matrix_f64(n, k, (k * 17 + n) as u64);
            assert_eq!(d.select_algorithm(a.shape(), b.shape()), expected, "{}x{}x{}", m, n, k);

            let out = d.dispatch(&a, &b).unwrap();
            assert_eq!(d.cached_algorithm(a.shape(), b.shape()), Some(expected));
            assert_eq!(out.data(), reference(&a, &b).as_slice(), "{}x{}x{} on {}", m, n, k, expected);
        }
    }
}

#[test]
fn test_scaled_thresholds_vector_and_transpose_cutoffs() {
    use ringmat_dispatch::MatMulAlgorithm::*;

    let d = DenseMatMulDispatcher::<f64>::new(ctx(4), scaled_thresholds());
    for (rows, expected) in [(8, StandardVector), (9, ConcurrentBlockedVector)] {
        let a = matrix_f64(rows, 5, rows as u64);
        let x = matrix_f64(5, 1, 3);
        assert_eq!(d.select_vector_algorithm(a.shape()), expected);
        let y = d.dispatch_vector(&a, &DenseVector::from_vec(x.data().to_vec())).unwrap();
        assert_eq!(y.data(), reference(&a, &x).as_slice());
    }

    let transposed = [
        (3, MultTranspose),
        (4, MultTransposeBlocked),
        (7, MultTransposeBlocked),
        (8, MultTransposeConcurrent),
        (15, MultTransposeConcurrent),
        (16, MultTransposeBlockedConcurrent),
        (19, MultTransposeBlockedConcurrent),
    ];
    for (rows, expected) in transposed {
        let a = matrix_f64(rows, 6, rows as u64 + 40);
        let b = matrix_f64(5, 6, 41);
        assert_eq!(d.select_transpose_algorithm(a.shape()), expected);
        let t = d.dispatch_transpose(&a, &b).unwrap();
        assert_eq!(t.data(), reference(&a, &b.transpose()).as_slice(), "{} rows on {}", rows, expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_parallel_matches_sequential(
        m in 1usize..40,
        n in 1usize..40,
        k in 1usize..40,
        seed in any::<u64>(),
    ) {
        let a = matrix_f64(m, n, seed);
        let b = matrix_f64(n, k, seed ^ 0x5a5a);

        let sequential = DenseMatMulDispatcher::<f64>::new(ctx(1), uncapped(DispatchThresholds::real()));
        let parallel = DenseMatMulDispatcher::<f64>::new(ctx(4), uncapped(DispatchThresholds::real()));

        let expected = reference(&a, &b);
        let lhs = sequential.dispatch(&a, &b).unwrap();
        prop_assert_eq!(lhs.data(), expected.as_slice());
        let lhs = parallel.dispatch(&a, &b).unwrap();
        prop_assert_eq!(lhs.data(), expected.as_slice());
    }

    #[test]
    fn prop_thresholds_never_change_results(
        m in 1usize..30,
        n in 1usize..30,
        k in 1usize..30,
        small in 0usize..2000,
        ratio in 1.0f64..3.0,
    ) {
        let a = matrix_f64(m, n, 21);
        let b = matrix_f64(n, k, 22);
        let mut t = DispatchThresholds::real().with_small_problem_entries(small);
        t.near_square_ratio = ratio;
        t.min_parallel_dim = 1;
        t.sequential_work_max = 0;
        let d = DenseMatMulDispatcher::<f64>::new(ctx(3), t);

        let lhs = d.dispatch(&a, &b).unwrap();
        let rhs = reference(&a, &b);
        prop_assert_eq!(lhs.data(), rhs.as_slice());
    }
}
