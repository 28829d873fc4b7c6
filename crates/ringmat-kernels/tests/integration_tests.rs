//! Integration tests for ringmat-kernels
//!
//! Every product kernel is checked against the same hand-computed results
//! and against each other over a range of shapes.

use proptest::prelude::*;
use ringmat_core::num_complex::Complex;
use ringmat_core::{ApproxEq, MaxPlus, Semiring, Shape, Zmod};
use ringmat_exec::ExecContext;
use ringmat_kernels::{matmul, matvec, mult_transpose, DenseKernel};

fn matmul_kernels<T: Semiring>() -> Vec<(&'static str, DenseKernel<T>)> {
    vec![
        ("standard", matmul::standard::<T> as DenseKernel<T>),
        ("reordered", matmul::reordered::<T> as DenseKernel<T>),
        ("blocked", matmul::blocked::<T> as DenseKernel<T>),
        ("blocked_reordered", matmul::blocked_reordered::<T> as DenseKernel<T>),
        ("concurrent_standard", matmul::concurrent_standard::<T> as DenseKernel<T>),
        ("concurrent_reordered", matmul::concurrent_reordered::<T> as DenseKernel<T>),
        ("concurrent_blocked", matmul::concurrent_blocked::<T> as DenseKernel<T>),
        (
            "concurrent_blocked_reordered",
            matmul::concurrent_blocked_reordered::<T> as DenseKernel<T>,
        ),
    ]
}

fn ctx() -> ExecContext {
    ExecContext::with_parallelism(4, 2).unwrap()
}

// ============================================================================
// Fixed examples
// ============================================================================

#[test]
fn test_two_by_two_real() {
    let ctx = ctx();
    let s = Shape::matrix(2, 2);
    let a = [1.0, 2.0, 3.0, 4.0];
    let b = [5.0, 6.0, 7.0, 8.0];
    for (name, kernel) in matmul_kernels::<f64>() {
        let c = kernel(&ctx, &a, &s, &b, &s).unwrap();
        assert_eq!(c, vec![19.0, 22.0, 43.0, 50.0], "{}", name);
    }
}

#[test]
fn test_two_by_two_complex() {
    let ctx = ctx();
    let s = Shape::matrix(2, 2);
    let lift = |v: &[f64]| -> Vec<Complex<f64>> { v.iter().map(|&x| Complex::new(x, 0.0)).collect() };
    let a = lift(&[1.0, 2.0, 3.0, 4.0]);
    let b = lift(&[5.0, 6.0, 7.0, 8.0]);
    let expected = lift(&[19.0, 22.0, 43.0, 50.0]);
    for (name, kernel) in matmul_kernels::<Complex<f64>>() {
        assert_eq!(kernel(&ctx, &a, &s, &b, &s).unwrap(), expected, "{}", name);
    }
}

#[test]
fn test_two_by_two_finite_field() {
    type F = Zmod<7>;
    let ctx = ctx();
    let s = Shape::matrix(2, 2);
    let a: Vec<F> = [1, 2, 3, 4].iter().map(|&v| F::new(v)).collect();
    let b: Vec<F> = [5, 6, 7, 8].iter().map(|&v| F::new(v)).collect();
    // 19, 22, 43, 50 mod 7
    let expected: Vec<F> = [5, 1, 1, 1].iter().map(|&v| F::new(v)).collect();
    for (name, kernel) in matmul_kernels::<F>() {
        assert_eq!(kernel(&ctx, &a, &s, &b, &s).unwrap(), expected, "{}", name);
    }
}

#[test]
fn test_tropical_two_step_paths() {
    // (max, +) product of a 2-node graph with itself: best two-step scores
    let ctx = ctx();
    let s = Shape::matrix(2, 2);
    let a = [MaxPlus(0.0), MaxPlus(3.0), MaxPlus(1.0), MaxPlus(0.0)];
    for (name, kernel) in matmul_kernels::<MaxPlus<f64>>() {
        let c = kernel(&ctx, &a, &s, &a, &s).unwrap();
        assert_eq!(
            c,
            vec![MaxPlus(4.0), MaxPlus(3.0), MaxPlus(1.0), MaxPlus(4.0)],
            "{}",
            name
        );
    }
}

#[test]
fn test_matvec_two_by_two() {
    let ctx = ctx();
    let a = [1.0, 2.0, 3.0, 4.0];
    let x = [5.0, 7.0];
    let kernels: [DenseKernel<f64>; 4] = [
        matvec::standard_vector,
        matvec::blocked_vector,
        matvec::concurrent_standard_vector,
        matvec::concurrent_blocked_vector,
    ];
    for kernel in kernels {
        let y = kernel(&ctx, &a, &Shape::matrix(2, 2), &x, &Shape::vector(2)).unwrap();
        assert_eq!(y, vec![19.0, 43.0]);
    }
}

#[test]
fn test_mult_transpose_two_by_two() {
    let ctx = ctx();
    let s = Shape::matrix(2, 2);
    let a = [1.0, 2.0, 3.0, 4.0];
    // rows of bt are the columns of [[5, 6], [7, 8]]
    let bt = [5.0, 7.0, 6.0, 8.0];
    let kernels: [DenseKernel<f64>; 4] = [
        mult_transpose::mult_transpose,
        mult_transpose::mult_transpose_blocked,
        mult_transpose::mult_transpose_concurrent,
        mult_transpose::mult_transpose_blocked_concurrent,
    ];
    for kernel in kernels {
        assert_eq!(
            kernel(&ctx, &a, &s, &bt, &s).unwrap(),
            vec![19.0, 22.0, 43.0, 50.0]
        );
    }
}

// ============================================================================
// Parallel / sequential equivalence
// ============================================================================

fn lcg_values(len: usize, seed: u64) -> Vec<f64> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) % 2000) as f64 / 1000.0 - 1.0
        })
        .collect()
}

#[test]
fn test_concurrent_matches_sequential_around_parallel_cutoffs() {
    // sizes on both sides of the square tiers and the minimum parallel
    // dimension used by the dispatcher
    let ctx = ExecContext::with_parallelism(4, 16).unwrap();
    for &(m, n, k) in &[
        (4, 4, 4),
        (5, 5, 5),
        (6, 6, 6),
        (39, 39, 39),
        (41, 41, 41),
        (3, 200, 4),
        (120, 5, 6),
        (7, 9, 300),
    ] {
        let a = lcg_values(m * n, 11);
        let b = lcg_values(n * k, 29);
        let (sa, sb) = (Shape::matrix(m, n), Shape::matrix(n, k));
        let expected = matmul::standard(&ctx, &a, &sa, &b, &sb).unwrap();
        for (name, kernel) in matmul_kernels::<f64>() {
            let got = kernel(&ctx, &a, &sa, &b, &sb).unwrap();
            assert_eq!(got.len(), m * k);
            assert!(
                got.iter().zip(&expected).all(|(x, y)| x.approx_eq(y, 1e-10)),
                "{} disagrees on {}x{}x{}",
                name,
                m,
                n,
                k
            );
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: every kernel agrees exactly over a finite field
    #[test]
    fn prop_all_kernels_agree_exactly(
        m in 1usize..24,
        n in 1usize..24,
        k in 1usize..24,
        block in 1usize..9,
        seed in any::<u64>(),
    ) {
        type F = Zmod<65_521>;
        let ctx = ExecContext::with_parallelism(3, block).unwrap();
        let a: Vec<F> = (0..m * n).map(|i| F::new(seed.wrapping_add(i as u64 * 97))).collect();
        let b: Vec<F> = (0..n * k).map(|i| F::new(seed.wrapping_mul(31).wrapping_add(i as u64))).collect();
        let (sa, sb) = (Shape::matrix(m, n), Shape::matrix(n, k));
        let expected = matmul::standard(&ctx, &a, &sa, &b, &sb).unwrap();
        for (name, kernel) in matmul_kernels::<F>() {
            prop_assert_eq!(kernel(&ctx, &a, &sa, &b, &sb).unwrap(), expected.clone(), "{}", name);
        }
    }
}
