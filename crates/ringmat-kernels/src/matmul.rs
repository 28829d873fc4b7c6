//! Dense matrix-matrix products
//!
//! Every kernel computes `C = A · B` for a row-major `A (m×n)` and
//! `B (n×k)` and returns a freshly allocated row-major `C (m×k)`.
//!
//! # Variants
//!
//! | Kernel | Loop order | Notes |
//! |--------|-----------|-------|
//! | [`standard`] | i-j-l | one dot product per output entry |
//! | [`reordered`] | i-l-j | streams rows of `B`; best sequential default |
//! | [`blocked`] | tiled i-j-l | tile edge from the context block size |
//! | [`blocked_reordered`] | tiled i-l-j | |
//! | [`concurrent_standard`] | i-j-l | rows split evenly across workers |
//! | [`concurrent_reordered`] | i-l-j | rows split evenly across workers |
//! | [`concurrent_blocked`] | tiled i-j-l | one task per block of rows |
//! | [`concurrent_blocked_reordered`] | tiled i-l-j | one task per block of rows |
//!
//! The concurrent kernels give each task the output rows it owns, so no two
//! tasks ever write the same entry.
//!
//! Shapes are validated by the caller. All variants agree exactly over exact
//! element types; over floating point types the tiled kernels may associate
//! partial sums differently.

use ringmat_core::{Semiring, Shape};
use ringmat_exec::{ExecContext, ExecResult};

#[inline]
fn dims(shape1: &Shape, shape2: &Shape) -> (usize, usize, usize) {
    (shape1.rows(), shape1.cols(), shape2.cols())
}

/// `C[i, j] = Σ_l A[i, l] · B[l, j]` for rows `start..end`.
///
/// `out` holds exactly those rows.
pub(crate) fn standard_rows<T: Semiring>(
    a: &[T],
    b: &[T],
    n: usize,
    k: usize,
    start: usize,
    end: usize,
    out: &mut [T],
) {
    for i in start..end {
        let a_row = &a[i * n..(i + 1) * n];
        let out_row = &mut out[(i - start) * k..(i - start + 1) * k];
        for (j, dest) in out_row.iter_mut().enumerate() {
            let mut sum = T::zero();
            for (l, a_il) in a_row.iter().enumerate() {
                sum = sum + a_il.clone() * b[l * k + j].clone();
            }
            *dest = sum;
        }
    }
}

pub(crate) fn reordered_rows<T: Semiring>(
    a: &[T],
    b: &[T],
    n: usize,
    k: usize,
    start: usize,
    end: usize,
    out: &mut [T],
) {
    for i in start..end {
        let a_row = &a[i * n..(i + 1) * n];
        let out_row = &mut out[(i - start) * k..(i - start + 1) * k];
        for (l, a_il) in a_row.iter().enumerate() {
            let b_row = &b[l * k..(l + 1) * k];
            for (dest, b_lj) in out_row.iter_mut().zip(b_row) {
                *dest = dest.clone() + a_il.clone() * b_lj.clone();
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn blocked_rows<T: Semiring>(
    a: &[T],
    b: &[T],
    n: usize,
    k: usize,
    bs: usize,
    start: usize,
    end: usize,
    out: &mut [T],
) {
    for ii in (start..end).step_by(bs) {
        let i_end = (ii + bs).min(end);
        for jj in (0..k).step_by(bs) {
            let j_end = (jj + bs).min(k);
            for ll in (0..n).step_by(bs) {
                let l_end = (ll + bs).min(n);

                for i in ii..i_end {
                    let a_row = &a[i * n..(i + 1) * n];
                    let out_row = &mut out[(i - start) * k..(i - start + 1) * k];
                    for j in jj..j_end {
                        let mut sum = T::zero();
                        for l in ll..l_end {
                            sum = sum + a_row[l].clone() * b[l * k + j].clone();
                        }
                        out_row[j] = out_row[j].clone() + sum;
                    }
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn blocked_reordered_rows<T: Semiring>(
    a: &[T],
    b: &[T],
    n: usize,
    k: usize,
    bs: usize,
    start: usize,
    end: usize,
    out: &mut [T],
) {
    for ii in (start..end).step_by(bs) {
        let i_end = (ii + bs).min(end);
        for ll in (0..n).step_by(bs) {
            let l_end = (ll + bs).min(n);
            for jj in (0..k).step_by(bs) {
                let j_end = (jj + bs).min(k);

                for i in ii..i_end {
                    let out_row = &mut out[(i - start) * k..(i - start + 1) * k];
                    for l in ll..l_end {
                        let a_il = &a[i * n + l];
                        let b_row = &b[l * k..(l + 1) * k];
                        for j in jj..j_end {
                            out_row[j] = out_row[j].clone() + a_il.clone() * b_row[j].clone();
                        }
                    }
                }
            }
        }
    }
}

/// Dot-product (i-j-l) kernel.
///
/// # Complexity
///
/// O(m·n·k) time, O(m·k) output.
pub fn standard<T: Semiring>(
    _ctx: &ExecContext,
    a: &[T],
    shape1: &Shape,
    b: &[T],
    shape2: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n, k) = dims(shape1, shape2);
    let mut out = vec![T::zero(); m * k];
    standard_rows(a, b, n, k, 0, m, &mut out);
    Ok(out)
}

/// Loop-reordered (i-l-j) kernel.
///
/// Walks rows of `B` contiguously, which is usually the fastest sequential
/// choice for row-major data.
pub fn reordered<T: Semiring>(
    _ctx: &ExecContext,
    a: &[T],
    shape1: &Shape,
    b: &[T],
    shape2: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n, k) = dims(shape1, shape2);
    let mut out = vec![T::zero(); m * k];
    reordered_rows(a, b, n, k, 0, m, &mut out);
    Ok(out)
}

/// Tiled i-j-l kernel with square tiles of `ctx.block_size()`.
pub fn blocked<T: Semiring>(
    ctx: &ExecContext,
    a: &[T],
    shape1: &Shape,
    b: &[T],
    shape2: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n, k) = dims(shape1, shape2);
    let mut out = vec![T::zero(); m * k];
    blocked_rows(a, b, n, k, ctx.block_size(), 0, m, &mut out);
    Ok(out)
}

/// Tiled i-l-j kernel.
pub fn blocked_reordered<T: Semiring>(
    ctx: &ExecContext,
    a: &[T],
    shape1: &Shape,
    b: &[T],
    shape2: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n, k) = dims(shape1, shape2);
    let mut out = vec![T::zero(); m * k];
    blocked_reordered_rows(a, b, n, k, ctx.block_size(), 0, m, &mut out);
    Ok(out)
}

/// [`standard`] with output rows split evenly across the pool.
pub fn concurrent_standard<T: Semiring>(
    ctx: &ExecContext,
    a: &[T],
    shape1: &Shape,
    b: &[T],
    shape2: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n, k) = dims(shape1, shape2);
    let mut out = vec![T::zero(); m * k];
    ctx.pool().concurrent_rows(&mut out, k, |start, end, rows| {
        standard_rows(a, b, n, k, start, end, rows)
    })?;
    Ok(out)
}

/// [`reordered`] with output rows split evenly across the pool.
pub fn concurrent_reordered<T: Semiring>(
    ctx: &ExecContext,
    a: &[T],
    shape1: &Shape,
    b: &[T],
    shape2: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n, k) = dims(shape1, shape2);
    let mut out = vec![T::zero(); m * k];
    ctx.pool().concurrent_rows(&mut out, k, |start, end, rows| {
        reordered_rows(a, b, n, k, start, end, rows)
    })?;
    Ok(out)
}

/// [`blocked`] with one task per block of output rows.
pub fn concurrent_blocked<T: Semiring>(
    ctx: &ExecContext,
    a: &[T],
    shape1: &Shape,
    b: &[T],
    shape2: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n, k) = dims(shape1, shape2);
    let bs = ctx.block_size();
    let mut out = vec![T::zero(); m * k];
    ctx.pool()
        .concurrent_blocked_rows(&mut out, k, bs, |start, end, rows| {
            blocked_rows(a, b, n, k, bs, start, end, rows)
        })?;
    Ok(out)
}

/// [`blocked_reordered`] with one task per block of output rows.
///
/// The default for large near-square products.
pub fn concurrent_blocked_reordered<T: Semiring>(
    ctx: &ExecContext,
    a: &[T],
    shape1: &Shape,
    b: &[T],
    shape2: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n, k) = dims(shape1, shape2);
    let bs = ctx.block_size();
    let mut out = vec![T::zero(); m * k];
    ctx.pool()
        .concurrent_blocked_rows(&mut out, k, bs, |start, end, rows| {
            blocked_reordered_rows(a, b, n, k, bs, start, end, rows)
        })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DenseKernel;
    use ringmat_core::Zmod;

    type F = Zmod<1_000_003>;

    fn all_kernels() -> Vec<(&'static str, DenseKernel<F>)> {
        vec![
            ("standard", standard::<F> as DenseKernel<F>),
            ("reordered", reordered::<F> as DenseKernel<F>),
            ("blocked", blocked::<F> as DenseKernel<F>),
            ("blocked_reordered", blocked_reordered::<F> as DenseKernel<F>),
            ("concurrent_standard", concurrent_standard::<F> as DenseKernel<F>),
            ("concurrent_reordered", concurrent_reordered::<F> as DenseKernel<F>),
            ("concurrent_blocked", concurrent_blocked::<F> as DenseKernel<F>),
            ("concurrent_blocked_reordered", concurrent_blocked_reordered::<F> as DenseKernel<F>),
        ]
    }

    fn fill(len: usize, seed: u64) -> Vec<F> {
        (0..len as u64)
            .map(|x| F::new(x.wrapping_mul(2_654_435_761).wrapping_add(seed) % 1000))
            .collect()
    }

    #[test]
    fn test_variants_agree_on_rectangular_shapes() {
        // block size 3 leaves ragged tiles on every axis
        let ctx = ExecContext::with_parallelism(3, 3).unwrap();
        for &(m, n, k) in &[(1, 1, 1), (5, 7, 4), (8, 3, 11), (13, 13, 13), (2, 17, 1)] {
            let a = fill(m * n, 1);
            let b = fill(n * k, 2);
            let (sa, sb) = (Shape::matrix(m, n), Shape::matrix(n, k));
            let expected = standard(&ctx, &a, &sa, &b, &sb).unwrap();
            assert_eq!(expected.len(), m * k);
            for (name, kernel) in all_kernels() {
                let got = kernel(&ctx, &a, &sa, &b, &sb).unwrap();
                assert_eq!(got, expected, "{} disagrees on {}x{}x{}", name, m, n, k);
            }
        }
    }

    #[test]
    fn test_empty_dimensions() {
        let ctx = ExecContext::with_parallelism(2, 4).unwrap();
        for (name, kernel) in all_kernels() {
            let out = kernel(&ctx, &[], &Shape::matrix(0, 3), &fill(6, 0), &Shape::matrix(3, 2))
                .unwrap();
            assert!(out.is_empty(), "{}", name);

            // inner dimension zero: all-zero output
            let out = kernel(&ctx, &[], &Shape::matrix(2, 0), &[], &Shape::matrix(0, 2)).unwrap();
            assert_eq!(out, vec![F::new(0); 4], "{}", name);
        }
    }
}
