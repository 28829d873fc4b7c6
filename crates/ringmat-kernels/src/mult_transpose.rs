//! Products with a transposed right operand
//!
//! `C = A · Bᵀ` for `A (m×n)` and `B (k×n)`, without materializing `Bᵀ`.
//! Both operands are read row by row, so every inner loop is contiguous.

use ringmat_core::{Semiring, Shape};
use ringmat_exec::{ExecContext, ExecResult};

fn mult_transpose_rows<T: Semiring>(
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
        for j in 0..k {
            let b_row = &b[j * n..(j + 1) * n];
            let mut sum = T::zero();
            for (x, y) in a_row.iter().zip(b_row) {
                sum = sum + x.clone() * y.clone();
            }
            out[(i - start) * k + j] = sum;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn mult_transpose_blocked_rows<T: Semiring>(
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
                    for j in jj..j_end {
                        let mut sum = T::zero();
                        for l in ll..l_end {
                            sum = sum + a[i * n + l].clone() * b[j * n + l].clone();
                        }
                        let dest = &mut out[(i - start) * k + j];
                        *dest = dest.clone() + sum;
                    }
                }
            }
        }
    }
}

/// Row-by-row dot products of `A` and `B`.
pub fn mult_transpose<T: Semiring>(
    _ctx: &ExecContext,
    a: &[T],
    shape1: &Shape,
    b: &[T],
    shape2: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n, k) = (shape1.rows(), shape1.cols(), shape2.rows());
    let mut out = vec![T::zero(); m * k];
    mult_transpose_rows(a, b, n, k, 0, m, &mut out);
    Ok(out)
}

/// Tiled over rows of `A`, rows of `B` and the shared inner dimension.
pub fn mult_transpose_blocked<T: Semiring>(
    ctx: &ExecContext,
    a: &[T],
    shape1: &Shape,
    b: &[T],
    shape2: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n, k) = (shape1.rows(), shape1.cols(), shape2.rows());
    let mut out = vec![T::zero(); m * k];
    mult_transpose_blocked_rows(a, b, n, k, ctx.block_size(), 0, m, &mut out);
    Ok(out)
}

pub fn mult_transpose_concurrent<T: Semiring>(
    ctx: &ExecContext,
    a: &[T],
    shape1: &Shape,
    b: &[T],
    shape2: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n, k) = (shape1.rows(), shape1.cols(), shape2.rows());
    let mut out = vec![T::zero(); m * k];
    ctx.pool().concurrent_rows(&mut out, k, |start, end, rows| {
        mult_transpose_rows(a, b, n, k, start, end, rows)
    })?;
    Ok(out)
}

pub fn mult_transpose_blocked_concurrent<T: Semiring>(
    ctx: &ExecContext,
    a: &[T],
    shape1: &Shape,
    b: &[T],
    shape2: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n, k) = (shape1.rows(), shape1.cols(), shape2.rows());
    let bs = ctx.block_size();
    let mut out = vec![T::zero(); m * k];
    ctx.pool()
        .concurrent_blocked_rows(&mut out, k, bs, |start, end, rows| {
            mult_transpose_blocked_rows(a, b, n, k, bs, start, end, rows)
        })?;
    Ok(out)
}
