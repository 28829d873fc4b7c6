//! Dense matrix-vector products
//!
//! `y = A · x` for a row-major `A (m×n)`. The right operand is either a
//! rank-1 vector of length `n` or an `n × 1` column; both are stored the same
//! way, so every kernel here accepts either shape.

use ringmat_core::{Semiring, Shape};
use ringmat_exec::{ExecContext, ExecResult};

fn standard_vector_rows<T: Semiring>(a: &[T], x: &[T], n: usize, start: usize, out: &mut [T]) {
    for (r, dest) in out.iter_mut().enumerate() {
        let i = start + r;
        let a_row = &a[i * n..(i + 1) * n];
        let mut sum = T::zero();
        for (a_il, x_l) in a_row.iter().zip(x) {
            sum = sum + a_il.clone() * x_l.clone();
        }
        *dest = sum;
    }
}

fn blocked_vector_rows<T: Semiring>(
    a: &[T],
    x: &[T],
    n: usize,
    bs: usize,
    start: usize,
    end: usize,
    out: &mut [T],
) {
    for ii in (start..end).step_by(bs) {
        let i_end = (ii + bs).min(end);
        for ll in (0..n).step_by(bs) {
            let l_end = (ll + bs).min(n);
            for i in ii..i_end {
                let mut sum = T::zero();
                for l in ll..l_end {
                    sum = sum + a[i * n + l].clone() * x[l].clone();
                }
                out[i - start] = out[i - start].clone() + sum;
            }
        }
    }
}

/// One dot product per row.
pub fn standard_vector<T: Semiring>(
    _ctx: &ExecContext,
    a: &[T],
    shape1: &Shape,
    x: &[T],
    _shape2: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n) = (shape1.rows(), shape1.cols());
    let mut out = vec![T::zero(); m];
    standard_vector_rows(a, x, n, 0, &mut out);
    Ok(out)
}

/// Tiled over rows of `A` and segments of `x`.
pub fn blocked_vector<T: Semiring>(
    ctx: &ExecContext,
    a: &[T],
    shape1: &Shape,
    x: &[T],
    _shape2: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n) = (shape1.rows(), shape1.cols());
    let mut out = vec![T::zero(); m];
    blocked_vector_rows(a, x, n, ctx.block_size(), 0, m, &mut out);
    Ok(out)
}

/// [`standard_vector`] with rows split evenly across the pool.
pub fn concurrent_standard_vector<T: Semiring>(
    ctx: &ExecContext,
    a: &[T],
    shape1: &Shape,
    x: &[T],
    _shape2: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n) = (shape1.rows(), shape1.cols());
    let mut out = vec![T::zero(); m];
    ctx.pool().concurrent_rows(&mut out, 1, |start, _end, rows| {
        standard_vector_rows(a, x, n, start, rows)
    })?;
    Ok(out)
}

/// [`blocked_vector`] with one task per block of rows.
///
/// The default for tall products with a single output column.
pub fn concurrent_blocked_vector<T: Semiring>(
    ctx: &ExecContext,
    a: &[T],
    shape1: &Shape,
    x: &[T],
    _shape2: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n) = (shape1.rows(), shape1.cols());
    let bs = ctx.block_size();
    let mut out = vec![T::zero(); m];
    ctx.pool()
        .concurrent_blocked_rows(&mut out, 1, bs, |start, end, rows| {
            blocked_vector_rows(a, x, n, bs, start, end, rows)
        })?;
    Ok(out)
}
