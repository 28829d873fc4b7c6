//! Out-of-place transposes
//!
//! A transpose is a pure memory layout change, so these kernels only need
//! `Clone`. The Hermitian variants additionally conjugate every entry and
//! require a [`Field`].
//!
//! The concurrent variant partitions the destination rows, which are the
//! source columns, into blocks of `ctx.block_size()`.

use ringmat_core::{Field, Shape};
use ringmat_exec::{ExecContext, ExecResult};

/// Signature shared by the transpose kernels.
pub type TransposeKernel<T> = fn(&ExecContext, &[T], &Shape) -> ExecResult<Vec<T>>;

fn transpose_rows<T: Clone, F: Fn(&T) -> T>(
    src: &[T],
    m: usize,
    n: usize,
    start: usize,
    end: usize,
    out: &mut [T],
    f: F,
) {
    for j in start..end {
        let dest_row = &mut out[(j - start) * m..(j - start + 1) * m];
        for (i, dest) in dest_row.iter_mut().enumerate() {
            *dest = f(&src[i * n + j]);
        }
    }
}

/// Row-by-row transpose.
pub fn transpose_standard<T: Clone + Send + Sync>(
    _ctx: &ExecContext,
    src: &[T],
    shape: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n) = (shape.rows(), shape.cols());
    let mut out = src.to_vec();
    transpose_rows(src, m, n, 0, n, &mut out, T::clone);
    Ok(out)
}

/// Tiled transpose; reads and writes stay within one tile at a time.
pub fn transpose_blocked<T: Clone + Send + Sync>(
    ctx: &ExecContext,
    src: &[T],
    shape: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n) = (shape.rows(), shape.cols());
    let bs = ctx.block_size();
    let mut out = src.to_vec();
    for ii in (0..m).step_by(bs) {
        let i_end = (ii + bs).min(m);
        for jj in (0..n).step_by(bs) {
            let j_end = (jj + bs).min(n);
            for i in ii..i_end {
                for j in jj..j_end {
                    out[j * m + i] = src[i * n + j].clone();
                }
            }
        }
    }
    Ok(out)
}

/// Transpose with one task per block of source columns.
pub fn transpose_concurrent<T: Clone + Send + Sync>(
    ctx: &ExecContext,
    src: &[T],
    shape: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n) = (shape.rows(), shape.cols());
    let mut out = src.to_vec();
    ctx.pool()
        .concurrent_blocked_rows(&mut out, m, ctx.block_size(), |start, end, rows| {
            transpose_rows(src, m, n, start, end, rows, T::clone)
        })?;
    Ok(out)
}

/// Conjugate (Hermitian) transpose.
pub fn conj_transpose<T: Field>(
    _ctx: &ExecContext,
    src: &[T],
    shape: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n) = (shape.rows(), shape.cols());
    let mut out = src.to_vec();
    transpose_rows(src, m, n, 0, n, &mut out, T::conj);
    Ok(out)
}

/// Conjugate transpose with one task per block of source columns.
pub fn conj_transpose_concurrent<T: Field>(
    ctx: &ExecContext,
    src: &[T],
    shape: &Shape,
) -> ExecResult<Vec<T>> {
    let (m, n) = (shape.rows(), shape.cols());
    let mut out = src.to_vec();
    ctx.pool()
        .concurrent_blocked_rows(&mut out, m, ctx.block_size(), |start, end, rows| {
            transpose_rows(src, m, n, start, end, rows, T::conj)
        })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringmat_core::num_complex::Complex;

    #[test]
    fn test_variants_agree() {
        let ctx = ExecContext::with_parallelism(3, 4).unwrap();
        for &(m, n) in &[(1, 1), (3, 5), (10, 7), (16, 16), (1, 9)] {
            let src: Vec<u32> = (0..(m * n) as u32).collect();
            let shape = Shape::matrix(m, n);
            let expected = transpose_standard(&ctx, &src, &shape).unwrap();
            for i in 0..m {
                for j in 0..n {
                    assert_eq!(expected[j * m + i], src[i * n + j]);
                }
            }
            assert_eq!(transpose_blocked(&ctx, &src, &shape).unwrap(), expected);
            assert_eq!(transpose_concurrent(&ctx, &src, &shape).unwrap(), expected);
        }
    }

    #[test]
    fn test_conj_transpose() {
        let ctx = ExecContext::with_parallelism(2, 1).unwrap();
        let src = vec![
            Complex::new(1.0, 1.0),
            Complex::new(2.0, -2.0),
            Complex::new(3.0, 0.5),
            Complex::new(0.0, 4.0),
            Complex::new(5.0, 0.0),
            Complex::new(6.0, -6.0),
        ];
        let shape = Shape::matrix(2, 3);
        let expected = vec![
            Complex::new(1.0, -1.0),
            Complex::new(0.0, -4.0),
            Complex::new(2.0, 2.0),
            Complex::new(5.0, 0.0),
            Complex::new(3.0, -0.5),
            Complex::new(6.0, 6.0),
        ];
        assert_eq!(conj_transpose(&ctx, &src, &shape).unwrap(), expected);
        assert_eq!(conj_transpose_concurrent(&ctx, &src, &shape).unwrap(), expected);
    }
}
