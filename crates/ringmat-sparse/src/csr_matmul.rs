//! Products involving CSR matrices
//!
//! Every kernel here walks the rows of a CSR operand. For `C = A · B` with
//! both operands in CSR, row `i` of `C` is the sum of the rows `B[k, :]`
//! scaled by the stored entries `A[i, k]`:
//!
//! ```text
//! C[i, :] = Σ_{k ∈ row i of A} A[i, k] · B[k, :]
//! ```
//!
//! so output rows are independent and the concurrent variants split them
//! across the pool. Dense results are written through disjoint row slices.
//! Sparse results are built per chunk of rows and stitched together in
//! order.
//!
//! # Examples
//!
//! ```
//! use ringmat_sparse::{csr_matmul, CsrMatrix};
//!
//! let a = CsrMatrix::new(2, 2, vec![0, 1, 1], vec![0], vec![2.0]).unwrap();
//! let b = CsrMatrix::new(2, 2, vec![0, 1, 1], vec![0], vec![3.0]).unwrap();
//!
//! let dense = csr_matmul::matmul_dense(&a, &b).unwrap();
//! assert_eq!(dense.data(), &[6.0, 0.0, 0.0, 0.0]);
//!
//! let sparse = csr_matmul::matmul_sparse(&a, &b).unwrap();
//! assert_eq!(sparse.row_ptr(), &[0, 1, 1]);
//! ```

use crate::coo::CooVector;
use crate::csr::CsrMatrix;
use crate::error::SparseResult;
use ringmat_core::shape::{ensure_matmul_shapes, ensure_matvec_shapes};
use ringmat_core::{DenseMatrix, DenseVector, Semiring, Shape, ShapeError};
use ringmat_exec::ExecContext;
use std::collections::HashMap;

fn ensure_inner(a: &Shape, b: &Shape) -> SparseResult<()> {
    if a.cols() != b.rows() {
        return Err(ShapeError::MatMulMismatch {
            m1: a.rows(),
            n1: a.cols(),
            m2: b.rows(),
            n2: b.cols(),
        }
        .into());
    }
    Ok(())
}

// ============================================================================
// CSR × CSR, dense result
// ============================================================================

/// Accumulate rows `start..end` of `a · b` into `rows` (row-major, `k` wide).
fn csr_csr_rows<T: Semiring>(
    a: &CsrMatrix<T>,
    b: &CsrMatrix<T>,
    start: usize,
    end: usize,
    rows: &mut [T],
) {
    let k = b.cols();
    for i in start..end {
        let out = &mut rows[(i - start) * k..(i - start + 1) * k];
        let (a_cols, a_vals) = a.row(i);
        for (&inner, av) in a_cols.iter().zip(a_vals) {
            let (b_cols, b_vals) = b.row(inner);
            for (&j, bv) in b_cols.iter().zip(b_vals) {
                out[j] = out[j].clone() + av.clone() * bv.clone();
            }
        }
    }
}

/// `a · b` as a dense matrix.
///
/// # Errors
///
/// [`ShapeError::MatMulMismatch`] if `a.cols() != b.rows()`.
///
/// # Complexity
///
/// O(m·k) to allocate the result plus one multiply-add per matching pair
/// of stored entries.
pub fn matmul_dense<T: Semiring>(a: &CsrMatrix<T>, b: &CsrMatrix<T>) -> SparseResult<DenseMatrix<T>> {
    let shape = ensure_matmul_shapes(a.shape(), b.shape())?;
    let mut data = vec![T::zero(); shape.total_entries()];
    csr_csr_rows(a, b, 0, a.rows(), &mut data);
    Ok(DenseMatrix::from_shape_vec(shape, data)?)
}

/// [`matmul_dense`] with output rows split across the pool.
pub fn concurrent_matmul_dense<T: Semiring>(
    ctx: &ExecContext,
    a: &CsrMatrix<T>,
    b: &CsrMatrix<T>,
) -> SparseResult<DenseMatrix<T>> {
    let shape = ensure_matmul_shapes(a.shape(), b.shape())?;
    let mut data = vec![T::zero(); shape.total_entries()];
    ctx.pool()
        .concurrent_rows(&mut data, b.cols(), |start, end, rows| {
            csr_csr_rows(a, b, start, end, rows)
        })?;
    Ok(DenseMatrix::from_shape_vec(shape, data)?)
}

// ============================================================================
// CSR × CSR, sparse result
// ============================================================================

/// Rows `start..end` of `a · b` in CSR form: per-row entry counts, columns
/// and values.
fn csr_csr_sparse_rows<T: Semiring>(
    a: &CsrMatrix<T>,
    b: &CsrMatrix<T>,
    start: usize,
    end: usize,
) -> (Vec<usize>, Vec<usize>, Vec<T>) {
    let mut counts = Vec::with_capacity(end - start);
    let mut cols = Vec::new();
    let mut values = Vec::new();
    let mut acc: HashMap<usize, T> = HashMap::new();

    for i in start..end {
        acc.clear();
        let (a_cols, a_vals) = a.row(i);
        for (&inner, av) in a_cols.iter().zip(a_vals) {
            let (b_cols, b_vals) = b.row(inner);
            for (&j, bv) in b_cols.iter().zip(b_vals) {
                let prod = av.clone() * bv.clone();
                acc.entry(j)
                    .and_modify(|sum| *sum = sum.clone() + prod.clone())
                    .or_insert(prod);
            }
        }

        let mut row: Vec<(usize, T)> = acc.drain().collect();
        row.sort_unstable_by_key(|&(j, _)| j);
        counts.push(row.len());
        for (j, v) in row {
            cols.push(j);
            values.push(v);
        }
    }
    (counts, cols, values)
}

fn prefix_row_ptr(counts: impl IntoIterator<Item = usize>, rows: usize) -> Vec<usize> {
    let mut row_ptr = Vec::with_capacity(rows + 1);
    let mut total = 0;
    row_ptr.push(0);
    for c in counts {
        total += c;
        row_ptr.push(total);
    }
    row_ptr
}

/// `a · b` as a CSR matrix.
///
/// Each output row is accumulated in a hash map keyed by column, then
/// sorted by column before it is appended.
///
/// # Errors
///
/// [`ShapeError::MatMulMismatch`] if `a.cols() != b.rows()`.
pub fn matmul_sparse<T: Semiring>(a: &CsrMatrix<T>, b: &CsrMatrix<T>) -> SparseResult<CsrMatrix<T>> {
    ensure_inner(a.shape(), b.shape())?;
    let (counts, cols, values) = csr_csr_sparse_rows(a, b, 0, a.rows());
    let row_ptr = prefix_row_ptr(counts, a.rows());
    Ok(CsrMatrix::from_parts_unchecked(
        Shape::matrix(a.rows(), b.cols()),
        row_ptr,
        cols,
        values,
    ))
}

/// [`matmul_sparse`] with rows split across the pool. Each chunk produces a
/// partial CSR block; blocks are concatenated in row order.
pub fn concurrent_matmul_sparse<T: Semiring>(
    ctx: &ExecContext,
    a: &CsrMatrix<T>,
    b: &CsrMatrix<T>,
) -> SparseResult<CsrMatrix<T>> {
    ensure_inner(a.shape(), b.shape())?;
    let blocks = ctx
        .pool()
        .concurrent_collect(a.rows(), |start, end| csr_csr_sparse_rows(a, b, start, end))?;

    let nnz: usize = blocks.iter().map(|(_, c, _)| c.len()).sum();
    let mut counts = Vec::with_capacity(a.rows());
    let mut cols = Vec::with_capacity(nnz);
    let mut values = Vec::with_capacity(nnz);
    for (block_counts, block_cols, block_values) in blocks {
        counts.extend(block_counts);
        cols.extend(block_cols);
        values.extend(block_values);
    }
    let row_ptr = prefix_row_ptr(counts, a.rows());
    Ok(CsrMatrix::from_parts_unchecked(
        Shape::matrix(a.rows(), b.cols()),
        row_ptr,
        cols,
        values,
    ))
}

// ============================================================================
// Mixed CSR / dense
// ============================================================================

fn csr_dense_rows<T: Semiring>(
    a: &CsrMatrix<T>,
    b: &DenseMatrix<T>,
    start: usize,
    end: usize,
    rows: &mut [T],
) {
    let k = b.cols();
    for i in start..end {
        let out = &mut rows[(i - start) * k..(i - start + 1) * k];
        let (a_cols, a_vals) = a.row(i);
        for (&inner, av) in a_cols.iter().zip(a_vals) {
            for (o, bv) in out.iter_mut().zip(b.row(inner)) {
                *o = o.clone() + av.clone() * bv.clone();
            }
        }
    }
}

/// Sparse `a` times dense `b`.
pub fn csr_dense_matmul<T: Semiring>(
    a: &CsrMatrix<T>,
    b: &DenseMatrix<T>,
) -> SparseResult<DenseMatrix<T>> {
    let shape = ensure_matmul_shapes(a.shape(), b.shape())?;
    let mut data = vec![T::zero(); shape.total_entries()];
    csr_dense_rows(a, b, 0, a.rows(), &mut data);
    Ok(DenseMatrix::from_shape_vec(shape, data)?)
}

/// [`csr_dense_matmul`] with output rows split across the pool.
pub fn concurrent_csr_dense_matmul<T: Semiring>(
    ctx: &ExecContext,
    a: &CsrMatrix<T>,
    b: &DenseMatrix<T>,
) -> SparseResult<DenseMatrix<T>> {
    let shape = ensure_matmul_shapes(a.shape(), b.shape())?;
    let mut data = vec![T::zero(); shape.total_entries()];
    ctx.pool()
        .concurrent_rows(&mut data, b.cols(), |start, end, rows| {
            csr_dense_rows(a, b, start, end, rows)
        })?;
    Ok(DenseMatrix::from_shape_vec(shape, data)?)
}

/// Dense `a` times sparse `b`.
///
/// Each stored `b[r, c]` contributes `a[i, r] · b[r, c]` to column `c` of
/// every output row `i`.
pub fn dense_csr_matmul<T: Semiring>(
    a: &DenseMatrix<T>,
    b: &CsrMatrix<T>,
) -> SparseResult<DenseMatrix<T>> {
    let shape = ensure_matmul_shapes(a.shape(), b.shape())?;
    let k = b.cols();
    let mut data = vec![T::zero(); shape.total_entries()];
    for i in 0..a.rows() {
        let out = &mut data[i * k..(i + 1) * k];
        for (r, av) in a.row(i).iter().enumerate() {
            let (b_cols, b_vals) = b.row(r);
            for (&c, bv) in b_cols.iter().zip(b_vals) {
                out[c] = out[c].clone() + av.clone() * bv.clone();
            }
        }
    }
    Ok(DenseMatrix::from_shape_vec(shape, data)?)
}

// ============================================================================
// Matrix-vector
// ============================================================================

fn csr_row_dot<T: Semiring>(a: &CsrMatrix<T>, i: usize, x: &[T]) -> T {
    let (cols, vals) = a.row(i);
    cols.iter()
        .zip(vals)
        .fold(T::zero(), |acc, (&c, v)| acc + v.clone() * x[c].clone())
}

/// Sparse matrix times dense vector.
///
/// # Errors
///
/// [`ShapeError::MatVecMismatch`] if `x.len() != a.cols()`.
pub fn matvec<T: Semiring>(a: &CsrMatrix<T>, x: &DenseVector<T>) -> SparseResult<DenseVector<T>> {
    ensure_matvec_shapes(a.shape(), x.shape())?;
    let data = (0..a.rows()).map(|i| csr_row_dot(a, i, x.data())).collect();
    Ok(DenseVector::from_vec(data))
}

/// [`matvec`] with rows split across the pool.
pub fn concurrent_matvec<T: Semiring>(
    ctx: &ExecContext,
    a: &CsrMatrix<T>,
    x: &DenseVector<T>,
) -> SparseResult<DenseVector<T>> {
    ensure_matvec_shapes(a.shape(), x.shape())?;
    let mut data = vec![T::zero(); a.rows()];
    ctx.pool().concurrent_rows(&mut data, 1, |start, end, out| {
        for (o, i) in out.iter_mut().zip(start..end) {
            *o = csr_row_dot(a, i, x.data());
        }
    })?;
    Ok(DenseVector::from_vec(data))
}

/// Sparse matrix times sparse vector, dense result.
///
/// Each row of `a` is merge-joined against the stored indices of `x`.
pub fn matvec_sparse_vector<T: Semiring>(
    a: &CsrMatrix<T>,
    x: &CooVector<T>,
) -> SparseResult<DenseVector<T>> {
    ensure_matvec_shapes(a.shape(), &x.shape())?;
    let (xi, xv) = (x.indices(), x.values());
    let data = (0..a.rows())
        .map(|i| {
            let (cols, vals) = a.row(i);
            crate::merge::intersection_join(cols.len(), xi.len(), |p| cols[p], |q| xi[q])
                .into_iter()
                .fold(T::zero(), |acc, (p, q)| acc + vals[p].clone() * xv[q].clone())
        })
        .collect();
    Ok(DenseVector::from_vec(data))
}
