//! Products involving COO matrices and vectors
//!
//! COO entries are sorted by row, so the stored entries feeding any range of
//! output rows form one contiguous run. The concurrent variants split the
//! dense output rows across the pool and each task only reads the run it
//! needs, so no locking is involved.
//!
//! COO × COO goes through CSR, where row access is O(1).

use crate::coo::{CooMatrix, CooVector};
use crate::csr_matmul;
use crate::error::SparseResult;
use ringmat_core::shape::{ensure_matmul_shapes, ensure_matvec_shapes};
use ringmat_core::{DenseMatrix, DenseVector, Semiring};
use ringmat_exec::ExecContext;

fn coo_dense_rows<T: Semiring>(
    a: &CooMatrix<T>,
    b: &DenseMatrix<T>,
    start: usize,
    end: usize,
    rows: &mut [T],
) {
    let k = b.cols();
    let range = a.row_range(start, end);
    let (ri, ci, vals) = (a.row_indices(), a.col_indices(), a.values());
    for p in range {
        let local = ri[p] - start;
        let out = &mut rows[local * k..(local + 1) * k];
        for (o, bv) in out.iter_mut().zip(b.row(ci[p])) {
            *o = o.clone() + vals[p].clone() * bv.clone();
        }
    }
}

/// Sparse `a` times dense `b`.
///
/// # Errors
///
/// [`ShapeError::MatMulMismatch`](ringmat_core::ShapeError::MatMulMismatch)
/// if `a.cols() != b.rows()`.
pub fn coo_dense_matmul<T: Semiring>(
    a: &CooMatrix<T>,
    b: &DenseMatrix<T>,
) -> SparseResult<DenseMatrix<T>> {
    let shape = ensure_matmul_shapes(a.shape(), b.shape())?;
    let mut data = vec![T::zero(); shape.total_entries()];
    coo_dense_rows(a, b, 0, a.rows(), &mut data);
    Ok(DenseMatrix::from_shape_vec(shape, data)?)
}

/// [`coo_dense_matmul`] with output rows split across the pool.
pub fn concurrent_coo_dense_matmul<T: Semiring>(
    ctx: &ExecContext,
    a: &CooMatrix<T>,
    b: &DenseMatrix<T>,
) -> SparseResult<DenseMatrix<T>> {
    let shape = ensure_matmul_shapes(a.shape(), b.shape())?;
    let mut data = vec![T::zero(); shape.total_entries()];
    ctx.pool()
        .concurrent_rows(&mut data, b.cols(), |start, end, rows| {
            coo_dense_rows(a, b, start, end, rows)
        })?;
    Ok(DenseMatrix::from_shape_vec(shape, data)?)
}

fn dense_coo_rows<T: Semiring>(
    a: &DenseMatrix<T>,
    b: &CooMatrix<T>,
    start: usize,
    end: usize,
    rows: &mut [T],
) {
    let k = b.cols();
    for i in start..end {
        let a_row = a.row(i);
        let out = &mut rows[(i - start) * k..(i - start + 1) * k];
        for (r, c, bv) in b.iter() {
            out[c] = out[c].clone() + a_row[r].clone() * bv.clone();
        }
    }
}

/// Dense `a` times sparse `b`.
pub fn dense_coo_matmul<T: Semiring>(
    a: &DenseMatrix<T>,
    b: &CooMatrix<T>,
) -> SparseResult<DenseMatrix<T>> {
    let shape = ensure_matmul_shapes(a.shape(), b.shape())?;
    let mut data = vec![T::zero(); shape.total_entries()];
    dense_coo_rows(a, b, 0, a.rows(), &mut data);
    Ok(DenseMatrix::from_shape_vec(shape, data)?)
}

/// [`dense_coo_matmul`] with output rows split across the pool.
pub fn concurrent_dense_coo_matmul<T: Semiring>(
    ctx: &ExecContext,
    a: &DenseMatrix<T>,
    b: &CooMatrix<T>,
) -> SparseResult<DenseMatrix<T>> {
    let shape = ensure_matmul_shapes(a.shape(), b.shape())?;
    let mut data = vec![T::zero(); shape.total_entries()];
    ctx.pool()
        .concurrent_rows(&mut data, b.cols(), |start, end, rows| {
            dense_coo_rows(a, b, start, end, rows)
        })?;
    Ok(DenseMatrix::from_shape_vec(shape, data)?)
}

/// Sparse matrix times dense vector.
pub fn coo_dense_matvec<T: Semiring>(
    a: &CooMatrix<T>,
    x: &DenseVector<T>,
) -> SparseResult<DenseVector<T>> {
    ensure_matvec_shapes(a.shape(), x.shape())?;
    let mut data = vec![T::zero(); a.rows()];
    for (r, c, v) in a.iter() {
        data[r] = data[r].clone() + v.clone() * x.data()[c].clone();
    }
    Ok(DenseVector::from_vec(data))
}

/// Dense matrix times sparse vector. Only the columns of `a` named by `x`
/// are read.
pub fn dense_coo_matvec<T: Semiring>(
    a: &DenseMatrix<T>,
    x: &CooVector<T>,
) -> SparseResult<DenseVector<T>> {
    ensure_matvec_shapes(a.shape(), &x.shape())?;
    let data = (0..a.rows())
        .map(|i| {
            let row = a.row(i);
            x.iter()
                .fold(T::zero(), |acc, (c, v)| acc + row[c].clone() * v.clone())
        })
        .collect();
    Ok(DenseVector::from_vec(data))
}

/// Sparse `a · b` with a sparse result, computed in CSR.
pub fn coo_coo_matmul<T: Semiring>(a: &CooMatrix<T>, b: &CooMatrix<T>) -> SparseResult<CooMatrix<T>> {
    Ok(csr_matmul::matmul_sparse(&a.to_csr(), &b.to_csr())?.to_coo())
}

/// [`coo_coo_matmul`] with rows split across the pool.
pub fn concurrent_coo_coo_matmul<T: Semiring>(
    ctx: &ExecContext,
    a: &CooMatrix<T>,
    b: &CooMatrix<T>,
) -> SparseResult<CooMatrix<T>> {
    Ok(csr_matmul::concurrent_matmul_sparse(ctx, &a.to_csr(), &b.to_csr())?.to_coo())
}
