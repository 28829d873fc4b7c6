//! Merge-join arithmetic over sorted sparse operands
//!
//! Both operands of every operation here store their entries sorted by key
//! (vector index, `(row, col)` pair, or column within a CSR row). A single
//! linear pass over the two key sequences therefore visits every key once, in
//! order, and the output comes out sorted without a separate sort.
//!
//! - Union ops (`add`, `sub`, [`csr_apply_binary_op`]) keep keys present in
//!   either operand.
//! - Intersection ops (`elem_mult`, `dot`, `inner`) keep keys present in
//!   both.
//!
//! Entries that evaluate to zero stay stored.
//!
//! The `*_dense_*` variants take one dense operand. Their sums and
//! differences are dense; their element-wise products keep the sparse
//! operand's pattern.
//!
//! # Examples
//!
//! ```
//! use ringmat_sparse::{merge, CooVector};
//!
//! let a = CooVector::new(6, vec![0, 3, 5], vec![1, 2, 3]).unwrap();
//! let b = CooVector::new(6, vec![1, 3], vec![10, 20]).unwrap();
//!
//! let sum = merge::vec_add(&a, &b).unwrap();
//! assert_eq!(sum.indices(), &[0, 1, 3, 5]);
//! assert_eq!(sum.values(), &[1, 10, 22, 3]);
//!
//! assert_eq!(merge::vec_dot(&a, &b).unwrap(), 40);
//! ```

use crate::coo::{CooMatrix, CooVector};
use crate::csr::CsrMatrix;
use crate::error::SparseResult;
use ringmat_core::shape::ensure_equal_shapes;
use ringmat_core::{DenseMatrix, DenseVector, Field, Ring, Semiring, Shape};
use std::cmp::Ordering;

/// One step of a union merge: which operand(s) hold the current key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Joined {
    Left(usize),
    Right(usize),
    Both(usize, usize),
}

/// Walk two sorted key sequences and report every key in either.
pub(crate) fn union_join<K: Ord>(
    left: usize,
    right: usize,
    key_l: impl Fn(usize) -> K,
    key_r: impl Fn(usize) -> K,
) -> Vec<Joined> {
    let mut out = Vec::with_capacity(left + right);
    let (mut i, mut j) = (0, 0);
    while i < left && j < right {
        match key_l(i).cmp(&key_r(j)) {
            Ordering::Equal => {
                out.push(Joined::Both(i, j));
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                out.push(Joined::Left(i));
                i += 1;
            }
            Ordering::Greater => {
                out.push(Joined::Right(j));
                j += 1;
            }
        }
    }
    out.extend((i..left).map(Joined::Left));
    out.extend((j..right).map(Joined::Right));
    out
}

/// Walk two sorted key sequences and report the position pairs sharing a key.
pub(crate) fn intersection_join<K: Ord>(
    left: usize,
    right: usize,
    key_l: impl Fn(usize) -> K,
    key_r: impl Fn(usize) -> K,
) -> Vec<(usize, usize)> {
    let mut out = Vec::with_capacity(left.min(right));
    let (mut i, mut j) = (0, 0);
    while i < left && j < right {
        match key_l(i).cmp(&key_r(j)) {
            Ordering::Equal => {
                out.push((i, j));
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }
    out
}

// ============================================================================
// COO vectors
// ============================================================================

fn vec_union<T: Clone>(
    a: &CooVector<T>,
    b: &CooVector<T>,
    left: impl Fn(&T) -> T,
    right: impl Fn(&T) -> T,
    both: impl Fn(&T, &T) -> T,
) -> SparseResult<CooVector<T>> {
    ensure_equal_shapes(&a.shape(), &b.shape())?;
    let (ia, ib) = (a.indices(), b.indices());
    let (va, vb) = (a.values(), b.values());
    let steps = union_join(ia.len(), ib.len(), |p| ia[p], |p| ib[p]);

    let mut indices = Vec::with_capacity(steps.len());
    let mut values = Vec::with_capacity(steps.len());
    for step in steps {
        let (idx, v) = match step {
            Joined::Left(p) => (ia[p], left(&va[p])),
            Joined::Right(q) => (ib[q], right(&vb[q])),
            Joined::Both(p, q) => (ia[p], both(&va[p], &vb[q])),
        };
        indices.push(idx);
        values.push(v);
    }
    Ok(CooVector::from_sorted_unchecked(a.size(), indices, values))
}

/// Element-wise sum.
///
/// # Errors
///
/// [`ShapeError::ShapeMismatch`](ringmat_core::ShapeError::ShapeMismatch) if
/// the vector sizes differ.
pub fn vec_add<T: Semiring>(a: &CooVector<T>, b: &CooVector<T>) -> SparseResult<CooVector<T>> {
    vec_union(a, b, T::clone, T::clone, |x, y| x.clone() + y.clone())
}

/// Element-wise difference. Entries found only in `b` are negated.
pub fn vec_sub<T: Ring>(a: &CooVector<T>, b: &CooVector<T>) -> SparseResult<CooVector<T>> {
    vec_union(a, b, T::clone, |y| -y.clone(), |x, y| x.clone() - y.clone())
}

/// Element-wise product over the shared indices.
pub fn vec_elem_mult<T: Semiring>(a: &CooVector<T>, b: &CooVector<T>) -> SparseResult<CooVector<T>> {
    ensure_equal_shapes(&a.shape(), &b.shape())?;
    let (ia, ib) = (a.indices(), b.indices());
    let pairs = intersection_join(ia.len(), ib.len(), |p| ia[p], |p| ib[p]);
    let indices = pairs.iter().map(|&(p, _)| ia[p]).collect();
    let values = pairs
        .iter()
        .map(|&(p, q)| a.values()[p].clone() * b.values()[q].clone())
        .collect();
    Ok(CooVector::from_sorted_unchecked(a.size(), indices, values))
}

fn vec_reduce<T: Semiring>(
    a: &CooVector<T>,
    b: &CooVector<T>,
    second: impl Fn(&T) -> T,
) -> SparseResult<T> {
    ensure_equal_shapes(&a.shape(), &b.shape())?;
    let (ia, ib) = (a.indices(), b.indices());
    let pairs = intersection_join(ia.len(), ib.len(), |p| ia[p], |p| ib[p]);
    Ok(pairs.into_iter().fold(T::zero(), |acc, (p, q)| {
        acc + a.values()[p].clone() * second(&b.values()[q])
    }))
}

/// Dot product `Σ a[i]·b[i]`.
pub fn vec_dot<T: Semiring>(a: &CooVector<T>, b: &CooVector<T>) -> SparseResult<T> {
    vec_reduce(a, b, T::clone)
}

/// Inner product `Σ a[i]·conj(b[i])`.
pub fn vec_inner<T: Field>(a: &CooVector<T>, b: &CooVector<T>) -> SparseResult<T> {
    vec_reduce(a, b, T::conj)
}

/// Outer product `a · bᵀ` as a dense `a.size() × b.size()` matrix.
///
/// # Errors
///
/// [`ShapeError::TooLarge`](ringmat_core::ShapeError::TooLarge) if the dense
/// result cannot be addressed.
pub fn vec_outer<T: Semiring>(a: &CooVector<T>, b: &CooVector<T>) -> SparseResult<DenseMatrix<T>> {
    let shape = Shape::matrix(a.size(), b.size());
    let n = b.size();
    let mut data = vec![T::zero(); shape.total_entries_checked()?];
    for (i, x) in a.iter() {
        for (j, y) in b.iter() {
            data[i * n + j] = x.clone() * y.clone();
        }
    }
    Ok(DenseMatrix::from_shape_vec(shape, data)?)
}

pub fn vec_negate<T: Ring>(a: &CooVector<T>) -> CooVector<T> {
    let values = a.values().iter().map(|v| -v.clone()).collect();
    CooVector::from_sorted_unchecked(a.size(), a.indices().to_vec(), values)
}

// ============================================================================
// COO matrices
// ============================================================================

fn coo_union<T: Clone>(
    a: &CooMatrix<T>,
    b: &CooMatrix<T>,
    right: impl Fn(&T) -> T,
    both: impl Fn(&T, &T) -> T,
) -> SparseResult<CooMatrix<T>> {
    ensure_equal_shapes(a.shape(), b.shape())?;
    let (ra, ca, va) = (a.row_indices(), a.col_indices(), a.values());
    let (rb, cb, vb) = (b.row_indices(), b.col_indices(), b.values());
    let steps = union_join(va.len(), vb.len(), |p| (ra[p], ca[p]), |q| (rb[q], cb[q]));

    let mut rows = Vec::with_capacity(steps.len());
    let mut cols = Vec::with_capacity(steps.len());
    let mut values = Vec::with_capacity(steps.len());
    for step in steps {
        let (r, c, v) = match step {
            Joined::Left(p) => (ra[p], ca[p], va[p].clone()),
            Joined::Right(q) => (rb[q], cb[q], right(&vb[q])),
            Joined::Both(p, q) => (ra[p], ca[p], both(&va[p], &vb[q])),
        };
        rows.push(r);
        cols.push(c);
        values.push(v);
    }
    Ok(CooMatrix::from_sorted_unchecked(a.shape().clone(), rows, cols, values))
}

/// Element-wise sum of two COO matrices.
pub fn coo_add<T: Semiring>(a: &CooMatrix<T>, b: &CooMatrix<T>) -> SparseResult<CooMatrix<T>> {
    coo_union(a, b, T::clone, |x, y| x.clone() + y.clone())
}

/// Element-wise difference. Entries found only in `b` are negated.
pub fn coo_sub<T: Ring>(a: &CooMatrix<T>, b: &CooMatrix<T>) -> SparseResult<CooMatrix<T>> {
    coo_union(a, b, |y| -y.clone(), |x, y| x.clone() - y.clone())
}

/// Element-wise product over the shared coordinates.
pub fn coo_elem_mult<T: Semiring>(a: &CooMatrix<T>, b: &CooMatrix<T>) -> SparseResult<CooMatrix<T>> {
    ensure_equal_shapes(a.shape(), b.shape())?;
    let (ra, ca) = (a.row_indices(), a.col_indices());
    let (rb, cb) = (b.row_indices(), b.col_indices());
    let pairs = intersection_join(ra.len(), rb.len(), |p| (ra[p], ca[p]), |q| (rb[q], cb[q]));

    let rows = pairs.iter().map(|&(p, _)| ra[p]).collect();
    let cols = pairs.iter().map(|&(p, _)| ca[p]).collect();
    let values = pairs
        .iter()
        .map(|&(p, q)| a.values()[p].clone() * b.values()[q].clone())
        .collect();
    Ok(CooMatrix::from_sorted_unchecked(a.shape().clone(), rows, cols, values))
}

pub fn coo_negate<T: Ring>(a: &CooMatrix<T>) -> CooMatrix<T> {
    let values = a.values().iter().map(|v| -v.clone()).collect();
    CooMatrix::from_sorted_unchecked(
        a.shape().clone(),
        a.row_indices().to_vec(),
        a.col_indices().to_vec(),
        values,
    )
}

// ============================================================================
// CSR matrices
// ============================================================================

/// Row-by-row union merge of two CSR matrices.
///
/// # Arguments
///
/// * `op` - combines entries stored in both operands
/// * `unary` - if given, applied to every entry taken from `b` before it is
///   stored or passed to `op`
///
/// # Errors
///
/// [`ShapeError::ShapeMismatch`](ringmat_core::ShapeError::ShapeMismatch) if
/// the shapes differ.
pub fn csr_apply_binary_op<T: Clone>(
    a: &CsrMatrix<T>,
    b: &CsrMatrix<T>,
    op: impl Fn(&T, &T) -> T,
    unary: Option<&dyn Fn(&T) -> T>,
) -> SparseResult<CsrMatrix<T>> {
    ensure_equal_shapes(a.shape(), b.shape())?;
    let second = |v: &T| match unary {
        Some(f) => f(v),
        None => v.clone(),
    };

    let mut row_ptr = Vec::with_capacity(a.rows() + 1);
    let mut col_indices = Vec::with_capacity(a.nnz() + b.nnz());
    let mut values = Vec::with_capacity(a.nnz() + b.nnz());
    row_ptr.push(0);

    for r in 0..a.rows() {
        let (ca, va) = a.row(r);
        let (cb, vb) = b.row(r);
        for step in union_join(ca.len(), cb.len(), |p| ca[p], |q| cb[q]) {
            match step {
                Joined::Left(p) => {
                    col_indices.push(ca[p]);
                    values.push(va[p].clone());
                }
                Joined::Right(q) => {
                    col_indices.push(cb[q]);
                    values.push(second(&vb[q]));
                }
                Joined::Both(p, q) => {
                    col_indices.push(ca[p]);
                    values.push(op(&va[p], &second(&vb[q])));
                }
            }
        }
        row_ptr.push(values.len());
    }

    Ok(CsrMatrix::from_parts_unchecked(
        a.shape().clone(),
        row_ptr,
        col_indices,
        values,
    ))
}

pub fn csr_add<T: Semiring>(a: &CsrMatrix<T>, b: &CsrMatrix<T>) -> SparseResult<CsrMatrix<T>> {
    csr_apply_binary_op(a, b, |x, y| x.clone() + y.clone(), None)
}

/// `a - b`, computed as `a + (-b)` with the negation applied to `b` only.
pub fn csr_sub<T: Ring>(a: &CsrMatrix<T>, b: &CsrMatrix<T>) -> SparseResult<CsrMatrix<T>> {
    let negate = |y: &T| -y.clone();
    csr_apply_binary_op(a, b, |x, y| x.clone() + y.clone(), Some(&negate))
}

/// Element-wise product; only columns stored in both rows survive.
pub fn csr_elem_mult<T: Semiring>(a: &CsrMatrix<T>, b: &CsrMatrix<T>) -> SparseResult<CsrMatrix<T>> {
    ensure_equal_shapes(a.shape(), b.shape())?;
    let mut row_ptr = Vec::with_capacity(a.rows() + 1);
    let mut col_indices = Vec::new();
    let mut values = Vec::new();
    row_ptr.push(0);

    for r in 0..a.rows() {
        let (ca, va) = a.row(r);
        let (cb, vb) = b.row(r);
        for (p, q) in intersection_join(ca.len(), cb.len(), |p| ca[p], |q| cb[q]) {
            col_indices.push(ca[p]);
            values.push(va[p].clone() * vb[q].clone());
        }
        row_ptr.push(values.len());
    }

    Ok(CsrMatrix::from_parts_unchecked(
        a.shape().clone(),
        row_ptr,
        col_indices,
        values,
    ))
}

// ============================================================================
// Mixed sparse/dense
// ============================================================================

fn csr_flat<T>(a: &CsrMatrix<T>) -> impl Iterator<Item = (usize, &T)> + '_ {
    let n = a.cols();
    (0..a.rows()).flat_map(move |r| {
        let (cols, vals) = a.row(r);
        cols.iter().zip(vals).map(move |(&c, v)| (r * n + c, v))
    })
}

fn coo_flat<T>(a: &CooMatrix<T>) -> impl Iterator<Item = (usize, &T)> + '_ {
    let n = a.cols();
    a.iter().map(move |(r, c, v)| (r * n + c, v))
}

/// Fold sparse `(flat index, value)` entries into dense storage.
fn scatter<'a, T: 'a>(
    mut dest: Vec<T>,
    entries: impl Iterator<Item = (usize, &'a T)>,
    op: impl Fn(&T, &T) -> T,
) -> Vec<T> {
    for (idx, v) in entries {
        dest[idx] = op(&dest[idx], v);
    }
    dest
}

fn gather<'a, T: Semiring + 'a>(dense: &[T], entries: impl Iterator<Item = (usize, &'a T)>) -> Vec<T> {
    entries.map(|(idx, v)| v.clone() * dense[idx].clone()).collect()
}

/// `a + b` with a dense result.
///
/// # Errors
///
/// [`ShapeError::ShapeMismatch`](ringmat_core::ShapeError::ShapeMismatch) if
/// the shapes differ.
///
/// # Examples
///
/// ```
/// use ringmat_core::DenseMatrix;
/// use ringmat_sparse::{merge, CsrMatrix};
///
/// let a = CsrMatrix::new(2, 2, vec![0, 1, 1], vec![1], vec![5]).unwrap();
/// let b = DenseMatrix::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
/// assert_eq!(merge::csr_dense_add(&a, &b).unwrap().data(), &[1, 7, 3, 4]);
/// ```
pub fn csr_dense_add<T: Semiring>(a: &CsrMatrix<T>, b: &DenseMatrix<T>) -> SparseResult<DenseMatrix<T>> {
    ensure_equal_shapes(a.shape(), b.shape())?;
    let data = scatter(b.data().to_vec(), csr_flat(a), |d, s| s.clone() + d.clone());
    Ok(DenseMatrix::from_shape_vec(a.shape().clone(), data)?)
}

/// `a - b` with a dense result.
pub fn csr_dense_sub<T: Ring>(a: &CsrMatrix<T>, b: &DenseMatrix<T>) -> SparseResult<DenseMatrix<T>> {
    ensure_equal_shapes(a.shape(), b.shape())?;
    let negated = b.data().iter().map(|v| -v.clone()).collect();
    let data = scatter(negated, csr_flat(a), |d, s| s.clone() + d.clone());
    Ok(DenseMatrix::from_shape_vec(a.shape().clone(), data)?)
}

/// `a - b` for dense `a` and CSR `b`.
pub fn dense_csr_sub<T: Ring>(a: &DenseMatrix<T>, b: &CsrMatrix<T>) -> SparseResult<DenseMatrix<T>> {
    ensure_equal_shapes(a.shape(), b.shape())?;
    let data = scatter(a.data().to_vec(), csr_flat(b), |d, s| d.clone() - s.clone());
    Ok(DenseMatrix::from_shape_vec(a.shape().clone(), data)?)
}

/// Element-wise product on the sparsity pattern of `a`.
///
/// Stored entries whose dense counterpart is zero stay stored.
pub fn csr_dense_elem_mult<T: Semiring>(a: &CsrMatrix<T>, b: &DenseMatrix<T>) -> SparseResult<CsrMatrix<T>> {
    ensure_equal_shapes(a.shape(), b.shape())?;
    let values = gather(b.data(), csr_flat(a));
    Ok(CsrMatrix::from_parts_unchecked(
        a.shape().clone(),
        a.row_ptr().to_vec(),
        a.col_indices().to_vec(),
        values,
    ))
}

pub fn coo_dense_add<T: Semiring>(a: &CooMatrix<T>, b: &DenseMatrix<T>) -> SparseResult<DenseMatrix<T>> {
    ensure_equal_shapes(a.shape(), b.shape())?;
    let data = scatter(b.data().to_vec(), coo_flat(a), |d, s| s.clone() + d.clone());
    Ok(DenseMatrix::from_shape_vec(a.shape().clone(), data)?)
}

pub fn coo_dense_sub<T: Ring>(a: &CooMatrix<T>, b: &DenseMatrix<T>) -> SparseResult<DenseMatrix<T>> {
    ensure_equal_shapes(a.shape(), b.shape())?;
    let negated = b.data().iter().map(|v| -v.clone()).collect();
    let data = scatter(negated, coo_flat(a), |d, s| s.clone() + d.clone());
    Ok(DenseMatrix::from_shape_vec(a.shape().clone(), data)?)
}

pub fn dense_coo_sub<T: Ring>(a: &DenseMatrix<T>, b: &CooMatrix<T>) -> SparseResult<DenseMatrix<T>> {
    ensure_equal_shapes(a.shape(), b.shape())?;
    let data = scatter(a.data().to_vec(), coo_flat(b), |d, s| d.clone() - s.clone());
    Ok(DenseMatrix::from_shape_vec(a.shape().clone(), data)?)
}

/// Element-wise product on the coordinates stored in `a`.
pub fn coo_dense_elem_mult<T: Semiring>(a: &CooMatrix<T>, b: &DenseMatrix<T>) -> SparseResult<CooMatrix<T>> {
    ensure_equal_shapes(a.shape(), b.shape())?;
    let values = gather(b.data(), coo_flat(a));
    Ok(CooMatrix::from_sorted_unchecked(
        a.shape().clone(),
        a.row_indices().to_vec(),
        a.col_indices().to_vec(),
        values,
    ))
}

pub fn vec_dense_add<T: Semiring>(a: &CooVector<T>, b: &DenseVector<T>) -> SparseResult<DenseVector<T>> {
    ensure_equal_shapes(&a.shape(), b.shape())?;
    let data = scatter(b.data().to_vec(), a.iter(), |d, s| s.clone() + d.clone());
    Ok(DenseVector::from_vec(data))
}

pub fn vec_dense_sub<T: Ring>(a: &CooVector<T>, b: &DenseVector<T>) -> SparseResult<DenseVector<T>> {
    ensure_equal_shapes(&a.shape(), b.shape())?;
    let negated = b.data().iter().map(|v| -v.clone()).collect();
    let data = scatter(negated, a.iter(), |d, s| s.clone() + d.clone());
    Ok(DenseVector::from_vec(data))
}

pub fn dense_vec_sub<T: Ring>(a: &DenseVector<T>, b: &CooVector<T>) -> SparseResult<DenseVector<T>> {
    ensure_equal_shapes(a.shape(), &b.shape())?;
    let data = scatter(a.data().to_vec(), b.iter(), |d, s| d.clone() - s.clone());
    Ok(DenseVector::from_vec(data))
}

/// Element-wise product on the indices stored in `a`.
pub fn vec_dense_elem_mult<T: Semiring>(a: &CooVector<T>, b: &DenseVector<T>) -> SparseResult<CooVector<T>> {
    ensure_equal_shapes(&a.shape(), b.shape())?;
    let values = gather(b.data(), a.iter());
    Ok(CooVector::from_sorted_unchecked(a.size(), a.indices().to_vec(), values))
}
