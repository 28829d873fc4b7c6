//! COO (Coordinate) format for sparse matrices and vectors
//!
//! # Format
//!
//! A COO matrix stores one `(row, col, value)` triplet per stored entry in
//! three parallel arrays. ringmat separates two stages:
//!
//! - [`CooTriplets`]: an unsorted builder that accepts entries in any order,
//!   duplicates included
//! - [`CooMatrix`]: entries sorted lexicographically by `(row, col)` with no
//!   duplicates
//!
//! Every merge-join and product in this crate requires the sorted form, and
//! a [`CooMatrix`] can only be obtained through a validating constructor or
//! [`CooTriplets::into_sorted`], so unsorted input can never reach them.
//!
//! [`CooVector`] is the rank-1 counterpart: strictly increasing indices.
//!
//! # Examples
//!
//! ```
//! use ringmat_sparse::coo::CooTriplets;
//!
//! let mut t = CooTriplets::new(3, 3);
//! t.push(2, 0, 1.0).unwrap();
//! t.push(0, 1, 2.0).unwrap();
//! t.push(2, 0, 4.0).unwrap(); // duplicate, summed
//!
//! let coo = t.into_sorted();
//! assert_eq!(coo.row_indices(), &[0, 2]);
//! assert_eq!(coo.col_indices(), &[1, 0]);
//! assert_eq!(coo.values(), &[2.0, 5.0]);
//! ```

use crate::csr::CsrMatrix;
use crate::error::{SparseError, SparseResult};
use ringmat_core::{DenseMatrix, DenseVector, Semiring, Shape};

/// Unsorted COO builder.
#[derive(Debug, Clone, PartialEq)]
pub struct CooTriplets<T> {
    shape: Shape,
    row_indices: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<T>,
}

impl<T> CooTriplets<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            shape: Shape::matrix(rows, cols),
            row_indices: Vec::new(),
            col_indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Wrap existing triplet arrays in any order.
    ///
    /// # Errors
    ///
    /// Length mismatch between the arrays, or an index outside the shape.
    pub fn from_vecs(
        rows: usize,
        cols: usize,
        row_indices: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    ) -> SparseResult<Self> {
        check_lengths(&row_indices, &col_indices, &values)?;
        let shape = Shape::matrix(rows, cols);
        for (p, (&r, &c)) in row_indices.iter().zip(&col_indices).enumerate() {
            check_bounds(p, r, c, &shape)?;
        }
        Ok(Self {
            shape,
            row_indices,
            col_indices,
            values,
        })
    }

    /// Append one entry.
    pub fn push(&mut self, row: usize, col: usize, value: T) -> SparseResult<()> {
        check_bounds(self.values.len(), row, col, &self.shape)?;
        self.row_indices.push(row);
        self.col_indices.push(col);
        self.values.push(value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

impl<T: Semiring> CooTriplets<T> {
    /// Sort lexicographically and sum duplicate coordinates.
    pub fn into_sorted(self) -> CooMatrix<T> {
        self.sort_and_coalesce(false)
    }

    /// Like [`CooTriplets::into_sorted`], also dropping entries that are
    /// zero after coalescing.
    pub fn into_sorted_dropping_zeros(self) -> CooMatrix<T> {
        self.sort_and_coalesce(true)
    }

    fn sort_and_coalesce(self, drop_zeros: bool) -> CooMatrix<T> {
        let mut order: Vec<usize> = (0..self.values.len()).collect();
        order.sort_by_key(|&p| (self.row_indices[p], self.col_indices[p]));

        let mut rows: Vec<usize> = Vec::with_capacity(order.len());
        let mut cols: Vec<usize> = Vec::with_capacity(order.len());
        let mut values: Vec<T> = Vec::with_capacity(order.len());

        for p in order {
            let (r, c) = (self.row_indices[p], self.col_indices[p]);
            let v = self.values[p].clone();
            match (rows.last(), cols.last(), values.last_mut()) {
                (Some(&lr), Some(&lc), Some(last)) if lr == r && lc == c => {
                    *last = last.clone() + v;
                }
                _ => {
                    rows.push(r);
                    cols.push(c);
                    values.push(v);
                }
            }
        }

        if drop_zeros {
            let mut keep = 0;
            for p in 0..values.len() {
                if !values[p].is_zero() {
                    rows.swap(keep, p);
                    cols.swap(keep, p);
                    values.swap(keep, p);
                    keep += 1;
                }
            }
            rows.truncate(keep);
            cols.truncate(keep);
            values.truncate(keep);
        }

        CooMatrix::from_sorted_unchecked(self.shape, rows, cols, values)
    }
}

/// COO matrix with entries sorted by `(row, col)` and no duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct CooMatrix<T> {
    shape: Shape,
    row_indices: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<T>,
}

impl<T> CooMatrix<T> {
    /// Create a COO matrix from arrays that are already sorted.
    ///
    /// # Errors
    ///
    /// - [`SparseError::LengthMismatch`] if the three arrays differ in length
    /// - [`SparseError::IndexOutOfBounds`] for an index outside the shape
    /// - [`SparseError::Unsorted`] or [`SparseError::Duplicate`] if the
    ///   coordinates are not strictly increasing in `(row, col)` order
    pub fn new(
        rows: usize,
        cols: usize,
        row_indices: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    ) -> SparseResult<Self> {
        check_lengths(&row_indices, &col_indices, &values)?;
        let shape = Shape::matrix(rows, cols);
        let mut prev: Option<(usize, usize)> = None;
        for (p, (&r, &c)) in row_indices.iter().zip(&col_indices).enumerate() {
            check_bounds(p, r, c, &shape)?;
            if let Some(prev) = prev {
                if (r, c) == prev {
                    return Err(SparseError::Duplicate { position: p });
                }
                if (r, c) < prev {
                    return Err(SparseError::Unsorted { position: p });
                }
            }
            prev = Some((r, c));
        }
        Ok(Self::from_sorted_unchecked(shape, row_indices, col_indices, values))
    }

    /// Matrix with no stored entries.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self::from_sorted_unchecked(Shape::matrix(rows, cols), Vec::new(), Vec::new(), Vec::new())
    }

    pub(crate) fn from_sorted_unchecked(
        shape: Shape,
        row_indices: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        debug_assert_eq!(row_indices.len(), values.len());
        debug_assert_eq!(col_indices.len(), values.len());
        Self {
            shape,
            row_indices,
            col_indices,
            values,
        }
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.shape.rows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.shape.cols()
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Iterate `(row, col, value)` in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        self.row_indices
            .iter()
            .zip(&self.col_indices)
            .zip(&self.values)
            .map(|((&r, &c), v)| (r, c, v))
    }

    /// Range of stored positions belonging to rows `start..end`.
    pub(crate) fn row_range(&self, start: usize, end: usize) -> std::ops::Range<usize> {
        let lo = self.row_indices.partition_point(|&r| r < start);
        let hi = self.row_indices.partition_point(|&r| r < end);
        lo..hi
    }

    pub fn into_parts(self) -> (Shape, Vec<usize>, Vec<usize>, Vec<T>) {
        (self.shape, self.row_indices, self.col_indices, self.values)
    }

    /// Apply `f` to every stored value; the coordinates are unchanged.
    pub fn map<U, F>(&self, f: F) -> CooMatrix<U>
    where
        F: FnMut(&T) -> U,
    {
        CooMatrix::from_sorted_unchecked(
            self.shape.clone(),
            self.row_indices.clone(),
            self.col_indices.clone(),
            self.values.iter().map(f).collect(),
        )
    }
}

impl<T: Semiring> CooMatrix<T> {
    /// Stored entries of a dense matrix; zeros are skipped.
    pub fn from_dense(dense: &DenseMatrix<T>) -> Self {
        let cols = dense.cols();
        let mut rows_idx = Vec::new();
        let mut cols_idx = Vec::new();
        let mut values = Vec::new();
        for (p, v) in dense.data().iter().enumerate() {
            if !v.is_zero() {
                rows_idx.push(p / cols);
                cols_idx.push(p % cols);
                values.push(v.clone());
            }
        }
        Self::from_sorted_unchecked(dense.shape().clone(), rows_idx, cols_idx, values)
    }

    pub fn to_dense(&self) -> SparseResult<DenseMatrix<T>> {
        let (m, n) = (self.rows(), self.cols());
        self.shape.total_entries_checked()?;
        let mut data = vec![T::zero(); m * n];
        for (r, c, v) in self.iter() {
            data[r * n + c] = v.clone();
        }
        Ok(DenseMatrix::from_vec(m, n, data)?)
    }

    /// Convert to CSR. Entries are already in row order, so this is a single
    /// counting pass.
    pub fn to_csr(&self) -> CsrMatrix<T> {
        let mut row_ptr = vec![0usize; self.rows() + 1];
        for &r in &self.row_indices {
            row_ptr[r + 1] += 1;
        }
        for i in 0..self.rows() {
            row_ptr[i + 1] += row_ptr[i];
        }
        CsrMatrix::from_parts_unchecked(
            self.shape.clone(),
            row_ptr,
            self.col_indices.clone(),
            self.values.clone(),
        )
    }

    /// Transpose, re-sorted into `(row, col)` order.
    pub fn transpose(&self) -> Self {
        let mut order: Vec<usize> = (0..self.nnz()).collect();
        order.sort_by_key(|&p| (self.col_indices[p], self.row_indices[p]));
        let rows = order.iter().map(|&p| self.col_indices[p]).collect();
        let cols = order.iter().map(|&p| self.row_indices[p]).collect();
        let values = order.iter().map(|&p| self.values[p].clone()).collect();
        Self::from_sorted_unchecked(self.shape.transposed(), rows, cols, values)
    }
}

/// Sparse vector with strictly increasing indices.
#[derive(Debug, Clone, PartialEq)]
pub struct CooVector<T> {
    size: usize,
    indices: Vec<usize>,
    values: Vec<T>,
}

impl<T> CooVector<T> {
    /// # Errors
    ///
    /// Length mismatch, an index `>= size`, or indices that are not
    /// strictly increasing.
    pub fn new(size: usize, indices: Vec<usize>, values: Vec<T>) -> SparseResult<Self> {
        if indices.len() != values.len() {
            return Err(SparseError::LengthMismatch {
                indices: indices.len(),
                values: values.len(),
            });
        }
        for (p, &i) in indices.iter().enumerate() {
            if i >= size {
                return Err(SparseError::IndexOutOfBounds {
                    position: p,
                    index: vec![i],
                    shape: vec![size],
                });
            }
            if p > 0 {
                let prev = indices[p - 1];
                if i == prev {
                    return Err(SparseError::Duplicate { position: p });
                }
                if i < prev {
                    return Err(SparseError::Unsorted { position: p });
                }
            }
        }
        Ok(Self {
            size,
            indices,
            values,
        })
    }

    pub(crate) fn from_sorted_unchecked(size: usize, indices: Vec<usize>, values: Vec<T>) -> Self {
        Self {
            size,
            indices,
            values,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn shape(&self) -> Shape {
        Shape::vector(self.size)
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.indices.iter().copied().zip(&self.values)
    }

    pub fn map<U, F>(&self, f: F) -> CooVector<U>
    where
        F: FnMut(&T) -> U,
    {
        CooVector::from_sorted_unchecked(self.size, self.indices.clone(), self.values.iter().map(f).collect())
    }
}

impl<T: Semiring> CooVector<T> {
    pub fn from_dense(dense: &[T]) -> Self {
        let (indices, values) = dense
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_zero())
            .map(|(i, v)| (i, v.clone()))
            .unzip();
        Self::from_sorted_unchecked(dense.len(), indices, values)
    }

    pub fn to_dense(&self) -> DenseVector<T> {
        let mut data = vec![T::zero(); self.size];
        for (i, v) in self.iter() {
            data[i] = v.clone();
        }
        DenseVector::from_vec(data)
    }
}

fn check_lengths<T>(rows: &[usize], cols: &[usize], values: &[T]) -> SparseResult<()> {
    if rows.len() != values.len() || cols.len() != values.len() {
        return Err(SparseError::LengthMismatch {
            indices: rows.len().max(cols.len()),
            values: values.len(),
        });
    }
    Ok(())
}

fn check_bounds(position: usize, row: usize, col: usize, shape: &Shape) -> SparseResult<()> {
    if row >= shape.rows() || col >= shape.cols() {
        return Err(SparseError::IndexOutOfBounds {
            position,
            index: vec![row, col],
            shape: shape.dims().to_vec(),
        });
    }
    Ok(())
}
