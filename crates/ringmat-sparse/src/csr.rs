//! CSR (Compressed Sparse Row) format for sparse matrices
//!
//! # Format
//!
//! For an `m × n` matrix with `nnz` stored entries:
//! - `row_ptr`: `m + 1` offsets; row `i` occupies `row_ptr[i]..row_ptr[i+1]`
//! - `col_indices`: column of each stored entry, strictly increasing within
//!   a row
//! - `values`: stored entries in the same order
//!
//! # Examples
//!
//! ```
//! use ringmat_sparse::CsrMatrix;
//!
//! // [[1, 0, 2],
//! //  [0, 0, 3],
//! //  [4, 5, 0]]
//! let csr = CsrMatrix::new(
//!     3,
//!     3,
//!     vec![0, 2, 3, 5],
//!     vec![0, 2, 2, 0, 1],
//!     vec![1.0, 2.0, 3.0, 4.0, 5.0],
//! )
//! .unwrap();
//!
//! assert_eq!(csr.nnz(), 5);
//! assert_eq!(csr.row(2), (&[0, 1][..], &[4.0, 5.0][..]));
//! ```
//!
//! # Performance
//!
//! - Row access: O(1) to locate, O(row nnz) to scan
//! - Transpose: O(nnz + n) counting sort
//! - Row swaps: O(entries between the two rows)

use crate::coo::CooMatrix;
use crate::error::{SparseError, SparseResult};
use ringmat_core::{DenseMatrix, Field, Semiring, Shape};

#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T> {
    shape: Shape,
    row_ptr: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<T>,
}

impl<T> CsrMatrix<T> {
    /// Create a CSR matrix from raw arrays.
    ///
    /// # Arguments
    ///
    /// * `rows`, `cols` - matrix dimensions
    /// * `row_ptr` - `rows + 1` non-decreasing offsets from 0 to `nnz`
    /// * `col_indices` - column of each entry, strictly increasing per row
    /// * `values` - stored entries
    ///
    /// # Errors
    ///
    /// Any violation of the layout above.
    pub fn new(
        rows: usize,
        cols: usize,
        row_ptr: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    ) -> SparseResult<Self> {
        if row_ptr.len() != rows + 1 {
            return Err(SparseError::InvalidRowPtr {
                len: row_ptr.len(),
                nrows: rows,
                expected: rows + 1,
            });
        }
        if col_indices.len() != values.len() {
            return Err(SparseError::LengthMismatch {
                indices: col_indices.len(),
                values: values.len(),
            });
        }
        let nnz = values.len();
        let (first, last) = (row_ptr[0], row_ptr[rows]);
        if first != 0 || last != nnz {
            return Err(SparseError::RowPtrBounds { first, last, nnz });
        }
        for (idx, w) in row_ptr.windows(2).enumerate() {
            if w[0] > w[1] {
                return Err(SparseError::RowPtrNotSorted {
                    idx,
                    curr: w[0],
                    next: w[1],
                });
            }
        }

        for row in 0..rows {
            let segment = &col_indices[row_ptr[row]..row_ptr[row + 1]];
            for (offset, &c) in segment.iter().enumerate() {
                let position = row_ptr[row] + offset;
                if c >= cols {
                    return Err(SparseError::IndexOutOfBounds {
                        position,
                        index: vec![row, c],
                        shape: vec![rows, cols],
                    });
                }
                if offset > 0 && segment[offset - 1] >= c {
                    return Err(SparseError::UnsortedColumns { row, position });
                }
            }
        }

        Ok(Self::from_parts_unchecked(
            Shape::matrix(rows, cols),
            row_ptr,
            col_indices,
            values,
        ))
    }

    pub(crate) fn from_parts_unchecked(
        shape: Shape,
        row_ptr: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        debug_assert_eq!(row_ptr.len(), shape.rows() + 1);
        debug_assert_eq!(col_indices.len(), values.len());
        Self {
            shape,
            row_ptr,
            col_indices,
            values,
        }
    }

    /// Matrix with no stored entries.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self::from_parts_unchecked(
            Shape::matrix(rows, cols),
            vec![0; rows + 1],
            Vec::new(),
            Vec::new(),
        )
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

    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Fraction of entries that are stored.
    pub fn density(&self) -> f64 {
        let total = self.shape.total_entries();
        if total == 0 {
            0.0
        } else {
            self.nnz() as f64 / total as f64
        }
    }

    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Column indices and values of row `i`.
    ///
    /// # Panics
    ///
    /// If `i >= rows`.
    #[inline]
    pub fn row(&self, i: usize) -> (&[usize], &[T]) {
        let range = self.row_ptr[i]..self.row_ptr[i + 1];
        (&self.col_indices[range.clone()], &self.values[range])
    }

    pub fn into_parts(self) -> (Shape, Vec<usize>, Vec<usize>, Vec<T>) {
        (self.shape, self.row_ptr, self.col_indices, self.values)
    }

    /// Apply `f` to every stored value, keeping the sparsity pattern.
    pub fn map<U, F>(&self, f: F) -> CsrMatrix<U>
    where
        F: FnMut(&T) -> U,
    {
        CsrMatrix::from_parts_unchecked(
            self.shape.clone(),
            self.row_ptr.clone(),
            self.col_indices.clone(),
            self.values.iter().map(f).collect(),
        )
    }

    /// Swap rows `i` and `j` in place.
    ///
    /// Only the entries between the two rows move: the block from the start
    /// of the first row to the end of the second is rotated so the second
    /// row's entries come first.
    ///
    /// # Errors
    ///
    /// [`SparseError::IndexOutOfBounds`] if either row is out of range.
    pub fn swap_rows(&mut self, i: usize, j: usize) -> SparseResult<()> {
        self.check_axis(i, j, self.rows(), 0)?;
        if i == j {
            return Ok(());
        }
        let (i, j) = (i.min(j), i.max(j));

        let start = self.row_ptr[i];
        let end = self.row_ptr[j + 1];
        let len_i = self.row_ptr[i + 1] - start;
        let len_j = end - self.row_ptr[j];
        let between = self.row_ptr[j] - self.row_ptr[i + 1];

        // [i | between | j] -> [between | j | i] -> [j | between | i]
        let cols = &mut self.col_indices[start..end];
        cols.rotate_left(len_i);
        cols[..between + len_j].rotate_left(between);
        let vals = &mut self.values[start..end];
        vals.rotate_left(len_i);
        vals[..between + len_j].rotate_left(between);

        for r in (i + 1)..=j {
            self.row_ptr[r] = self.row_ptr[r] + len_j - len_i;
        }
        Ok(())
    }

    fn check_axis(&self, i: usize, j: usize, bound: usize, axis: usize) -> SparseResult<()> {
        for idx in [i, j] {
            if idx >= bound {
                let mut index = vec![0, 0];
                index[axis] = idx;
                return Err(SparseError::IndexOutOfBounds {
                    position: 0,
                    index,
                    shape: self.shape.dims().to_vec(),
                });
            }
        }
        Ok(())
    }
}

impl<T: Clone> CsrMatrix<T> {
    /// Swap columns `i` and `j` in place.
    ///
    /// Column labels are exchanged, then any row that held either column is
    /// re-sorted so columns stay strictly increasing.
    ///
    /// # Errors
    ///
    /// [`SparseError::IndexOutOfBounds`] if either column is out of range.
    pub fn swap_cols(&mut self, i: usize, j: usize) -> SparseResult<()> {
        self.check_axis(i, j, self.cols(), 1)?;
        if i == j {
            return Ok(());
        }

        for row in 0..self.rows() {
            let range = self.row_ptr[row]..self.row_ptr[row + 1];
            let mut touched = false;
            for c in &mut self.col_indices[range.clone()] {
                if *c == i {
                    *c = j;
                    touched = true;
                } else if *c == j {
                    *c = i;
                    touched = true;
                }
            }
            if touched {
                let cols = &mut self.col_indices[range.clone()];
                let vals = &mut self.values[range];
                let mut order: Vec<usize> = (0..cols.len()).collect();
                order.sort_unstable_by_key(|&p| cols[p]);
                let sorted_cols: Vec<usize> = order.iter().map(|&p| cols[p]).collect();
                let sorted_vals: Vec<T> = order.iter().map(|&p| vals[p].clone()).collect();
                cols.copy_from_slice(&sorted_cols);
                vals.clone_from_slice(&sorted_vals);
            }
        }
        Ok(())
    }

    /// Transpose by counting sort over columns.
    ///
    /// Rows of the source are visited in order, so each output row comes out
    /// with increasing column indices without a further sort.
    pub fn transpose(&self) -> Self {
        self.transpose_with(T::clone)
    }

    fn transpose_with(&self, f: impl Fn(&T) -> T) -> Self {
        let (m, n) = (self.rows(), self.cols());
        let mut row_ptr = vec![0usize; n + 1];
        for &c in &self.col_indices {
            row_ptr[c + 1] += 1;
        }
        for c in 0..n {
            row_ptr[c + 1] += row_ptr[c];
        }

        // Destination position of every source entry.
        let mut next = row_ptr[..n].to_vec();
        let mut perm = vec![0usize; self.nnz()];
        let mut col_indices = vec![0usize; self.nnz()];
        for r in 0..m {
            for p in self.row_ptr[r]..self.row_ptr[r + 1] {
                let c = self.col_indices[p];
                let dst = next[c];
                next[c] += 1;
                perm[dst] = p;
                col_indices[dst] = r;
            }
        }
        let values = perm.iter().map(|&p| f(&self.values[p])).collect();

        Self::from_parts_unchecked(self.shape.transposed(), row_ptr, col_indices, values)
    }
}

impl<T: Field> CsrMatrix<T> {
    /// Conjugate (Hermitian) transpose.
    pub fn conj_transpose(&self) -> Self {
        self.transpose_with(T::conj)
    }
}

impl<T: Semiring> CsrMatrix<T> {
    pub fn from_coo(coo: &CooMatrix<T>) -> Self {
        coo.to_csr()
    }

    pub fn to_coo(&self) -> CooMatrix<T> {
        let mut rows = Vec::with_capacity(self.nnz());
        for r in 0..self.rows() {
            rows.extend(std::iter::repeat(r).take(self.row_ptr[r + 1] - self.row_ptr[r]));
        }
        CooMatrix::from_sorted_unchecked(
            self.shape.clone(),
            rows,
            self.col_indices.clone(),
            self.values.clone(),
        )
    }

    /// Stored entries of a dense matrix; zeros are skipped.
    pub fn from_dense(dense: &DenseMatrix<T>) -> Self {
        let (m, n) = (dense.rows(), dense.cols());
        let mut row_ptr = Vec::with_capacity(m + 1);
        let mut col_indices = Vec::new();
        let mut values = Vec::new();
        row_ptr.push(0);
        for r in 0..m {
            for (c, v) in dense.row(r).iter().enumerate() {
                if !v.is_zero() {
                    col_indices.push(c);
                    values.push(v.clone());
                }
            }
            row_ptr.push(values.len());
        }
        Self::from_parts_unchecked(Shape::matrix(m, n), row_ptr, col_indices, values)
    }

    pub fn to_dense(&self) -> SparseResult<DenseMatrix<T>> {
        let (m, n) = (self.rows(), self.cols());
        self.shape.total_entries_checked()?;
        let mut data = vec![T::zero(); m * n];
        for r in 0..m {
            let (cols, vals) = self.row(r);
            for (&c, v) in cols.iter().zip(vals) {
                data[r * n + c] = v.clone();
            }
        }
        Ok(DenseMatrix::from_vec(m, n, data)?)
    }
}
