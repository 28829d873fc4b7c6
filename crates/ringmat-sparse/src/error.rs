//! Error types for sparse formats and operations
//!
//! Construction from raw arrays is the only place sparse structure can go
//! wrong, so most variants describe a broken invariant of the input arrays.
//! Dimension problems reuse [`ShapeError`] and pool failures reuse
//! [`ExecError`].
//!
//! # Examples
//!
//! ```
//! use ringmat_sparse::{CooMatrix, SparseError};
//!
//! // (1, 0) comes before (0, 1): not lexicographically sorted
//! let err = CooMatrix::new(2, 2, vec![1, 0], vec![0, 1], vec![1.0, 2.0]).unwrap_err();
//! assert_eq!(err, SparseError::Unsorted { position: 1 });
//! ```

use ringmat_core::ShapeError;
use ringmat_exec::ExecError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SparseError {
    #[error("Indices and values must have same length: {indices} indices vs {values} values")]
    LengthMismatch { indices: usize, values: usize },

    #[error("Index out of bounds at position {position}: {index:?} exceeds shape {shape:?}")]
    IndexOutOfBounds {
        position: usize,
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    #[error("Indices not sorted at position {position}")]
    Unsorted { position: usize },

    #[error("Duplicate index at position {position}")]
    Duplicate { position: usize },

    #[error("Invalid row pointers: length {len} for {nrows} rows (expected {expected})")]
    InvalidRowPtr {
        len: usize,
        nrows: usize,
        expected: usize,
    },

    #[error("Row pointer not sorted at index {idx}: {curr} > {next}")]
    RowPtrNotSorted { idx: usize, curr: usize, next: usize },

    #[error("Row pointers must start at 0 and end at nnz = {nnz}, got [{first}, .., {last}]")]
    RowPtrBounds {
        first: usize,
        last: usize,
        nnz: usize,
    },

    #[error("Column indices of row {row} not strictly increasing at position {position}")]
    UnsortedColumns { row: usize, position: usize },

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

pub type SparseResult<T> = Result<T, SparseError>;
