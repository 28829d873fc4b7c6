//! Error types shared by every ringmat crate
//!
//! Shape problems are the only failures the core layer can produce. They are
//! raised synchronously at validation time and are never retried: the caller
//! has to fix its inputs.
//!
//! # Examples
//!
//! ```
//! use ringmat_core::{Shape, ShapeError};
//! use ringmat_core::shape::ensure_matmul_shapes;
//!
//! let a = Shape::matrix(2, 3);
//! let b = Shape::matrix(4, 5);
//!
//! let err = ensure_matmul_shapes(&a, &b).unwrap_err();
//! assert!(matches!(err, ShapeError::MatMulMismatch { .. }));
//! ```

use thiserror::Error;

/// Shape and dimension errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("Matrix multiplication dimension mismatch: ({m1}×{n1}) × ({m2}×{n2})")]
    MatMulMismatch {
        m1: usize,
        n1: usize,
        m2: usize,
        n2: usize,
    },

    #[error("Matrix-vector multiplication dimension mismatch: ({m}×{n}) × ({v},)")]
    MatVecMismatch { m: usize, n: usize, v: usize },

    #[error("Matrix multiply-transpose dimension mismatch: ({m1}×{n1}) × ({m2}×{n2})ᵀ")]
    TransposeMismatch {
        m1: usize,
        n1: usize,
        m2: usize,
        n2: usize,
    },

    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Rank mismatch: expected rank {expected}, got {got}")]
    RankMismatch { expected: usize, got: usize },

    #[error("Length mismatch: shape {shape:?} requires {expected} entries but {got} were given")]
    LengthMismatch {
        shape: Vec<usize>,
        expected: usize,
        got: usize,
    },

    #[error("Shape {dims:?} has too many entries for dense storage")]
    TooLarge { dims: Vec<usize> },

    #[error("Cannot reshape {from:?} into {to:?}: entry counts differ")]
    InvalidReshape { from: Vec<usize>, to: Vec<usize> },

    #[error("Shape must have at least one dimension")]
    EmptyShape,

    #[error("Index out of bounds: index {index:?} exceeds shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },
}

/// Result alias for shape validation
pub type ShapeResult<T> = Result<T, ShapeError>;
