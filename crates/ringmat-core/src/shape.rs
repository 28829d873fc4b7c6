//! Shapes and shape validation.
//!
//! A [`Shape`] is an immutable ordered sequence of dimension sizes. Matrices
//! have rank 2 (`rows × cols`), vectors have rank 1. Shapes are compared and
//! hashed structurally, so two independently built shapes with the same
//! dimensions are interchangeable as cache keys.
//!
//! There are no mutating accessors. Once a shape has been handed out it can
//! never change, which lets the dispatcher trust a cached decision without
//! re-validating it.
//!
//! # Examples
//!
//! ```
//! use ringmat_core::Shape;
//!
//! let a = Shape::matrix(2, 3);
//! let b = Shape::new(&[2, 3]).unwrap();
//!
//! assert_eq!(a, b);
//! assert_eq!(a.rows(), 2);
//! assert_eq!(a.cols(), 3);
//! assert_eq!(a.total_entries(), 6);
//! ```

use crate::error::{ShapeError, ShapeResult};
use smallvec::SmallVec;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest entry count addressable by dense storage.
///
/// Dense arrays are addressed with signed 32-bit offsets in the serialized
/// formats this library interoperates with.
pub const MAX_DENSE_ENTRIES: usize = i32::MAX as usize;

/// Ordered dimension sizes of a matrix or vector.
///
/// Backed by a `SmallVec` so shapes up to rank 4 never allocate.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shape {
    dims: SmallVec<[usize; 4]>,
}

impl Shape {
    /// Create a shape from a slice of dimension sizes.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::EmptyShape`] if `dims` is empty.
    pub fn new(dims: &[usize]) -> ShapeResult<Self> {
        if dims.is_empty() {
            return Err(ShapeError::EmptyShape);
        }
        Ok(Self {
            dims: SmallVec::from_slice(dims),
        })
    }

    /// Rank-2 shape `rows × cols`.
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Self {
            dims: SmallVec::from_slice(&[rows, cols]),
        }
    }

    /// Rank-1 shape of length `size`.
    pub fn vector(size: usize) -> Self {
        Self {
            dims: SmallVec::from_slice(&[size]),
        }
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Dimension sizes as a slice.
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Size of dimension `axis`, if it exists.
    #[inline]
    pub fn get(&self, axis: usize) -> Option<usize> {
        self.dims.get(axis).copied()
    }

    /// Number of rows.
    ///
    /// For a rank-1 shape this is the vector length.
    #[inline]
    pub fn rows(&self) -> usize {
        self.dims[0]
    }

    /// Number of columns.
    ///
    /// A rank-1 shape is treated as a single column.
    #[inline]
    pub fn cols(&self) -> usize {
        if self.dims.len() >= 2 {
            self.dims[1]
        } else {
            1
        }
    }

    /// True if this is a rank-2 shape.
    #[inline]
    pub fn is_matrix(&self) -> bool {
        self.dims.len() == 2
    }

    /// True for rank-1 shapes and for matrices with a single column.
    pub fn is_column(&self) -> bool {
        self.dims.len() == 1 || (self.dims.len() == 2 && self.dims[1] == 1)
    }

    /// Product of all dimensions.
    ///
    /// Saturates at `usize::MAX`; use [`Shape::total_entries_checked`] when
    /// the result will size an allocation.
    pub fn total_entries(&self) -> usize {
        self.dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .unwrap_or(usize::MAX)
    }

    /// Product of all dimensions, rejecting shapes that dense storage cannot
    /// address.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::TooLarge`] if the product exceeds
    /// [`MAX_DENSE_ENTRIES`].
    pub fn total_entries_checked(&self) -> ShapeResult<usize> {
        match self
            .dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        {
            Some(n) if n <= MAX_DENSE_ENTRIES => Ok(n),
            _ => Err(ShapeError::TooLarge {
                dims: self.dims.to_vec(),
            }),
        }
    }

    /// Swap the two axes of a rank-2 shape. Rank-1 shapes become `1 × n`.
    pub fn transposed(&self) -> Self {
        if self.dims.len() == 1 {
            Self::matrix(1, self.dims[0])
        } else {
            let mut dims = self.dims.clone();
            dims.swap(0, 1);
            Self { dims }
        }
    }

    /// Row-major flat offset of `index`, or `None` if it is out of bounds.
    pub fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.dims.len() {
            return None;
        }
        let mut offset = 0usize;
        for (&i, &d) in index.iter().zip(self.dims.iter()) {
            if i >= d {
                return None;
            }
            offset = offset * d + i;
        }
        Some(offset)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape{:?}", self.dims.as_slice())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.dims.iter().map(|d| d.to_string()).collect();
        write!(f, "({})", parts.join("×"))
    }
}

impl TryFrom<&[usize]> for Shape {
    type Error = ShapeError;

    fn try_from(dims: &[usize]) -> ShapeResult<Self> {
        Shape::new(dims)
    }
}

impl TryFrom<Vec<usize>> for Shape {
    type Error = ShapeError;

    fn try_from(dims: Vec<usize>) -> ShapeResult<Self> {
        Shape::new(&dims)
    }
}

/// Require `shape` to have exactly `expected` dimensions.
pub fn ensure_rank(shape: &Shape, expected: usize) -> ShapeResult<()> {
    if shape.rank() != expected {
        return Err(ShapeError::RankMismatch {
            expected,
            got: shape.rank(),
        });
    }
    Ok(())
}

/// Require two shapes to be identical.
pub fn ensure_equal_shapes(expected: &Shape, got: &Shape) -> ShapeResult<()> {
    if expected != got {
        return Err(ShapeError::ShapeMismatch {
            expected: expected.dims().to_vec(),
            got: got.dims().to_vec(),
        });
    }
    Ok(())
}

/// Validate a matrix product `A (m×n) · B (n×k)`.
///
/// Both shapes must be rank 2 and the inner dimensions must agree. The
/// product shape is also checked against dense addressing limits.
///
/// # Returns
///
/// The shape of the product, `m × k`.
pub fn ensure_matmul_shapes(a: &Shape, b: &Shape) -> ShapeResult<Shape> {
    ensure_rank(a, 2)?;
    ensure_rank(b, 2)?;
    if a.cols() != b.rows() {
        return Err(ShapeError::MatMulMismatch {
            m1: a.rows(),
            n1: a.cols(),
            m2: b.rows(),
            n2: b.cols(),
        });
    }
    let out = Shape::matrix(a.rows(), b.cols());
    out.total_entries_checked()?;
    Ok(out)
}

/// Validate a matrix-vector product `A (m×n) · v`.
///
/// `v` may be a rank-1 vector of length `n` or an `n × 1` column matrix.
///
/// # Returns
///
/// The shape of the product, a vector of length `m`.
pub fn ensure_matvec_shapes(a: &Shape, v: &Shape) -> ShapeResult<Shape> {
    ensure_rank(a, 2)?;
    if !v.is_column() || v.rows() != a.cols() {
        return Err(ShapeError::MatVecMismatch {
            m: a.rows(),
            n: a.cols(),
            v: v.total_entries(),
        });
    }
    Ok(Shape::vector(a.rows()))
}

/// Validate `A (m×n) · Bᵀ` where `B` is `k×n`.
///
/// # Returns
///
/// The shape of the product, `m × k`.
pub fn ensure_mult_transpose_shapes(a: &Shape, b: &Shape) -> ShapeResult<Shape> {
    ensure_rank(a, 2)?;
    ensure_rank(b, 2)?;
    if a.cols() != b.cols() {
        return Err(ShapeError::TransposeMismatch {
            m1: a.rows(),
            n1: a.cols(),
            m2: b.rows(),
            n2: b.cols(),
        });
    }
    let out = Shape::matrix(a.rows(), b.rows());
    out.total_entries_checked()?;
    Ok(out)
}
