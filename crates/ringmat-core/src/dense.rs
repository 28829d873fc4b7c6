//! Dense row-major matrices and vectors.
//!
//! # Format
//!
//! A [`DenseMatrix`] stores its entries in one contiguous `Vec<T>` in
//! row-major order: entry `(i, j)` of an `m × n` matrix lives at offset
//! `i * n + j`. Every constructor enforces `data.len() == rows * cols`.
//!
//! A [`DenseVector`] is a `Vec<T>` with a rank-1 [`Shape`].
//!
//! # Examples
//!
//! ```
//! use ringmat_core::DenseMatrix;
//!
//! let a = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
//!
//! assert_eq!(a.rows(), 2);
//! assert_eq!(a.get(1, 0), Some(&3.0));
//! assert_eq!(a.row(1), &[3.0, 4.0]);
//!
//! let t = a.transpose();
//! assert_eq!(t.data(), &[1.0, 3.0, 2.0, 4.0]);
//! ```

use crate::algebra::{ApproxEq, Semiring};
use crate::error::{ShapeError, ShapeResult};
use crate::shape::{ensure_rank, Shape};
use scirs2_core::ndarray_ext::{Array1, Array2};

/// Dense row-major matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix<T> {
    data: Vec<T>,
    shape: Shape,
}

impl<T> DenseMatrix<T> {
    /// Wrap row-major `data` as a `rows × cols` matrix.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::LengthMismatch`] if `data.len() != rows * cols`,
    /// or [`ShapeError::TooLarge`] if the shape cannot be addressed densely.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> ShapeResult<Self> {
        Self::from_shape_vec(Shape::matrix(rows, cols), data)
    }

    /// Wrap row-major `data` with an existing rank-2 shape.
    pub fn from_shape_vec(shape: Shape, data: Vec<T>) -> ShapeResult<Self> {
        ensure_rank(&shape, 2)?;
        let expected = shape.total_entries_checked()?;
        if data.len() != expected {
            return Err(ShapeError::LengthMismatch {
                shape: shape.dims().to_vec(),
                expected,
                got: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// Build from a slice of equally long rows.
    ///
    /// An empty slice yields a `0 × 0` matrix.
    pub fn from_rows(rows: &[Vec<T>]) -> ShapeResult<Self>
    where
        T: Clone,
    {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(ShapeError::ShapeMismatch {
                    expected: vec![cols],
                    got: vec![row.len()],
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_vec(rows.len(), cols, data)
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

    /// Row-major entries.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consume the matrix, returning its row-major entries.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Consume the matrix, returning its shape and entries.
    pub fn into_parts(self) -> (Shape, Vec<T>) {
        (self.shape, self.data)
    }

    /// Entry `(i, j)`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<&T> {
        if i < self.rows() && j < self.cols() {
            self.data.get(i * self.cols() + j)
        } else {
            None
        }
    }

    /// Row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows`.
    pub fn row(&self, i: usize) -> &[T] {
        let n = self.cols();
        &self.data[i * n..(i + 1) * n]
    }

    /// Apply `f` to every entry.
    pub fn map<U, F>(&self, f: F) -> DenseMatrix<U>
    where
        F: FnMut(&T) -> U,
    {
        DenseMatrix {
            data: self.data.iter().map(f).collect(),
            shape: self.shape.clone(),
        }
    }

    /// Reinterpret the entries under a new rank-2 shape, preserving
    /// row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::InvalidReshape`] if the entry counts differ.
    pub fn reshape(self, rows: usize, cols: usize) -> ShapeResult<Self> {
        let to = Shape::matrix(rows, cols);
        if to.total_entries() != self.data.len() {
            return Err(ShapeError::InvalidReshape {
                from: self.shape.dims().to_vec(),
                to: to.dims().to_vec(),
            });
        }
        Ok(Self {
            data: self.data,
            shape: to,
        })
    }

    /// Simple out-of-place transpose.
    ///
    /// The tuned variants live in the kernel library.
    pub fn transpose(&self) -> Self
    where
        T: Clone,
    {
        let (m, n) = (self.rows(), self.cols());
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..n {
            for i in 0..m {
                data.push(self.data[i * n + j].clone());
            }
        }
        Self {
            data,
            shape: Shape::matrix(n, m),
        }
    }
}

impl<T: Semiring> DenseMatrix<T> {
    /// `rows × cols` matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![T::zero(); rows * cols],
            shape: Shape::matrix(rows, cols),
        }
    }

    /// `n × n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = T::one();
        }
        m
    }
}

impl<T: ApproxEq> DenseMatrix<T> {
    /// True if both matrices have the same shape and every entry pair is
    /// within `tol` (see [`ApproxEq`]).
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.shape == other.shape
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a.approx_eq(b, tol))
    }
}

impl<T: Clone> DenseMatrix<T> {
    /// Copy into an `ndarray` matrix.
    pub fn to_array2(&self) -> Array2<T> {
        // Length matches by construction.
        Array2::from_shape_fn((self.rows(), self.cols()), |(i, j)| {
            self.data[i * self.cols() + j].clone()
        })
    }

    /// Copy from an `ndarray` matrix of any memory layout.
    pub fn from_array2(array: &Array2<T>) -> Self {
        let (rows, cols) = array.dim();
        Self {
            data: array.iter().cloned().collect(),
            shape: Shape::matrix(rows, cols),
        }
    }
}

/// Dense vector.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseVector<T> {
    data: Vec<T>,
    shape: Shape,
}

impl<T> DenseVector<T> {
    pub fn from_vec(data: Vec<T>) -> Self {
        let shape = Shape::vector(data.len());
        Self { data, shape }
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&T> {
        self.data.get(i)
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn map<U, F>(&self, f: F) -> DenseVector<U>
    where
        F: FnMut(&T) -> U,
    {
        DenseVector::from_vec(self.data.iter().map(f).collect())
    }
}

impl<T: Semiring> DenseVector<T> {
    pub fn zeros(n: usize) -> Self {
        Self::from_vec(vec![T::zero(); n])
    }
}

impl<T: ApproxEq> DenseVector<T> {
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.data.len() == other.data.len()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a.approx_eq(b, tol))
    }
}

impl<T: Clone> DenseVector<T> {
    pub fn to_array1(&self) -> Array1<T> {
        Array1::from_vec(self.data.clone())
    }

    pub fn from_array1(array: &Array1<T>) -> Self {
        Self::from_vec(array.iter().cloned().collect())
    }
}

impl<T> From<Vec<T>> for DenseVector<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}
