//! # ringmat-core
//!
//! Core types for the ringmat linear-algebra stack.
//!
//! - **Shapes** ([`Shape`]) with structural equality, used as dispatch cache keys
//! - **Element algebra** ([`Semiring`], [`Ring`], [`Field`]) so kernels are
//!   written once for every element type
//! - **Concrete abstract elements**: [`BoolSemiring`], [`MaxPlus`], [`Zmod`]
//! - **Dense containers** ([`DenseMatrix`], [`DenseVector`]) in row-major layout
//! - **Shape validation** helpers and the shared [`ShapeError`]
//!
//! ## SciRS2 Integration
//!
//! Numeric traits (`Zero`, `One`, `Float`), complex numbers and `ndarray`
//! interop all come from `scirs2-core`. The [`numeric`] re-export lets
//! downstream crates name them without an extra dependency.
//!
//! ## Quick Start
//!
//! ```
//! use ringmat_core::{DenseMatrix, Shape};
//! use ringmat_core::shape::ensure_matmul_shapes;
//!
//! let a = DenseMatrix::<f64>::zeros(2, 3);
//! let b = DenseMatrix::<f64>::identity(3);
//!
//! let out = ensure_matmul_shapes(a.shape(), b.shape()).unwrap();
//! assert_eq!(out, Shape::matrix(2, 3));
//! ```

pub mod algebra;
pub mod dense;
pub mod error;
pub mod shape;

pub use algebra::{ApproxEq, BoolSemiring, Field, MaxPlus, Promote, Ring, Semiring, Zmod};
pub use dense::{DenseMatrix, DenseVector};
pub use error::{ShapeError, ShapeResult};
pub use shape::Shape;

pub use scirs2_core::num_complex;
pub use scirs2_core::numeric;
