//! # ringmat-kernels
//!
//! Dense kernels for matrix products over any [`Semiring`].
//!
//! ## Overview
//!
//! - [`matmul`]: `A · B` in standard, reordered, blocked and concurrent forms
//! - [`matvec`]: `A · x` in standard, blocked and concurrent forms
//! - [`mult_transpose`]: `A · Bᵀ` without materializing `Bᵀ`
//! - [`transpose`]: plain and conjugate transposes
//!
//! Every product kernel has the [`DenseKernel`] signature, so a dispatcher
//! can pick one per shape pair and store it as a plain function pointer.
//! Kernels trust their caller to have validated the shapes, never mutate
//! their inputs and always return a newly allocated row-major result.
//!
//! ## Quick Start
//!
//! ```
//! use ringmat_core::Shape;
//! use ringmat_exec::ExecContext;
//! use ringmat_kernels::matmul;
//!
//! let ctx = ExecContext::with_parallelism(2, 64).unwrap();
//! let a = [1.0, 2.0, 3.0, 4.0];
//! let b = [5.0, 6.0, 7.0, 8.0];
//! let s = Shape::matrix(2, 2);
//!
//! let c = matmul::concurrent_reordered(&ctx, &a, &s, &b, &s).unwrap();
//! assert_eq!(c, vec![19.0, 22.0, 43.0, 50.0]);
//! ```
//!
//! [`Semiring`]: ringmat_core::Semiring

pub mod matmul;
pub mod matvec;
pub mod mult_transpose;
pub mod transpose;

use ringmat_core::Shape;
use ringmat_exec::{ExecContext, ExecResult};

pub use transpose::TransposeKernel;

/// Signature shared by every dense product kernel:
/// `(context, a, shape of a, b, shape of b) -> row-major result`.
pub type DenseKernel<T> = fn(&ExecContext, &[T], &Shape, &[T], &Shape) -> ExecResult<Vec<T>>;
