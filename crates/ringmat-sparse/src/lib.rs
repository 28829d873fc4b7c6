//! # ringmat-sparse
//!
//! Sparse matrix and vector formats with merge-join arithmetic and sparse
//! products over any [`Semiring`].
//!
//! ## Formats
//!
//! - [`CooTriplets`]: unsorted coordinate builder
//! - [`CooMatrix`] / [`CooVector`]: sorted coordinate storage
//! - [`CsrMatrix`]: compressed sparse rows
//!
//! The sorted types can only be built through validating constructors, so
//! every operation may assume sorted, duplicate-free indices.
//!
//! ## Operations
//!
//! - [`merge`]: element-wise `add` / `sub` / `elem_mult` between two sparse
//!   operands or a sparse and a dense one, dot and inner products, outer
//!   products
//! - [`csr_matmul`]: CSR × CSR (dense or sparse result), CSR × dense,
//!   dense × CSR, CSR × vector
//! - [`coo_matmul`]: COO × dense, dense × COO, COO × vector, COO × COO
//!
//! ## Example
//!
//! ```
//! use ringmat_sparse::{csr_matmul, merge, CooTriplets};
//!
//! let mut t = CooTriplets::new(2, 2);
//! t.push(0, 0, 2.0).unwrap();
//! t.push(1, 1, 3.0).unwrap();
//! let a = t.into_sorted().to_csr();
//!
//! let sum = merge::csr_add(&a, &a).unwrap();
//! assert_eq!(sum.values(), &[4.0, 6.0]);
//!
//! let sq = csr_matmul::matmul_sparse(&a, &a).unwrap();
//! assert_eq!(sq.values(), &[4.0, 9.0]);
//! ```
//!
//! [`Semiring`]: ringmat_core::Semiring

pub mod coo;
pub mod coo_matmul;
pub mod csr;
pub mod csr_matmul;
pub mod error;
pub mod merge;

pub use coo::{CooMatrix, CooTriplets, CooVector};
pub use csr::CsrMatrix;
pub use error::{SparseError, SparseResult};
