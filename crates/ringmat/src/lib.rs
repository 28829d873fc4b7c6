//! # ringmat - Matrix Arithmetic over Generic Semirings
//!
//! Dense, sparse (COO/CSR) and mixed dense/sparse matrix and vector
//! arithmetic for any element type with `+` and `×`: reals, complex
//! numbers, prime fields, tropical and boolean semirings.
//!
//! This is the **meta crate** that re-exports every ringmat component.
//!
//! ## Quick Start
//!
//! ```
//! use ringmat::prelude::*;
//!
//! let a = DenseMatrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0])?;
//! let b = DenseMatrix::from_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0])?;
//!
//! let c = matmul(&a, &b)?;
//! assert_eq!(c.data(), &[19.0, 22.0, 43.0, 50.0]);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Components
//!
//! ### Core Types ([`core`])
//!
//! Shapes, the [`Semiring`](core::Semiring) / [`Ring`](core::Ring) /
//! [`Field`](core::Field) element traits and row-major dense containers.
//!
//! ### Execution ([`exec`])
//!
//! Process-wide configuration and the shared thread pool every concurrent
//! kernel runs on.
//!
//! ```
//! use ringmat::exec::Config;
//!
//! let config = Config::from_properties("parallelism=2\nblockSize=32\n");
//! assert_eq!(config.block_size, 32);
//! ```
//!
//! ### Dense Kernels ([`kernels`])
//!
//! Standard, reordered, blocked and concurrent forms of `A·B`, `A·x` and
//! `A·Bᵀ`, plus transposes.
//!
//! ### Dispatch ([`dispatch`])
//!
//! Shape-driven kernel selection with a bounded LRU cache of past choices.
//!
//! ```
//! use ringmat::core::{DenseMatrix, Shape};
//! use ringmat::dispatch::{DenseMatMulDispatcher, DispatchThresholds};
//! use ringmat::exec::ExecContext;
//!
//! let ctx = ExecContext::with_parallelism(2, 64).unwrap();
//! let dispatcher = DenseMatMulDispatcher::<f64>::new(ctx, DispatchThresholds::real());
//! let algorithm = dispatcher.select_algorithm(&Shape::matrix(500, 500), &Shape::matrix(500, 500));
//! assert!(algorithm.is_concurrent());
//! ```
//!
//! ### Sparse Matrices ([`sparse`])
//!
//! COO and CSR formats, merge-join arithmetic (sparse with sparse or with
//! dense operands) and sparse products. Real/complex sparse pairs are in
//! [`ops`].
//!
//! ```
//! use ringmat::sparse::{csr_matmul, CsrMatrix};
//!
//! let a = CsrMatrix::new(2, 2, vec![0, 1, 1], vec![0], vec![2.0]).unwrap();
//! let b = CsrMatrix::new(2, 2, vec![0, 1, 1], vec![0], vec![3.0]).unwrap();
//! let c = csr_matmul::matmul_dense(&a, &b).unwrap();
//! assert_eq!(c.data(), &[6.0, 0.0, 0.0, 0.0]);
//! ```
//!
//! ## Features
//!
//! - `serde`: serialize shapes, configuration and dispatch thresholds

#![deny(warnings)]

pub use ringmat_core as core;
pub use ringmat_dispatch as dispatch;
pub use ringmat_exec as exec;
pub use ringmat_kernels as kernels;
pub use ringmat_sparse as sparse;

pub mod ops;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use ringmat::prelude::*;
    //!
    //! let m = DenseMatrix::<f64>::identity(3);
    //! assert_eq!(m.shape(), &Shape::matrix(3, 3));
    //! ```

    // Core types
    pub use crate::core::num_complex::Complex;
    pub use crate::core::{
        BoolSemiring, DenseMatrix, DenseVector, Field, MaxPlus, Ring, Semiring, Shape, ShapeError,
        Zmod,
    };

    // Execution
    pub use crate::exec::{Config, ExecContext, ThreadManager};

    // Dispatch
    pub use crate::dispatch::{
        DenseMatMulDispatcher, DispatchError, DispatchThresholds, MatMulAlgorithm,
    };

    // Sparse types
    pub use crate::sparse::{CooMatrix, CooTriplets, CooVector, CsrMatrix, SparseError};

    // Operations
    pub use crate::ops::{
        csr_matmul_complex_real, csr_matmul_real_complex, matmul, matmul_complex_real,
        matmul_real_complex, matmul_transpose, matvec,
    };
}
