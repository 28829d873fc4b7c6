//! # ringmat-dispatch
//!
//! Picks a dense product kernel from the operand shapes and remembers the
//! choice.
//!
//! ## Overview
//!
//! - [`DenseMatMulDispatcher`]: validates shapes, selects among the kernels
//!   of `ringmat-kernels` and runs the selected one
//! - [`DispatchThresholds`]: every constant of the decision tree, with a
//!   preset per element family
//! - [`cache`]: bounded LRU cache keyed by shape pairs
//! - [`dense_dispatcher`]: one shared dispatcher per element type
//!
//! ## Quick Start
//!
//! ```
//! use ringmat_core::DenseMatrix;
//! use ringmat_dispatch::dense_dispatcher;
//!
//! let a = DenseMatrix::from_vec(2, 2, vec![1i64, 2, 3, 4]).unwrap();
//! let b = DenseMatrix::from_vec(2, 2, vec![5i64, 6, 7, 8]).unwrap();
//!
//! let c = dense_dispatcher::<i64>().unwrap().dispatch(&a, &b).unwrap();
//! assert_eq!(c.data(), &[19, 22, 43, 50]);
//! ```

pub mod algorithm;
pub mod cache;
pub mod dense;
pub mod error;
pub mod registry;
pub mod thresholds;

pub use algorithm::MatMulAlgorithm;
pub use cache::{CacheStats, LruCache, ShapeCache, ShapePairKey};
pub use dense::DenseMatMulDispatcher;
pub use error::{DispatchError, DispatchResult};
pub use registry::{dense_dispatcher, reset_dispatchers, DispatchFamily};
pub use thresholds::DispatchThresholds;
