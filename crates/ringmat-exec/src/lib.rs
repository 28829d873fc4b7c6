//! # ringmat-exec
//!
//! Execution layer for ringmat kernels:
//!
//! - [`config`]: parallelism and block size, from defaults, properties text,
//!   environment variables or a file, plus the process-wide settings
//! - [`ThreadManager`]: one shared rayon pool with blocking, range-partitioned
//!   operations and structured failure reporting
//! - [`ExecContext`]: the handle every kernel receives
//!
//! ## Logging
//!
//! The crate logs through the `log` facade and never installs a logger.
//! Configuration fallbacks and resize timeouts are warnings; task panics are
//! errors.

pub mod config;
pub mod context;
pub mod error;
pub mod pool;

pub use config::Config;
pub use context::ExecContext;
pub use error::{ConfigError, ConfigResult, ExecError, ExecResult};
pub use pool::ThreadManager;
