//! Execution and configuration errors

use thiserror::Error;

/// Errors raised while running work on the thread pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// A task panicked. Remaining tasks of the same operation were cancelled
    /// and no output was produced.
    #[error("Parallel task failed on range [{start}, {end}): {message}")]
    TaskFailed {
        start: usize,
        end: usize,
        message: String,
    },

    #[error("Failed to build thread pool: {0}")]
    PoolBuild(String),

    #[error("Output buffer of length {len} is not a whole number of rows of length {row_len}")]
    RowMisaligned { len: usize, row_len: usize },
}

/// Errors raised when changing process-wide settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Block size must be positive, got {0}")]
    InvalidBlockSize(usize),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

pub type ExecResult<T> = Result<T, ExecError>;

pub type ConfigResult<T> = Result<T, ConfigError>;
