//! Execution context handed to every kernel

use crate::config::{global_config, Config};
use crate::error::ExecResult;
use crate::pool::ThreadManager;
use std::sync::Arc;

/// Pool and block size a kernel call runs with.
///
/// Kernels never read process-wide state; everything they need arrives
/// through this handle, so tests can run against isolated pools.
///
/// # Examples
///
/// ```
/// use ringmat_exec::ExecContext;
///
/// let ctx = ExecContext::with_parallelism(2, 16).unwrap();
/// assert_eq!(ctx.block_size(), 16);
/// assert_eq!(ctx.parallelism(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ExecContext {
    pool: Arc<ThreadManager>,
    block_size: usize,
}

impl ExecContext {
    pub fn new(pool: Arc<ThreadManager>, block_size: usize) -> Self {
        Self {
            pool,
            block_size: block_size.max(1),
        }
    }

    /// Context backed by its own pool of `parallelism` threads.
    pub fn with_parallelism(parallelism: usize, block_size: usize) -> ExecResult<Self> {
        Ok(Self::new(Arc::new(ThreadManager::new(parallelism)?), block_size))
    }

    /// Context built from a [`Config`], with its own pool.
    pub fn from_config(config: &Config) -> ExecResult<Self> {
        Self::with_parallelism(config.parallelism, config.block_size)
    }

    /// Shared global pool and the current global block size.
    pub fn global() -> ExecResult<Self> {
        Ok(Self::new(ThreadManager::global()?, global_config().block_size))
    }

    /// Same pool, different block size.
    pub fn with_block_size(&self, block_size: usize) -> Self {
        Self::new(Arc::clone(&self.pool), block_size)
    }

    #[inline]
    pub fn pool(&self) -> &ThreadManager {
        &self.pool
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub fn parallelism(&self) -> usize {
        self.pool.parallelism()
    }
}
