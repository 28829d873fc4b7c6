//! Shared thread pool for concurrent kernels
//!
//! [`ThreadManager`] owns one rayon pool and exposes range-partitioned
//! operations that block until every task of the call has finished.
//!
//! # Partitioning
//!
//! - [`ThreadManager::concurrent_operation`]: `[0, total)` is cut into
//!   `ceil(total / parallelism)`-sized chunks, one task per non-empty chunk
//! - [`ThreadManager::concurrent_blocked_operation`]: one task per block of
//!   `block` indices, the last block truncated
//! - [`ThreadManager::concurrent_rows`] and
//!   [`ThreadManager::concurrent_blocked_rows`]: the same partitions over the
//!   rows of an output buffer, each task receiving the disjoint `&mut` slice of
//!   the rows it owns
//!
//! The row variants are the form kernels call: a kernel's output is a
//! row-major buffer, and `concurrent_rows(dest, row_len, ..)` runs exactly the
//! ranges `concurrent_operation(dest.len() / row_len, ..)` would, with the
//! matching rows attached. The index-only pair remains for work that does
//! not write a shared buffer.
//!
//! Tasks of one call run in no particular order. Callers must only write to
//! the part of the output their range owns.
//!
//! # Failures
//!
//! A panic inside a task is caught and logged. Tasks of the same call that
//! have not started yet are skipped, and the call returns
//! [`ExecError::TaskFailed`] for the first failure. A failed call never
//! reports success with a partially written output.
//!
//! # Example
//!
//! ```
//! use ringmat_exec::ThreadManager;
//!
//! let pool = ThreadManager::new(4).unwrap();
//! let mut out = vec![0usize; 12];
//!
//! // 3 columns per row; every task fills its own rows
//! pool.concurrent_rows(&mut out, 3, |start, _end, rows| {
//!     for (r, row) in rows.chunks_mut(3).enumerate() {
//!         row.fill(start + r);
//!     }
//! })
//! .unwrap();
//!
//! assert_eq!(out, vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3]);
//! ```

use crate::config::{global_config, resolve_parallelism};
use crate::error::{ExecError, ExecResult};
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use rayon::ThreadPool;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long a resize waits for operations still running on the old pool
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(60);

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

static GENERATION: AtomicUsize = AtomicUsize::new(0);

static GLOBAL_MANAGER: OnceCell<Arc<ThreadManager>> = OnceCell::new();

/// Owner of the worker pool used by concurrent kernels.
pub struct ThreadManager {
    pool: RwLock<Arc<ThreadPool>>,
    parallelism: AtomicUsize,
    drain_timeout: Duration,
}

impl std::fmt::Debug for ThreadManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadManager")
            .field("parallelism", &self.parallelism())
            .field("drain_timeout", &self.drain_timeout)
            .finish()
    }
}

impl ThreadManager {
    /// Create an isolated manager with `parallelism` worker threads.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::PoolBuild`] if the worker threads cannot be
    /// spawned.
    pub fn new(parallelism: usize) -> ExecResult<Self> {
        let parallelism = parallelism.max(1);
        Ok(Self {
            pool: RwLock::new(Arc::new(build_pool(parallelism)?)),
            parallelism: AtomicUsize::new(parallelism),
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        })
    }

    /// Override how long [`ThreadManager::set_parallelism_level`] waits for
    /// the old pool to drain.
    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    /// The process-wide manager, sized from the global configuration on
    /// first use.
    pub fn global() -> ExecResult<Arc<ThreadManager>> {
        GLOBAL_MANAGER
            .get_or_try_init(|| {
                let parallelism = global_config().parallelism;
                log::debug!("Creating global thread pool with {} workers", parallelism);
                ThreadManager::new(parallelism).map(Arc::new)
            })
            .cloned()
    }

    /// Current number of worker threads.
    pub fn parallelism(&self) -> usize {
        self.parallelism.load(Ordering::Acquire)
    }

    /// Resize the pool.
    ///
    /// Positive levels are thread counts; zero and negative levels are
    /// relative to the core count (see
    /// [`resolve_parallelism`](crate::config::resolve_parallelism)).
    ///
    /// A new pool is built and swapped in, so operations started afterwards
    /// use it. The call then waits up to the drain timeout for operations
    /// still running on the old pool. On timeout a warning is logged and the
    /// call returns anyway; the old pool is released when its last operation
    /// ends.
    ///
    /// Do not call this from inside a task of the same manager: the caller's
    /// own operation would keep the old pool busy until the timeout.
    ///
    /// # Returns
    ///
    /// The effective thread count.
    pub fn set_parallelism_level(&self, level: i64) -> ExecResult<usize> {
        let effective = resolve_parallelism(level);
        let fresh = Arc::new(build_pool(effective)?);

        let old = std::mem::replace(&mut *self.pool.write(), fresh);
        self.parallelism.store(effective, Ordering::Release);
        log::debug!("Thread pool resized to {} workers", effective);

        self.wait_for_drain(old);
        Ok(effective)
    }

    fn wait_for_drain(&self, old: Arc<ThreadPool>) {
        let started = Instant::now();
        while Arc::strong_count(&old) > 1 {
            if started.elapsed() >= self.drain_timeout {
                log::warn!(
                    "Timed out after {:?} waiting for in-flight operations on the old thread pool; proceeding",
                    self.drain_timeout
                );
                return;
            }
            std::thread::sleep(DRAIN_POLL_INTERVAL);
        }
    }

    fn current_pool(&self) -> Arc<ThreadPool> {
        Arc::clone(&self.pool.read())
    }

    /// Run `op(start, end)` over `[0, total)` split into one chunk per
    /// worker.
    pub fn concurrent_operation<F>(&self, total: usize, op: F) -> ExecResult<()>
    where
        F: Fn(usize, usize) + Sync,
    {
        let step = total.div_ceil(self.parallelism()).max(1);
        self.run_ranges(total, step, op)
    }

    /// Run `op(start, end)` over `[0, total)` split into blocks of `block`
    /// indices.
    pub fn concurrent_blocked_operation<F>(&self, total: usize, block: usize, op: F) -> ExecResult<()>
    where
        F: Fn(usize, usize) + Sync,
    {
        self.run_ranges(total, block.max(1), op)
    }

    /// Fill `dest`, viewed as rows of `row_len` entries, with one task per
    /// worker. `op(start_row, end_row, rows)` receives the rows it owns.
    ///
    /// # Errors
    ///
    /// [`ExecError::RowMisaligned`] if `dest.len()` is not a multiple of
    /// `row_len`, and [`ExecError::TaskFailed`] if a task panics.
    pub fn concurrent_rows<T, F>(&self, dest: &mut [T], row_len: usize, op: F) -> ExecResult<()>
    where
        T: Send,
        F: Fn(usize, usize, &mut [T]) + Sync,
    {
        let rows = row_count(dest.len(), row_len)?;
        let step = rows.div_ceil(self.parallelism()).max(1);
        self.run_row_chunks(dest, row_len, step, op)
    }

    /// Like [`ThreadManager::concurrent_rows`] with partitions of `block`
    /// rows.
    pub fn concurrent_blocked_rows<T, F>(
        &self,
        dest: &mut [T],
        row_len: usize,
        block: usize,
        op: F,
    ) -> ExecResult<()>
    where
        T: Send,
        F: Fn(usize, usize, &mut [T]) + Sync,
    {
        row_count(dest.len(), row_len)?;
        self.run_row_chunks(dest, row_len, block.max(1), op)
    }

    /// Run `op(start, end)` over one chunk per worker and collect the
    /// results in range order.
    pub fn concurrent_collect<R, F>(&self, total: usize, op: F) -> ExecResult<Vec<R>>
    where
        R: Send,
        F: Fn(usize, usize) -> R + Sync,
    {
        if total == 0 {
            return Ok(Vec::new());
        }
        let step = total.div_ceil(self.parallelism()).max(1);
        let mut slots: Vec<Option<R>> = (0..total.div_ceil(step)).map(|_| None).collect();

        self.run_row_chunks(&mut slots, 1, 1, |idx, _, slot| {
            let start = idx * step;
            let end = (start + step).min(total);
            slot[0] = Some(op(start, end));
        })?;

        let collected: Option<Vec<R>> = slots.into_iter().collect();
        collected.ok_or_else(|| ExecError::TaskFailed {
            start: 0,
            end: total,
            message: "task finished without producing a result".to_string(),
        })
    }

    fn run_ranges<F>(&self, total: usize, step: usize, op: F) -> ExecResult<()>
    where
        F: Fn(usize, usize) + Sync,
    {
        if total == 0 {
            return Ok(());
        }
        let pool = self.current_pool();
        let failure = TaskFailure::default();

        pool.scope(|s| {
            let (op, failure) = (&op, &failure);
            let mut start = 0;
            while start < total {
                let end = (start + step).min(total);
                s.spawn(move |_| failure.run(start, end, || op(start, end)));
                start = end;
            }
        });

        failure.into_result()
    }

    fn run_row_chunks<T, F>(&self, dest: &mut [T], row_len: usize, step: usize, op: F) -> ExecResult<()>
    where
        T: Send,
        F: Fn(usize, usize, &mut [T]) + Sync,
    {
        if dest.is_empty() || row_len == 0 {
            return Ok(());
        }
        let pool = self.current_pool();
        let failure = TaskFailure::default();

        pool.scope(|s| {
            let (op, failure) = (&op, &failure);
            for (idx, chunk) in dest.chunks_mut(step * row_len).enumerate() {
                let start = idx * step;
                let end = start + chunk.len() / row_len;
                s.spawn(move |_| failure.run(start, end, || op(start, end, chunk)));
            }
        });

        failure.into_result()
    }
}

fn build_pool(parallelism: usize) -> ExecResult<ThreadPool> {
    let generation = GENERATION.fetch_add(1, Ordering::Relaxed);
    rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism)
        .thread_name(move |i| format!("ringmat-worker-{}-{}", generation, i))
        .build()
        .map_err(|e| ExecError::PoolBuild(e.to_string()))
}

fn row_count(len: usize, row_len: usize) -> ExecResult<usize> {
    if row_len == 0 {
        return if len == 0 {
            Ok(0)
        } else {
            Err(ExecError::RowMisaligned { len, row_len })
        };
    }
    if len % row_len != 0 {
        return Err(ExecError::RowMisaligned { len, row_len });
    }
    Ok(len / row_len)
}

/// First failure of one concurrent call plus the cancellation flag its
/// remaining tasks check before starting.
#[derive(Default)]
struct TaskFailure {
    cancelled: AtomicBool,
    first: Mutex<Option<ExecError>>,
}

impl TaskFailure {
    fn run<F: FnOnce()>(&self, start: usize, end: usize, task: F) {
        if self.cancelled.load(Ordering::Acquire) {
            return;
        }
        if let Err(payload) = catch_unwind(AssertUnwindSafe(task)) {
            let message = panic_message(payload.as_ref());
            log::error!("Task on range [{}, {}) panicked: {}", start, end, message);
            self.cancelled.store(true, Ordering::Release);
            let mut first = self.first.lock();
            if first.is_none() {
                *first = Some(ExecError::TaskFailed { start, end, message });
            }
        }
    }

    fn into_result(self) -> ExecResult<()> {
        match self.first.into_inner() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
