//! Runtime configuration
//!
//! Two knobs drive every kernel: the degree of parallelism of the shared
//! thread pool and the block (tile) size used by blocked kernels.
//!
//! # Sources
//!
//! - [`Config::default`]: logical core count and a block size of 64
//! - [`Config::from_properties`]: `key=value` text, keys `parallelism` and
//!   `blockSize` (`block_size` is accepted too)
//! - [`Config::from_env`]: `RINGMAT_PARALLELISM` and `RINGMAT_BLOCK_SIZE`
//! - [`Config::load_from_file`]: a properties file on disk
//!
//! Missing or malformed entries never fail: they fall back to the default and
//! a warning is logged.
//!
//! # Process-wide settings
//!
//! ```
//! use ringmat_exec::config::{self, Config};
//!
//! config::set_block_size(128).unwrap();
//! assert_eq!(config::global_config().block_size, 128);
//!
//! assert!(config::set_block_size(0).is_err());
//! config::reset_to_defaults();
//! assert_eq!(config::global_config(), Config::from_env());
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::pool::ThreadManager;
use anyhow::Context;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default tile edge for blocked kernels
pub const DEFAULT_BLOCK_SIZE: usize = 64;

pub const PARALLELISM_KEY: &str = "parallelism";
pub const BLOCK_SIZE_KEY: &str = "blockSize";
const BLOCK_SIZE_ALT_KEY: &str = "block_size";

pub const PARALLELISM_ENV: &str = "RINGMAT_PARALLELISM";
pub const BLOCK_SIZE_ENV: &str = "RINGMAT_BLOCK_SIZE";

/// Kernel execution settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Number of worker threads in the shared pool
    pub parallelism: usize,
    /// Tile edge for blocked kernels
    pub block_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl Config {
    pub fn new(parallelism: usize, block_size: usize) -> Self {
        Self {
            parallelism: parallelism.max(1),
            block_size: block_size.max(1),
        }
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    /// Parse a properties source.
    ///
    /// Blank lines and lines starting with `#` or `!` are ignored. Keys and
    /// values may be separated by `=` or `:`. Unknown keys are ignored.
    ///
    /// The `parallelism` entry accepts the same values as
    /// [`set_parallelism_level`]: non-positive values are relative to the
    /// core count.
    pub fn from_properties(source: &str) -> Self {
        let mut config = Self::default();

        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let Some(split) = line.find(['=', ':']) else {
                log::warn!("Ignoring malformed configuration line: {:?}", line);
                continue;
            };
            let key = line[..split].trim();
            let value = line[split + 1..].trim();

            match key {
                PARALLELISM_KEY => {
                    config.parallelism = parse_parallelism(key, value);
                }
                BLOCK_SIZE_KEY | BLOCK_SIZE_ALT_KEY => {
                    config.block_size = parse_block_size(key, value);
                }
                _ => log::debug!("Ignoring unknown configuration key {:?}", key),
            }
        }

        config
    }

    /// Read settings from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(PARALLELISM_ENV) {
            config.parallelism = parse_parallelism(PARALLELISM_ENV, value.trim());
        }
        if let Ok(value) = std::env::var(BLOCK_SIZE_ENV) {
            config.block_size = parse_block_size(BLOCK_SIZE_ENV, value.trim());
        }
        config
    }

    /// Load a properties file.
    ///
    /// # Errors
    ///
    /// Fails only if the file cannot be read. Content problems fall back to
    /// defaults like [`Config::from_properties`].
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Ok(Self::from_properties(&source))
    }
}

/// Logical core count, never less than one.
pub fn default_parallelism() -> usize {
    num_cpus::get().max(1)
}

/// Turn a requested parallelism level into a thread count.
///
/// Positive values are taken as is. Zero and negative values mean "the core
/// count minus `|level|`", floored at one.
///
/// ```
/// use ringmat_exec::config::{default_parallelism, resolve_parallelism};
///
/// assert_eq!(resolve_parallelism(3), 3);
/// assert_eq!(resolve_parallelism(0), default_parallelism());
/// assert_eq!(resolve_parallelism(-100_000), 1);
/// ```
pub fn resolve_parallelism(level: i64) -> usize {
    if level > 0 {
        level as usize
    } else {
        let reduce = level.unsigned_abs() as usize;
        default_parallelism().saturating_sub(reduce).max(1)
    }
}

fn parse_parallelism(key: &str, value: &str) -> usize {
    match value.parse::<i64>() {
        Ok(level) => resolve_parallelism(level),
        Err(_) => {
            let fallback = default_parallelism();
            log::warn!(
                "Invalid value {:?} for {}, using default parallelism {}",
                value,
                key,
                fallback
            );
            fallback
        }
    }
}

fn parse_block_size(key: &str, value: &str) -> usize {
    match value.parse::<usize>() {
        Ok(size) if size > 0 => size,
        _ => {
            log::warn!(
                "Invalid value {:?} for {}, using default block size {}",
                value,
                key,
                DEFAULT_BLOCK_SIZE
            );
            DEFAULT_BLOCK_SIZE
        }
    }
}

static GLOBAL_CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::from_env()));

/// Snapshot of the process-wide configuration.
pub fn global_config() -> Config {
    *GLOBAL_CONFIG.read()
}

/// Process-wide block size.
pub fn block_size() -> usize {
    GLOBAL_CONFIG.read().block_size
}

/// Change the process-wide block size.
///
/// Affects contexts created afterwards; running kernels keep the block size
/// they started with.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBlockSize`] for zero.
pub fn set_block_size(block_size: usize) -> ConfigResult<()> {
    if block_size == 0 {
        return Err(ConfigError::InvalidBlockSize(block_size));
    }
    GLOBAL_CONFIG.write().block_size = block_size;
    Ok(())
}

/// Change the process-wide parallelism and resize the shared pool.
///
/// See [`resolve_parallelism`] for how `level` maps to a thread count, and
/// [`ThreadManager::set_parallelism_level`] for the resize protocol. This is
/// an administrative operation; call it from one place at a time.
///
/// # Returns
///
/// The effective thread count.
pub fn set_parallelism_level(level: i64) -> ConfigResult<usize> {
    let effective = ThreadManager::global()?.set_parallelism_level(level)?;
    GLOBAL_CONFIG.write().parallelism = effective;
    Ok(effective)
}

/// Restore the configuration read at startup and resize the pool to match.
pub fn reset_to_defaults() {
    let fresh = Config::from_env();
    *GLOBAL_CONFIG.write() = fresh;
    let resized = ThreadManager::global()
        .and_then(|pool| pool.set_parallelism_level(fresh.parallelism as i64));
    if let Err(e) = resized {
        log::warn!("Failed to resize thread pool while resetting configuration: {}", e);
    }
}
