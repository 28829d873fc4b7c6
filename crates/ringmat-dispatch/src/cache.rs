//! Bounded LRU caching of kernel choices
//!
//! Selecting a kernel is cheap but not free, and the same shape pairs tend to
//! repeat. Each dispatcher keeps the algorithm it chose for recent shape
//! pairs in a bounded cache with least-recently-used eviction.
//!
//! # Design
//!
//! - **Key**: [`ShapePairKey`], the two operand shapes compared structurally
//! - **Value**: the selected algorithm (any `Clone` value)
//! - **Eviction**: the entry with the oldest logical access time, once the
//!   cache is over capacity
//! - **Thread safety**: [`ShapeCache`] wraps the map in a
//!   `parking_lot::Mutex`. The lock covers only lookups and inserts, never
//!   kernel execution.
//!
//! # Performance
//!
//! - **Get**: O(1) average case (HashMap lookup)
//! - **Put**: O(1) amortized, O(n) when it evicts (scans for the oldest entry)
//!
//! # Examples
//!
//! ```
//! use ringmat_core::Shape;
//! use ringmat_dispatch::cache::{LruCache, ShapePairKey};
//!
//! let key = |n| ShapePairKey::new(Shape::matrix(n, n), Shape::matrix(n, n));
//!
//! let mut cache = LruCache::new(2).unwrap();
//! cache.put(key(1), "a");
//! cache.put(key(2), "b");
//! cache.put(key(3), "c"); // evicts key(1)
//!
//! assert!(cache.get(&key(1)).is_none());
//! assert_eq!(cache.get(&key(3)), Some("c"));
//! ```

use parking_lot::Mutex;
use ringmat_core::Shape;
use std::collections::HashMap;
use std::hash::Hash;

/// Cache key identifying an ordered pair of operand shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapePairKey {
    pub left: Shape,
    pub right: Shape,
}

impl ShapePairKey {
    pub fn new(left: Shape, right: Shape) -> Self {
        Self { left, right }
    }
}

/// Statistics for cache performance monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
    /// Number of cache evictions
    pub evictions: usize,
    /// Current number of cached entries
    pub entries: usize,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    /// Last access timestamp (logical)
    last_access: u64,
}

/// Fixed-capacity map with least-recently-used eviction.
///
/// Not synchronized; see [`ShapeCache`] for the shared form.
#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    capacity: usize,
    entries: HashMap<K, CacheEntry<V>>,
    clock: u64,
    stats: CacheStats,
}

impl<K: Hash + Eq + Clone, V: Clone> LruCache<K, V> {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// Returns `None` for a zero capacity.
    pub fn new(capacity: usize) -> Option<Self> {
        if capacity == 0 {
            return None;
        }
        Some(Self {
            capacity,
            entries: HashMap::with_capacity(capacity + 1),
            clock: 0,
            stats: CacheStats::default(),
        })
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Look up `key` and mark it most recently used.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let now = self.tick();
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_access = now;
                self.stats.hits += 1;
                Some(entry.value.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Look up `key` without touching recency or statistics.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|e| &e.value)
    }

    /// Insert or update `key`, evicting the least recently used entry if the
    /// cache is then over capacity.
    ///
    /// Returns the evicted key, if any.
    pub fn put(&mut self, key: K, value: V) -> Option<K> {
        let now = self.tick();
        self.entries.insert(
            key,
            CacheEntry {
                value,
                last_access: now,
            },
        );

        let evicted = if self.entries.len() > self.capacity {
            self.evict()
        } else {
            None
        };
        self.stats.entries = self.entries.len();
        evicted
    }

    fn evict(&mut self) -> Option<K> {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_access)
            .map(|(k, _)| k.clone())?;
        self.entries.remove(&oldest);
        self.stats.evictions += 1;
        Some(oldest)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry. Statistics other than `entries` are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.entries = 0;
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }
}

/// Thread-safe [`LruCache`] keyed by shape pairs.
#[derive(Debug)]
pub struct ShapeCache<V> {
    inner: Mutex<LruCache<ShapePairKey, V>>,
}

impl<V: Clone> ShapeCache<V> {
    /// Returns `None` for a zero capacity.
    pub fn new(capacity: usize) -> Option<Self> {
        LruCache::new(capacity).map(|cache| Self {
            inner: Mutex::new(cache),
        })
    }

    pub fn get(&self, key: &ShapePairKey) -> Option<V> {
        self.inner.lock().get(key)
    }

    pub fn peek(&self, key: &ShapePairKey) -> Option<V> {
        self.inner.lock().peek(key).cloned()
    }

    pub fn put(&self, key: ShapePairKey, value: V) {
        if let Some(evicted) = self.inner.lock().put(key, value) {
            log::debug!(
                "evicted cached kernel for {} x {}",
                evicted.left,
                evicted.right
            );
        }
    }

    pub fn contains(&self, key: &ShapePairKey) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }
}
