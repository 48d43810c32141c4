// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named pools of recycled objects.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use crate::recycle::{Recycle, ReleaseError};

type Factory<T, A> = Box<dyn FnMut(&A) -> T>;
type Resetter<T, A> = Box<dyn FnMut(&mut T, &A)>;

/// Limits for a [`RecyclePool`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolConfig {
    /// Most objects any one pool stores. Releases beyond it are refused.
    pub max_pool_size: usize,
    /// Minimum time between two trimming runs of
    /// [`RecyclePool::auto_cleanup`], in milliseconds.
    pub cleanup_interval_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_pool_size: 50,
            cleanup_interval_ms: 30_000,
        }
    }
}

/// Cumulative pool counters plus the current size of every pool.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoolStats {
    /// Objects handed out by [`RecyclePool::acquire`].
    pub total_acquired: u64,
    /// Objects accepted by [`RecyclePool::release`].
    pub total_released: u64,
    /// Objects built by a factory.
    pub total_created: u64,
    /// Objects handed out from storage.
    pub total_reused: u64,
    /// Releases refused because a pool was full.
    pub total_rejected: u64,
    /// Objects dropped by [`RecyclePool::auto_cleanup`].
    pub total_evicted: u64,
    /// `(pool name, stored objects)`, sorted by name.
    pub pool_sizes: Vec<(String, usize)>,
    /// `total_reused / total_acquired`, `0.0` before the first acquire.
    pub reuse_rate: f64,
}

#[derive(Copy, Clone, Debug, Default)]
struct Counters {
    acquired: u64,
    released: u64,
    created: u64,
    reused: u64,
    rejected: u64,
    evicted: u64,
}

struct Pool<T, A> {
    /// Oldest first; acquire pops from the back.
    storage: Vec<T>,
    factory: Option<Factory<T, A>>,
    resetter: Option<Resetter<T, A>>,
}

impl<T, A> Default for Pool<T, A> {
    fn default() -> Self {
        Self {
            storage: Vec::new(),
            factory: None,
            resetter: None,
        }
    }
}

/// Registry of named object pools.
///
/// Each pool has an optional factory, an optional resetter, and a LIFO stack
/// of released objects. `A` is the argument type handed to factories and
/// resetters, for example an initial label text.
///
/// # Example
///
/// ```
/// use tessera_pool::{Recycle, RecyclePool};
///
/// #[derive(Default)]
/// struct Label {
///     text: String,
///     parent: Option<u32>,
/// }
///
/// impl Recycle for Label {
///     fn detach(&mut self) {
///         self.parent = None;
///     }
/// }
///
/// let mut pool: RecyclePool<Label, &str> = RecyclePool::new();
/// pool.register_factory_with_reset(
///     "label",
///     |text| Label { text: String::from(*text), parent: None },
///     |label, text| label.text = String::from(*text),
/// );
///
/// let mut label = pool.acquire("label", &"hello").unwrap();
/// label.parent = Some(7);
/// pool.release("label", label).unwrap();
///
/// let label = pool.acquire("label", &"again").unwrap();
/// assert_eq!(label.text, "again");
/// assert_eq!(label.parent, None);
/// assert_eq!(pool.stats().total_reused, 1);
/// ```
pub struct RecyclePool<T, A = ()> {
    pools: HashMap<String, Pool<T, A>>,
    config: PoolConfig,
    counters: Counters,
    last_cleanup_ms: u64,
}

impl<T: Recycle, A> Default for RecyclePool<T, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Recycle, A> RecyclePool<T, A> {
    /// Creates an empty registry with the default [`PoolConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Creates an empty registry.
    #[must_use]
    pub fn with_config(config: PoolConfig) -> Self {
        Self {
            pools: HashMap::new(),
            config,
            counters: Counters::default(),
            last_cleanup_ms: 0,
        }
    }

    /// Limits in use.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Replaces the limits.
    ///
    /// Pools above a lowered `max_pool_size` drop their oldest objects down to
    /// the new limit. Dropped objects count as evicted. Returns how many were
    /// dropped.
    pub fn set_config(&mut self, config: PoolConfig) -> usize {
        self.config = config;
        let cap = config.max_pool_size;
        let mut evicted = 0;
        for pool in self.pools.values_mut() {
            let len = pool.storage.len();
            if len > cap {
                pool.storage.drain(..len - cap);
                evicted += len - cap;
            }
        }
        if evicted > 0 {
            self.counters.evicted += evicted as u64;
            tracing::debug!(evicted, cap, "recycle pools shrunk to new limit");
        }
        evicted
    }

    /// Associates `name` with a constructor. Replaces any earlier factory.
    pub fn register_factory<F>(&mut self, name: &str, factory: F)
    where
        F: FnMut(&A) -> T + 'static,
    {
        self.pool_entry(name).factory = Some(Box::new(factory));
    }

    /// Associates `name` with a constructor and a reinitializer run on every
    /// reuse.
    pub fn register_factory_with_reset<F, R>(&mut self, name: &str, factory: F, resetter: R)
    where
        F: FnMut(&A) -> T + 'static,
        R: FnMut(&mut T, &A) + 'static,
    {
        let pool = self.pool_entry(name);
        pool.factory = Some(Box::new(factory));
        pool.resetter = Some(Box::new(resetter));
    }

    /// Returns `true` if `name` has a factory.
    #[must_use]
    pub fn has_factory(&self, name: &str) -> bool {
        self.pools.get(name).is_some_and(|p| p.factory.is_some())
    }

    /// Takes an object from pool `name`.
    ///
    /// The most recently released object is reused first and passed through
    /// the resetter. With empty storage the factory builds a fresh object,
    /// tagged with `name`. Returns `None` if there is neither.
    pub fn acquire(&mut self, name: &str, args: &A) -> Option<T> {
        let pool = self.pools.get_mut(name)?;
        if let Some(mut object) = pool.storage.pop() {
            if let Some(reset) = pool.resetter.as_mut() {
                reset(&mut object, args);
            }
            self.counters.acquired += 1;
            self.counters.reused += 1;
            return Some(object);
        }
        let factory = pool.factory.as_mut()?;
        let mut object = factory(args);
        object.set_pool_tag(name);
        self.counters.acquired += 1;
        self.counters.created += 1;
        Some(object)
    }

    /// Parks `object` in pool `name`, creating the pool if needed.
    ///
    /// The object is [detached](Recycle::detach) and tagged before it is
    /// stored. A full pool refuses the object and hands it back in the error.
    pub fn release(&mut self, name: &str, mut object: T) -> Result<(), ReleaseError<T>> {
        let capacity = self.config.max_pool_size;
        if self.pool_size(name) >= capacity {
            self.counters.rejected += 1;
            tracing::debug!(pool = name, capacity, "recycle pool full; release refused");
            return Err(ReleaseError::Full { object, capacity });
        }
        object.detach();
        object.set_pool_tag(name);
        self.pool_entry(name).storage.push(object);
        self.counters.released += 1;
        Ok(())
    }

    /// Releases `object` to the pool named by its own tag.
    pub fn recycle(&mut self, object: T) -> Result<(), ReleaseError<T>> {
        let Some(name) = object.pool_tag().map(String::from) else {
            return Err(ReleaseError::Untagged(object));
        };
        self.release(&name, object)
    }

    /// Objects currently stored in pool `name`.
    #[must_use]
    pub fn pool_size(&self, name: &str) -> usize {
        self.pools.get(name).map_or(0, |p| p.storage.len())
    }

    /// Drops every stored object of pool `name`. The factory stays registered.
    pub fn clear_pool(&mut self, name: &str) {
        if let Some(pool) = self.pools.get_mut(name) {
            pool.storage.clear();
        }
    }

    /// Drops every stored object of every pool. Factories stay registered.
    pub fn clear_all(&mut self) {
        for pool in self.pools.values_mut() {
            pool.storage.clear();
        }
    }

    /// Trims oversized pools, at most once per
    /// [`PoolConfig::cleanup_interval_ms`].
    ///
    /// `now_ms` is a monotonic timestamp supplied by the caller; the interval
    /// is measured from zero for the first run. Every pool holding more than
    /// half of `max_pool_size` loses its oldest quarter. Returns the number of
    /// objects dropped.
    pub fn auto_cleanup(&mut self, now_ms: u64) -> usize {
        if now_ms.saturating_sub(self.last_cleanup_ms) < self.config.cleanup_interval_ms {
            return 0;
        }
        self.last_cleanup_ms = now_ms;
        let half = self.config.max_pool_size / 2;
        let mut evicted = 0;
        for pool in self.pools.values_mut() {
            let len = pool.storage.len();
            if len > half {
                let quarter = len / 4;
                pool.storage.drain(..quarter);
                evicted += quarter;
            }
        }
        if evicted > 0 {
            self.counters.evicted += evicted as u64;
            tracing::debug!(evicted, "recycle pools trimmed");
        }
        evicted
    }

    /// Counter snapshot.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let c = self.counters;
        let mut pool_sizes: Vec<(String, usize)> = self
            .pools
            .iter()
            .map(|(name, pool)| (name.clone(), pool.storage.len()))
            .collect();
        pool_sizes.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        let reuse_rate = if c.acquired == 0 {
            0.0
        } else {
            c.reused as f64 / c.acquired as f64
        };
        PoolStats {
            total_acquired: c.acquired,
            total_released: c.released,
            total_created: c.created,
            total_reused: c.reused,
            total_rejected: c.rejected,
            total_evicted: c.evicted,
            pool_sizes,
            reuse_rate,
        }
    }

    /// Zeroes the cumulative counters. Stored objects are kept.
    pub fn reset_stats(&mut self) {
        self.counters = Counters::default();
    }

    fn pool_entry(&mut self, name: &str) -> &mut Pool<T, A> {
        self.pools.entry(String::from(name)).or_default()
    }
}

impl<T, A> fmt::Debug for RecyclePool<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stored: usize = self.pools.values().map(|p| p.storage.len()).sum();
        f.debug_struct("RecyclePool")
            .field("pools", &self.pools.len())
            .field("stored", &stored)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
