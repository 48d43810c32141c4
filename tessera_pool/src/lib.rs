// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tessera Pool: recycling for short-lived UI objects.
//!
//! Buttons, labels, panels and inputs come and go constantly in a retained
//! UI. A [`RecyclePool`] keeps released instances per named pool and hands them
//! back out instead of constructing fresh ones.
//!
//! - Acquire is LIFO: the most recently released object is reused first, after
//!   the pool's resetter reinitializes it.
//! - Release is bounded by [`PoolConfig::max_pool_size`]; a full pool refuses
//!   the object and returns it inside [`ReleaseError`].
//! - Every accepted release calls [`Recycle::detach`], so parked objects never
//!   keep parents, children, or handlers alive.
//! - [`RecyclePool::auto_cleanup`] trims long-lived pools from the oldest end,
//!   at most once per [`PoolConfig::cleanup_interval_ms`].
//!
//! This crate is `no_std` and uses `alloc`. It has no clock; callers pass a
//! monotonic timestamp to [`RecyclePool::auto_cleanup`].

#![no_std]

extern crate alloc;

mod pool;
mod recycle;

pub use pool::{PoolConfig, PoolStats, RecyclePool};
pub use recycle::{Recycle, ReleaseError};
