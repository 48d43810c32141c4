// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Recycle`] capability and release errors.

use alloc::boxed::Box;
use core::fmt;

/// An object that can be parked in a [`RecyclePool`](crate::RecyclePool).
///
/// [`detach`](Recycle::detach) runs on every accepted release. It must drop
/// everything that would keep unrelated state alive while the object sits in
/// storage: the parent link, the child collection, registered event handlers,
/// and transient interaction flags such as pressed or dragging. Without it a
/// pool turns into a retention leak for whole widget subtrees.
pub trait Recycle {
    /// Drops cross-references before the object enters storage.
    fn detach(&mut self);

    /// Records the pool the object belongs to. The default ignores the tag.
    fn set_pool_tag(&mut self, _pool: &str) {}

    /// Pool recorded by [`set_pool_tag`](Recycle::set_pool_tag), if any.
    fn pool_tag(&self) -> Option<&str> {
        None
    }
}

impl<R: Recycle + ?Sized> Recycle for Box<R> {
    fn detach(&mut self) {
        (**self).detach();
    }

    fn set_pool_tag(&mut self, pool: &str) {
        (**self).set_pool_tag(pool);
    }

    fn pool_tag(&self) -> Option<&str> {
        (**self).pool_tag()
    }
}

/// A release that the pool refused. The object is handed back untouched.
#[derive(Clone, PartialEq, Eq)]
pub enum ReleaseError<T> {
    /// The pool already holds `capacity` objects.
    Full {
        /// The rejected object.
        object: T,
        /// The limit that was hit.
        capacity: usize,
    },
    /// [`RecyclePool::recycle`](crate::RecyclePool::recycle) was given an
    /// object without a pool tag.
    Untagged(T),
}

impl<T> ReleaseError<T> {
    /// Returns the rejected object.
    pub fn into_inner(self) -> T {
        match self {
            Self::Full { object, .. } | Self::Untagged(object) => object,
        }
    }
}

impl<T> fmt::Debug for ReleaseError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full { capacity, .. } => f
                .debug_struct("Full")
                .field("capacity", capacity)
                .finish_non_exhaustive(),
            Self::Untagged(_) => f.write_str("Untagged(..)"),
        }
    }
}

impl<T> fmt::Display for ReleaseError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full { capacity, .. } => {
                write!(f, "pool is at capacity ({capacity} objects)")
            }
            Self::Untagged(_) => f.write_str("object carries no pool tag"),
        }
    }
}

impl<T> core::error::Error for ReleaseError<T> {}
