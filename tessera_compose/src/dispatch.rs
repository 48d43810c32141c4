// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer dispatch through the spatial index.
//!
//! Pointer-class events are offered only to the widgets under the pointer, as
//! reported by [`QuadTree::query`], instead of walking the whole widget tree.
//! Everything else goes to a caller-supplied fallback path unchanged.
//!
//! ```
//! use tessera_compose::{DispatchCoordinator, Event, EventKind, Outcome, Route};
//! use tessera_index::{QuadTree, Rect};
//!
//! let mut index = QuadTree::new(Rect::new(0, 0, 80, 25));
//! index.insert('a', Rect::new(0, 0, 10, 3));
//! index.insert('b', Rect::new(5, 1, 10, 3));
//!
//! let mut dispatcher = DispatchCoordinator::new();
//! let mut seen = Vec::new();
//! let result = dispatcher.dispatch(
//!     &index,
//!     &Event::new(EventKind::Press, 6, 2),
//!     |key, _| {
//!         seen.push(key);
//!         Outcome::Continue
//!     },
//!     |_| false,
//! );
//!
//! assert_eq!(result.route, Route::Spatial);
//! assert_eq!(seen, vec!['a', 'b']);
//! ```

use tessera_index::QuadTree;

use crate::event::{Event, EventKind, EventKinds, Outcome};

/// Which path an event took.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// Offered to the candidates found under the pointer.
    Spatial,
    /// Handed to the fallback path.
    Fallback,
}

/// Result of [`DispatchCoordinator::dispatch`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatched {
    /// Path taken.
    pub route: Route,
    /// Candidates found under the pointer. Zero on the fallback path.
    pub candidates: usize,
    /// Handlers that actually ran.
    pub invoked: usize,
    /// A handler returned [`Outcome::StopAndConsume`], or the fallback
    /// reported the event as consumed.
    pub consumed: bool,
}

/// Dispatch counters, see [`DispatchCoordinator::stats`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Events routed through the spatial index.
    pub spatial: u64,
    /// Events handed to the fallback path.
    pub fallback: u64,
    /// Handlers invoked on the spatial path.
    pub handlers_invoked: u64,
}

/// Routes pointer-class events through a [`QuadTree`].
#[derive(Clone, Debug, Default)]
pub struct DispatchCoordinator {
    pointer_kinds: EventKinds,
    stats: DispatchStats,
}

impl DispatchCoordinator {
    /// Routes press, drag, and drop spatially.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes the given kinds spatially.
    #[must_use]
    pub fn with_pointer_kinds(pointer_kinds: EventKinds) -> Self {
        Self {
            pointer_kinds,
            stats: DispatchStats::default(),
        }
    }

    /// Kinds routed spatially.
    #[must_use]
    pub fn pointer_kinds(&self) -> EventKinds {
        self.pointer_kinds
    }

    /// Changes the kinds routed spatially.
    pub fn set_pointer_kinds(&mut self, pointer_kinds: EventKinds) {
        self.pointer_kinds = pointer_kinds;
    }

    /// Returns `true` if `kind` is routed spatially.
    #[must_use]
    pub fn is_pointer(&self, kind: EventKind) -> bool {
        self.pointer_kinds.has(kind)
    }

    /// Delivers one event.
    ///
    /// For pointer kinds, queries `index` at the event position and calls
    /// `handler` for each candidate in query order: objects stored at a node
    /// before those of its children, children top-left, top-right,
    /// bottom-left, bottom-right. Each handler runs to completion before the
    /// next; [`Outcome::Stop`] and [`Outcome::StopAndConsume`] end the walk.
    ///
    /// Other kinds go to `fallback`, which returns whether it consumed the event.
    pub fn dispatch<K, P, H, F>(
        &mut self,
        index: &QuadTree<K>,
        event: &Event<P>,
        mut handler: H,
        fallback: F,
    ) -> Dispatched
    where
        K: Copy + Eq,
        H: FnMut(K, &Event<P>) -> Outcome,
        F: FnOnce(&Event<P>) -> bool,
    {
        if !self.is_pointer(event.kind) {
            self.stats.fallback += 1;
            return Dispatched {
                route: Route::Fallback,
                candidates: 0,
                invoked: 0,
                consumed: fallback(event),
            };
        }

        let candidates = index.query(event.x, event.y);
        let mut invoked = 0;
        let mut consumed = false;
        for key in candidates.iter().copied() {
            invoked += 1;
            match handler(key, event) {
                Outcome::Continue => {}
                Outcome::Stop => break,
                Outcome::StopAndConsume => {
                    consumed = true;
                    break;
                }
            }
        }
        self.stats.spatial += 1;
        self.stats.handlers_invoked += invoked as u64;
        tracing::trace!(
            kind = ?event.kind,
            x = event.x,
            y = event.y,
            candidates = candidates.len(),
            invoked,
            consumed,
            "spatial dispatch"
        );
        Dispatched {
            route: Route::Spatial,
            candidates: candidates.len(),
            invoked,
            consumed,
        }
    }

    /// Counter snapshot.
    #[must_use]
    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Zeroes the counters.
    pub fn reset_stats(&mut self) {
        self.stats = DispatchStats::default();
    }
}
