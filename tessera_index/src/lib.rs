// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tessera Index: a quadtree over widget bounding boxes.
//!
//! Routing a pointer event or bounding a repaint should not scan every widget
//! on screen. This crate answers "what occupies this point" and "what touches
//! this region" by recursive subdivision of the display surface.
//!
//! - [`Rect`]: integer rectangle in display-surface units (terminal cells).
//! - [`Bounded`]: the one capability an indexed or tracked object must offer.
//! - [`QuadTree`]: the spatial index, keyed by a caller-chosen handle type.
//! - [`IndexConfig`]: split limits (objects per node, depth, minimum size).
//! - [`IndexStats`] / [`NodeInfo`]: diagnostics and debug-overlay support.
//!
//! ## Semantics
//!
//! - Point queries are half-open: `x ∈ [obj.x, obj.x + obj.width)`.
//! - Region queries and node pruning treat touching edges as overlap.
//! - Containment used for placement is boundary-inclusive, so an object equal
//!   to a node's bounds belongs to that node.
//! - An object spanning a quadrant boundary is stored at the lowest common
//!   ancestor and is never split.
//! - Removal does not rebalance; nodes only go away on [`QuadTree::clear`],
//!   which keeps the shape and empties the contents.
//!
//! ```rust
//! use tessera_index::{QuadTree, Rect};
//!
//! let mut tree = QuadTree::new(Rect::new(0, 0, 100, 100));
//! for i in 0..11 {
//!     tree.insert(i, Rect::new(i * 4, 0, 4, 4));
//! }
//! assert!(tree.stats().node_count > 1);
//! assert_eq!(tree.query(9, 1), vec![2]);
//! assert_eq!(tree.query_region(Rect::new(0, 0, 5, 5)), vec![0, 1]);
//! ```
//!
//! ## Features
//!
//! - `kurbo` (default): `From<kurbo::Rect>` flooring conversion. Needs `std`
//!   or `libm` for the float math.
//! - `serde`: serialization for [`IndexConfig`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod quadtree;
mod types;

pub use quadtree::{IndexConfig, IndexStats, NodeInfo, QuadTree};
pub use types::{Bounded, Rect};
