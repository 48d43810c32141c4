// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tessera Region: incremental redraw bookkeeping.
//!
//! A retained-mode UI should not repaint the whole surface when one label
//! changes. [`RegionMerger`] collects the rectangles touched since the last
//! frame, folds overlapping and adjacent ones together, and at draw time
//! decides between a partial redraw of the merged regions and a full redraw.
//!
//! ## Decision rule
//!
//! - Pending area above [`RegionConfig::dirty_threshold`] (default 30%) of the
//!   screen: redraw everything, clipping would cost more than it saves.
//! - Tracking disabled, or degraded after more than
//!   [`RegionConfig::max_dirty_regions`] disjoint regions piled up: redraw
//!   everything until tracking is re-enabled.
//! - Otherwise: one clipped redraw per merged region.
//!
//! Nothing here fails loudly. Marking sits on the rendering hot path, so bad
//! input is dropped and overflow degrades instead of erroring.
//!
//! ```rust
//! use tessera_region::{DrawKind, RegionMerger};
//!
//! let mut merger = RegionMerger::new();
//! merger.mark_region(2, 2, 8, 1);
//!
//! match merger.merge_regions(80, 25) {
//!     Some(regions) => {
//!         for region in &regions {
//!             // clip to `region`, draw, unclip
//!             let _ = region;
//!         }
//!         merger.record_draw(DrawKind::Partial);
//!     }
//!     None => merger.record_draw(DrawKind::Full),
//! }
//! merger.clear();
//! assert_eq!(merger.stats().partial_redraws, 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod merger;
mod stats;

pub use merger::{RegionConfig, RegionMerger};
pub use stats::{DrawKind, DrawStats};
