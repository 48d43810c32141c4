// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tessera Compose: partial redraws and spatial event routing for retained
//! terminal UIs.
//!
//! This crate wires the building blocks together:
//!
//! - [`render::draw_pass`] asks a [`RegionMerger`](tessera_region::RegionMerger)
//!   for the merged dirty set and either redraws the whole
//!   [`DisplaySurface`] once or clips it to each region in turn.
//! - [`DispatchCoordinator`] offers pointer events only to the widgets a
//!   [`QuadTree`](tessera_index::QuadTree) reports under the pointer and hands
//!   every other event to a fallback path.
//! - [`SpatialContainer`] owns [`Widget`]s behind generational [`WidgetId`]s
//!   and keeps its index and the dirty set in sync with every change.
//! - [`Session`] is the explicit context object: one region tracker, one
//!   [`RecyclePool`](tessera_pool::RecyclePool), one dispatcher, and the
//!   [`Config`] they were built from.
//!
//! Everything runs on the caller's thread. Draw passes and handler walks are
//! strictly sequential.
//!
//! ## Logging
//!
//! Diagnostics go through `tracing`: a `warn` event when region tracking
//! degrades, `debug` events for rejected inserts, refused releases, pool
//! trimming, and config overrides, and `trace` events per draw pass and
//! dispatch. No subscriber is installed here.
//!
//! ## Features
//!
//! - `std` (default): forwards to `tessera_index/std`.
//! - `serde`: serialization for [`Config`] and the per-crate configs.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod container;
mod dispatch;
mod event;
pub mod render;
mod session;
mod surface;

pub use config::{Config, ConfigError};
pub use container::{SpatialContainer, Widget, WidgetId};
pub use dispatch::{DispatchCoordinator, DispatchStats, Dispatched, Route};
pub use event::{Event, EventKind, EventKinds, Outcome};
pub use render::{DrawOutcome, debug_draw, draw_pass};
pub use session::{Session, SessionStats};
pub use surface::DisplaySurface;
