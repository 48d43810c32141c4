// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The display surface the draw pass renders through.

use tessera_index::Rect;

/// A terminal-style drawing target.
///
/// Only the clipping contract matters here: while a clip is active, nothing
/// outside it may be committed to the screen. The actual drawing primitives
/// belong to the host.
pub trait DisplaySurface {
    /// Surface size in cells.
    fn resolution(&self) -> (u32, u32);

    /// Restricts drawing to `x1..x2` by `y1..y2`. The far edges are exclusive.
    fn set_draw_clip(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);

    /// Lifts the clip set by [`set_draw_clip`](DisplaySurface::set_draw_clip).
    fn reset_draw_clip(&mut self);

    /// Outlines a rectangle. Only the debug overlay calls this.
    fn draw_rectangle(&mut self, _rect: Rect) {}
}
