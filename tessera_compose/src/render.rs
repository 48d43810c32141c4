// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw passes: full or clipped-partial redraws driven by a [`RegionMerger`].

use tessera_index::{QuadTree, Rect};
use tessera_region::{DrawKind, RegionMerger};

use crate::surface::DisplaySurface;

/// What a [`draw_pass`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// `draw_all` ran once, unclipped.
    Full,
    /// `draw_all` ran once per merged region, each time clipped to it.
    Partial {
        /// Number of clipped draws. Zero when nothing was dirty.
        regions: usize,
    },
}

/// Runs one frame.
///
/// Asks `regions` for the merged dirty set on a surface of the current
/// resolution. A full redraw calls `draw_all(surface, None)` once. A partial
/// redraw clips the surface to each region in turn, calls
/// `draw_all(surface, Some(region))`, and lifts the clip again; regions are
/// drawn strictly one after the other. The pass is counted on `regions` and
/// the pending dirt is cleared either way.
///
/// # Example
///
/// ```
/// use tessera_compose::render::{DrawOutcome, draw_pass};
/// use tessera_compose::DisplaySurface;
/// use tessera_region::RegionMerger;
///
/// struct Screen { clips: usize }
/// impl DisplaySurface for Screen {
///     fn resolution(&self) -> (u32, u32) { (80, 25) }
///     fn set_draw_clip(&mut self, _: i32, _: i32, _: i32, _: i32) { self.clips += 1; }
///     fn reset_draw_clip(&mut self) {}
/// }
///
/// let mut regions = RegionMerger::new();
/// regions.mark_region(0, 0, 4, 1);
/// regions.mark_region(40, 10, 4, 1);
///
/// let mut screen = Screen { clips: 0 };
/// let mut draws = 0;
/// let outcome = draw_pass(&mut regions, &mut screen, |_, _| draws += 1);
///
/// assert_eq!(outcome, DrawOutcome::Partial { regions: 2 });
/// assert_eq!((draws, screen.clips), (2, 2));
/// assert!(regions.is_empty());
/// ```
pub fn draw_pass<S, F>(regions: &mut RegionMerger, surface: &mut S, mut draw_all: F) -> DrawOutcome
where
    S: DisplaySurface + ?Sized,
    F: FnMut(&mut S, Option<Rect>),
{
    let (width, height) = surface.resolution();
    let outcome = match regions.merge_regions(width, height) {
        None => {
            draw_all(surface, None);
            regions.record_draw(DrawKind::Full);
            DrawOutcome::Full
        }
        Some(merged) => {
            for region in &merged {
                surface.set_draw_clip(region.x, region.y, region.right(), region.bottom());
                draw_all(surface, Some(*region));
                surface.reset_draw_clip();
            }
            regions.record_draw(DrawKind::Partial);
            DrawOutcome::Partial {
                regions: merged.len(),
            }
        }
    };
    regions.clear();
    tracing::trace!(?outcome, "draw pass");
    outcome
}

/// Outlines every quadtree node on `surface`.
///
/// Diagnostics only: walks the whole tree.
pub fn debug_draw<K, S>(tree: &QuadTree<K>, surface: &mut S)
where
    K: Copy + Eq,
    S: DisplaySurface + ?Sized,
{
    tree.visit_nodes(|node| surface.draw_rectangle(node.bounds));
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        Clip(i32, i32, i32, i32),
        Draw(Option<Rect>),
        Unclip,
        Outline(Rect),
    }

    struct Recorder {
        size: (u32, u32),
        calls: Vec<Call>,
    }

    impl Recorder {
        fn new(width: u32, height: u32) -> Self {
            Self {
                size: (width, height),
                calls: Vec::new(),
            }
        }
    }

    impl DisplaySurface for Recorder {
        fn resolution(&self) -> (u32, u32) {
            self.size
        }

        fn set_draw_clip(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
            self.calls.push(Call::Clip(x1, y1, x2, y2));
        }

        fn reset_draw_clip(&mut self) {
            self.calls.push(Call::Unclip);
        }

        fn draw_rectangle(&mut self, rect: Rect) {
            self.calls.push(Call::Outline(rect));
        }
    }

    #[test]
    fn partial_pass_clips_each_region_in_order() {
        let mut regions = RegionMerger::new();
        regions.mark_region(1, 1, 10, 10);
        regions.mark_region(50, 50, 5, 5);
        let mut screen = Recorder::new(100, 100);
        let outcome = draw_pass(&mut regions, &mut screen, |s, r| s.calls.push(Call::Draw(r)));

        assert_eq!(outcome, DrawOutcome::Partial { regions: 2 });
        assert_eq!(
            screen.calls,
            vec![
                Call::Clip(1, 1, 11, 11),
                Call::Draw(Some(Rect::new(1, 1, 10, 10))),
                Call::Unclip,
                Call::Clip(50, 50, 55, 55),
                Call::Draw(Some(Rect::new(50, 50, 5, 5))),
                Call::Unclip,
            ]
        );
        assert!(regions.is_empty());
        assert_eq!(regions.stats().partial_redraws, 1);
    }

    #[test]
    fn heavy_dirt_draws_everything_once() {
        let mut regions = RegionMerger::new();
        regions.mark_region(0, 0, 60, 60);
        let mut screen = Recorder::new(100, 100);
        let outcome = draw_pass(&mut regions, &mut screen, |s, r| s.calls.push(Call::Draw(r)));

        assert_eq!(outcome, DrawOutcome::Full);
        assert_eq!(screen.calls, vec![Call::Draw(None)]);
        assert!(regions.is_empty());
        let stats = regions.stats();
        assert_eq!((stats.total_draws, stats.full_redraws), (1, 1));
    }

    #[test]
    fn disabled_tracking_always_draws_everything() {
        let mut regions = RegionMerger::new();
        regions.set_enabled(false);
        let mut screen = Recorder::new(80, 25);
        for _ in 0..3 {
            assert_eq!(
                draw_pass(&mut regions, &mut screen, |_, _| {}),
                DrawOutcome::Full
            );
        }
        assert_eq!(regions.stats().full_redraws, 3);
    }

    #[test]
    fn clean_frame_draws_nothing() {
        let mut regions = RegionMerger::new();
        let mut screen = Recorder::new(80, 25);
        let outcome = draw_pass(&mut regions, &mut screen, |s, r| s.calls.push(Call::Draw(r)));
        assert_eq!(outcome, DrawOutcome::Partial { regions: 0 });
        assert!(screen.calls.is_empty());
    }

    #[test]
    fn regions_at_the_far_edge_clip_without_overflow() {
        let mut regions = RegionMerger::new();
        assert!(!regions.mark_region(i32::MAX - 2, 0, 10, 10));
        assert!(regions.mark_region(i32::MAX - 10, 0, 10, 1));
        let mut screen = Recorder::new(1000, 1000);
        let outcome = draw_pass(&mut regions, &mut screen, |s, r| s.calls.push(Call::Draw(r)));

        assert_eq!(outcome, DrawOutcome::Partial { regions: 1 });
        assert_eq!(
            screen.calls,
            vec![
                Call::Clip(i32::MAX - 10, 0, i32::MAX, 1),
                Call::Draw(Some(Rect::new(i32::MAX - 10, 0, 10, 1))),
                Call::Unclip,
            ]
        );
    }

    #[test]
    fn debug_draw_outlines_every_node() {
        let mut tree = QuadTree::new(Rect::new(0, 0, 40, 40));
        for i in 0..10 {
            tree.insert(i, Rect::new(i, 0, 1, 1));
        }
        let mut screen = Recorder::new(40, 40);
        debug_draw(&tree, &mut screen);
        assert_eq!(screen.calls.len(), tree.stats().node_count);
        assert_eq!(screen.calls[0], Call::Outline(Rect::new(0, 0, 40, 40)));
    }
}
