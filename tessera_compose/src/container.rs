// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A widget container that keeps a quadtree of its children in sync.

use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashSet;
use tessera_index::{Bounded, IndexConfig, QuadTree, Rect};
use tessera_region::RegionMerger;

use crate::dispatch::{DispatchCoordinator, Dispatched};
use crate::event::{Event, Outcome};
use crate::render::{DrawOutcome, draw_pass};
use crate::surface::DisplaySurface;

/// A child of a [`SpatialContainer`].
pub trait Widget: Bounded {
    /// Payload type of the events this widget handles.
    type Payload;

    /// Moves or resizes the widget. Only the container calls this.
    fn set_bounds(&mut self, bounds: Rect);

    /// Paints the widget. Clipping, if any, is already in effect.
    fn draw(&self, _surface: &mut dyn DisplaySurface) {}

    /// Reacts to a pointer event that landed inside the widget's bounds.
    fn handle_event(&mut self, _event: &Event<Self::Payload>) -> Outcome {
        Outcome::Continue
    }
}

/// Generational handle of a child in a [`SpatialContainer`].
///
/// Removing a child frees its slot; a later child reusing the slot gets a
/// higher generation, so a stale `WidgetId` never refers to the new child.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WidgetId(u32, u32);

impl WidgetId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot index. Reused after removal.
    #[must_use]
    pub const fn slot(self) -> u32 {
        self.0
    }

    /// Slot generation.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

struct Slot<W> {
    generation: u32,
    indexed: bool,
    widget: Option<W>,
}

/// Owns a set of widgets and a [`QuadTree`] over their bounds.
///
/// Every structural or geometric change goes through the container, which
/// updates the index and marks the affected screen area dirty on the
/// [`RegionMerger`] passed in: removal marks the old bounds, addition the new
/// ones, and a move both.
///
/// Children whose bounds do not fit inside the container bounds are kept and
/// drawn but not indexed, so pointer events do not reach them until they are
/// moved back inside.
pub struct SpatialContainer<W> {
    bounds: Rect,
    slots: Vec<Slot<W>>,
    free: Vec<u32>,
    order: Vec<WidgetId>,
    index: QuadTree<WidgetId>,
}

impl<W: Widget> SpatialContainer<W> {
    /// Creates an empty container with the default [`IndexConfig`].
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self::with_config(bounds, IndexConfig::default())
    }

    /// Creates an empty container.
    #[must_use]
    pub fn with_config(bounds: Rect, config: IndexConfig) -> Self {
        Self {
            bounds,
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
            index: QuadTree::with_config(bounds, config),
        }
    }

    /// Area covered by the container and its index.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `true` if `id` refers to a current child.
    #[must_use]
    pub fn is_alive(&self, id: WidgetId) -> bool {
        self.get(id).is_some()
    }

    /// Returns `true` if `id` is a current child that pointer events can reach.
    #[must_use]
    pub fn is_indexed(&self, id: WidgetId) -> bool {
        self.is_alive(id) && self.slots[id.idx()].indexed
    }

    /// Adds `widget` on top of the existing children and marks its bounds dirty.
    pub fn add_child(&mut self, regions: &mut RegionMerger, widget: W) -> WidgetId {
        let bounds = widget.bounds();
        let id = match self.free.pop() {
            Some(idx) => {
                let slot = &mut self.slots[idx as usize];
                slot.widget = Some(widget);
                WidgetId::new(idx, slot.generation)
            }
            None => {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "more than u32::MAX children is not supported"
                )]
                let idx = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    indexed: false,
                    widget: Some(widget),
                });
                WidgetId::new(idx, 0)
            }
        };
        self.order.push(id);
        self.index_child(id, bounds);
        regions.mark_rect(bounds);
        id
    }

    /// Removes a child, marks its bounds dirty, and hands it back.
    ///
    /// Returns `None` if `id` is stale.
    pub fn remove_child(&mut self, regions: &mut RegionMerger, id: WidgetId) -> Option<W> {
        self.get(id)?;
        let slot = &mut self.slots[id.idx()];
        let widget = slot.widget.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        slot.indexed = false;
        self.free.push(id.0);
        self.order.retain(|o| *o != id);
        self.index.remove(&id);
        regions.mark_rect(widget.bounds());
        Some(widget)
    }

    /// Shared access to a child.
    #[must_use]
    pub fn get(&self, id: WidgetId) -> Option<&W> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.widget.as_ref()
    }

    /// Runs `f` on a child and resynchronizes afterwards.
    ///
    /// `f` may change anything, including the bounds. The bounds before and
    /// after are marked dirty and the index is updated if they differ.
    pub fn update_child<R>(
        &mut self,
        regions: &mut RegionMerger,
        id: WidgetId,
        f: impl FnOnce(&mut W) -> R,
    ) -> Option<R> {
        let widget = slot_mut(&mut self.slots, id)?;
        let old = widget.bounds();
        let result = f(widget);
        let new = widget.bounds();
        regions.mark_rect(old);
        if new != old {
            regions.mark_rect(new);
            self.index.remove(&id);
            self.index_child(id, new);
        }
        Some(result)
    }

    /// Gives a child new bounds.
    ///
    /// Returns `false` if `id` is stale.
    pub fn move_child(&mut self, regions: &mut RegionMerger, id: WidgetId, bounds: Rect) -> bool {
        self.update_child(regions, id, |w| w.set_bounds(bounds)).is_some()
    }

    /// Marks a child's bounds dirty after a content-only change.
    pub fn mark_child_dirty(&self, regions: &mut RegionMerger, id: WidgetId) -> bool {
        match self.get(id) {
            Some(widget) => regions.mark_dirty(widget),
            None => false,
        }
    }

    /// Changes the container bounds and rebuilds the index from scratch.
    ///
    /// The old and the new container area are both marked dirty.
    pub fn resize(&mut self, regions: &mut RegionMerger, bounds: Rect) {
        regions.mark_rect(self.bounds);
        regions.mark_rect(bounds);
        let config = *self.index.config();
        self.bounds = bounds;
        self.index = QuadTree::with_config(bounds, config);
        for id in self.order.clone() {
            if let Some(widget) = self.get(id) {
                let child = widget.bounds();
                self.index_child(id, child);
            }
        }
        tracing::debug!(?bounds, children = self.order.len(), "container index rebuilt");
    }

    /// Children under the point, in index query order.
    #[must_use]
    pub fn hit_test(&self, x: i32, y: i32) -> Vec<WidgetId> {
        self.index.query(x, y)
    }

    /// The index over the children.
    #[must_use]
    pub fn index(&self) -> &QuadTree<WidgetId> {
        &self.index
    }

    /// Children bottom to top.
    pub fn children(&self) -> impl Iterator<Item = (WidgetId, &W)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.get(*id).map(|w| (*id, w)))
    }

    /// Delivers an event to the children under the pointer, or to `fallback`
    /// for kinds that are not routed spatially.
    pub fn dispatch<F>(
        &mut self,
        dispatcher: &mut DispatchCoordinator,
        event: &Event<W::Payload>,
        fallback: F,
    ) -> Dispatched
    where
        F: FnOnce(&Event<W::Payload>) -> bool,
    {
        let slots = &mut self.slots;
        dispatcher.dispatch(
            &self.index,
            event,
            |id, event| match slot_mut(slots, id) {
                Some(widget) => widget.handle_event(event),
                None => Outcome::Continue,
            },
            fallback,
        )
    }

    /// Runs one [`draw_pass`] over the children.
    ///
    /// A full redraw paints every child bottom to top. A partial redraw paints,
    /// per region, only the children the index reports as touching it, still
    /// bottom to top.
    pub fn draw<S: DisplaySurface>(
        &self,
        regions: &mut RegionMerger,
        surface: &mut S,
    ) -> DrawOutcome {
        let mut visible = HashSet::new();
        draw_pass(regions, surface, |surface, clip| {
            let Some(clip) = clip else {
                for (_, widget) in self.children() {
                    widget.draw(&mut *surface);
                }
                return;
            };
            visible.clear();
            self.index.visit_region(clip, |id| {
                visible.insert(id);
            });
            for (id, widget) in self.children() {
                let unindexed = !self.slots[id.idx()].indexed && widget.bounds().touches(&clip);
                if visible.contains(&id) || unindexed {
                    widget.draw(&mut *surface);
                }
            }
        })
    }

    fn index_child(&mut self, id: WidgetId, bounds: Rect) {
        let indexed = self.index.insert(id, bounds);
        if !indexed {
            tracing::debug!(?id, ?bounds, "child outside container; not indexed");
        }
        self.slots[id.idx()].indexed = indexed;
    }
}

fn slot_mut<W>(slots: &mut [Slot<W>], id: WidgetId) -> Option<&mut W> {
    let slot = slots.get_mut(id.idx())?;
    if slot.generation != id.1 {
        return None;
    }
    slot.widget.as_mut()
}

impl<W> fmt::Debug for SpatialContainer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialContainer")
            .field("bounds", &self.bounds)
            .field("children", &self.order.len())
            .field("free_slots", &self.free.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    type PaintLog = Rc<RefCell<Vec<char>>>;

    struct Tile {
        bounds: Rect,
        name: char,
        hits: u32,
        consume: bool,
        painted: PaintLog,
    }

    impl Bounded for Tile {
        fn bounds(&self) -> Rect {
            self.bounds
        }
    }

    impl Widget for Tile {
        type Payload = ();

        fn set_bounds(&mut self, bounds: Rect) {
            self.bounds = bounds;
        }

        fn draw(&self, _surface: &mut dyn DisplaySurface) {
            self.painted.borrow_mut().push(self.name);
        }

        fn handle_event(&mut self, _event: &Event) -> Outcome {
            self.hits += 1;
            if self.consume {
                Outcome::StopAndConsume
            } else {
                Outcome::Continue
            }
        }
    }

    struct Screen;

    impl DisplaySurface for Screen {
        fn resolution(&self) -> (u32, u32) {
            (80, 25)
        }
        fn set_draw_clip(&mut self, _: i32, _: i32, _: i32, _: i32) {}
        fn reset_draw_clip(&mut self) {}
    }

    fn tile(name: char, bounds: Rect, painted: &PaintLog) -> Tile {
        Tile {
            bounds,
            name,
            hits: 0,
            consume: false,
            painted: Rc::clone(painted),
        }
    }

    fn screen() -> Rect {
        Rect::new(0, 0, 80, 25)
    }

    #[test]
    fn add_indexes_and_marks_dirty() {
        let painted = PaintLog::default();
        let mut regions = RegionMerger::new();
        let mut container = SpatialContainer::new(screen());
        let a = container.add_child(&mut regions, tile('a', Rect::new(2, 2, 5, 1), &painted));

        assert!(container.is_indexed(a));
        assert_eq!(container.hit_test(3, 2), vec![a]);
        assert_eq!(regions.regions(), &[Rect::new(2, 2, 5, 1)]);
    }

    #[test]
    fn stale_ids_never_alias() {
        let painted = PaintLog::default();
        let mut regions = RegionMerger::new();
        let mut container = SpatialContainer::new(screen());
        let a = container.add_child(&mut regions, tile('a', Rect::new(0, 0, 5, 1), &painted));
        let removed = container.remove_child(&mut regions, a).unwrap();
        assert_eq!(removed.name, 'a');
        assert!(container.is_empty());

        let b = container.add_child(&mut regions, tile('b', Rect::new(0, 0, 5, 1), &painted));
        assert_eq!(a.slot(), b.slot());
        assert_ne!(a, b);
        assert!(container.get(a).is_none());
        assert!(container.remove_child(&mut regions, a).is_none());
        assert_eq!(container.get(b).unwrap().name, 'b');
        assert_eq!(container.hit_test(1, 0), vec![b]);
    }

    #[test]
    fn move_marks_old_and_new_bounds() {
        let painted = PaintLog::default();
        let mut regions = RegionMerger::new();
        let mut container = SpatialContainer::new(screen());
        let a = container.add_child(&mut regions, tile('a', Rect::new(0, 0, 4, 1), &painted));
        regions.clear();

        assert!(container.move_child(&mut regions, a, Rect::new(40, 20, 4, 1)));
        assert_eq!(
            regions.regions(),
            &[Rect::new(0, 0, 4, 1), Rect::new(40, 20, 4, 1)]
        );
        assert!(container.hit_test(1, 0).is_empty());
        assert_eq!(container.hit_test(41, 20), vec![a]);
        assert_eq!(container.index().len(), 1);
    }

    #[test]
    fn children_outside_are_kept_but_unreachable() {
        let painted = PaintLog::default();
        let mut regions = RegionMerger::new();
        let mut container = SpatialContainer::new(Rect::new(0, 0, 20, 10));
        let a = container.add_child(&mut regions, tile('a', Rect::new(15, 5, 10, 1), &painted));

        assert!(container.is_alive(a));
        assert!(!container.is_indexed(a));
        assert!(container.hit_test(16, 5).is_empty());

        container.resize(&mut regions, Rect::new(0, 0, 40, 10));
        assert!(container.is_indexed(a));
        assert_eq!(container.hit_test(16, 5), vec![a]);
    }

    #[test]
    fn dispatch_stops_at_consumer() {
        let painted = PaintLog::default();
        let mut regions = RegionMerger::new();
        let mut dispatcher = DispatchCoordinator::new();
        let mut container = SpatialContainer::new(screen());
        let mut top = tile('t', Rect::new(0, 0, 10, 2), &painted);
        top.consume = true;
        let a = container.add_child(&mut regions, top);
        let b = container.add_child(&mut regions, tile('b', Rect::new(0, 0, 10, 2), &painted));

        let press = Event::new(EventKind::Press, 1, 1);
        let result = container.dispatch(&mut dispatcher, &press, |_| false);
        assert!(result.consumed);
        assert_eq!(result.invoked, 1);
        assert_eq!(container.get(a).unwrap().hits, 1);
        assert_eq!(container.get(b).unwrap().hits, 0);
    }

    #[test]
    fn partial_draw_paints_only_touched_children_in_order() {
        let painted = PaintLog::default();
        let mut regions = RegionMerger::new();
        let mut container = SpatialContainer::new(screen());
        container.add_child(&mut regions, tile('a', Rect::new(0, 0, 5, 1), &painted));
        let b = container.add_child(&mut regions, tile('b', Rect::new(30, 10, 5, 1), &painted));
        container.add_child(&mut regions, tile('c', Rect::new(31, 10, 2, 1), &painted));
        regions.clear();

        assert!(container.mark_child_dirty(&mut regions, b));
        let outcome = container.draw(&mut regions, &mut Screen);

        assert_eq!(outcome, DrawOutcome::Partial { regions: 1 });
        assert_eq!(*painted.borrow(), vec!['b', 'c']);
    }

    #[test]
    fn full_draw_paints_everything() {
        let painted = PaintLog::default();
        let mut regions = RegionMerger::new();
        regions.set_enabled(false);
        let mut container = SpatialContainer::new(screen());
        container.add_child(&mut regions, tile('a', Rect::new(0, 0, 5, 1), &painted));
        container.add_child(&mut regions, tile('b', Rect::new(30, 10, 5, 1), &painted));

        assert_eq!(container.draw(&mut regions, &mut Screen), DrawOutcome::Full);
        assert_eq!(*painted.borrow(), vec!['a', 'b']);
    }

    #[test]
    fn update_child_resyncs_the_index() {
        let painted = PaintLog::default();
        let mut regions = RegionMerger::new();
        let mut container = SpatialContainer::new(screen());
        let a = container.add_child(&mut regions, tile('a', Rect::new(0, 0, 5, 1), &painted));
        let name = container.update_child(&mut regions, a, |w| {
            w.bounds = Rect::new(10, 10, 5, 1);
            w.name
        });
        assert_eq!(name, Some('a'));
        assert_eq!(container.hit_test(11, 10), vec![a]);
        assert!(container.hit_test(1, 0).is_empty());
    }
}
