// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-rectangle working set and the full-versus-partial redraw decision.

use alloc::vec::Vec;

use tessera_index::{Bounded, Rect};

use crate::stats::{DrawCounters, DrawKind, DrawStats};

/// Limits for a [`RegionMerger`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionConfig {
    /// Working-set capacity. Marking a region that cannot merge into a full
    /// set disables tracking.
    pub max_dirty_regions: usize,
    /// Regions narrower or shorter than this are ignored.
    pub min_region_size: i32,
    /// Fraction of the screen area above which a full redraw is chosen.
    pub dirty_threshold: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            max_dirty_regions: 50,
            min_region_size: 1,
            dirty_threshold: 0.3,
        }
    }
}

/// Accumulates dirty rectangles between draw passes.
///
/// Each mark merges into the most recent region it overlaps or touches, or is
/// appended. Marking is best-effort: malformed or tiny regions are dropped
/// silently, and running out of capacity degrades to full redraws instead of
/// growing.
///
/// # Example
///
/// ```
/// use tessera_index::Rect;
/// use tessera_region::RegionMerger;
///
/// let mut merger = RegionMerger::new();
/// merger.mark_region(1, 1, 10, 10);
/// merger.mark_region(5, 5, 10, 10);
/// merger.mark_region(50, 50, 5, 5);
///
/// let regions = merger.merge_regions(100, 100).unwrap();
/// assert_eq!(regions, vec![Rect::new(1, 1, 14, 14), Rect::new(50, 50, 5, 5)]);
///
/// // Dirt covering more than 30% of the screen means "redraw everything".
/// merger.mark_region(0, 0, 60, 60);
/// assert_eq!(merger.merge_regions(100, 100), None);
/// ```
#[derive(Clone, Debug)]
pub struct RegionMerger {
    regions: Vec<Rect>,
    enabled: bool,
    degraded: bool,
    config: RegionConfig,
    counters: DrawCounters,
}

impl Default for RegionMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionMerger {
    /// Creates an enabled merger with the default [`RegionConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegionConfig::default())
    }

    /// Creates an enabled merger.
    #[must_use]
    pub fn with_config(config: RegionConfig) -> Self {
        Self {
            regions: Vec::with_capacity(config.max_dirty_regions),
            enabled: true,
            degraded: false,
            config,
            counters: DrawCounters::default(),
        }
    }

    /// Limits in use.
    #[must_use]
    pub fn config(&self) -> &RegionConfig {
        &self.config
    }

    /// Replaces the limits. Pending regions are kept.
    pub fn set_config(&mut self, config: RegionConfig) {
        self.config = config;
    }

    /// Returns `true` while regions are being tracked.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` if tracking was switched off by a capacity overflow.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Turns tracking on or off. Turning it off discards pending regions;
    /// turning it on also lifts a capacity degrade.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            self.degraded = false;
        } else {
            self.regions.clear();
        }
    }

    /// Marks the bounds of `entity` dirty. See [`mark_rect`](Self::mark_rect).
    pub fn mark_dirty<B: Bounded + ?Sized>(&mut self, entity: &B) -> bool {
        self.mark_rect(entity.bounds())
    }

    /// Marks `(x, y, width, height)` dirty. See [`mark_rect`](Self::mark_rect).
    pub fn mark_region(&mut self, x: i32, y: i32, width: i32, height: i32) -> bool {
        self.mark_rect(Rect::new(x, y, width, height))
    }

    /// Marks a rectangle dirty.
    ///
    /// The working set is scanned newest first and the region merges into the
    /// first entry it overlaps or touches. Only one merge happens per call.
    /// Without a match the region is appended; if the set is already full it is
    /// emptied and tracking is disabled until [`set_enabled`](Self::set_enabled)
    /// turns it back on, so every later pass redraws everything.
    ///
    /// Returns `true` if the region was recorded. Disabled tracking, regions
    /// below [`RegionConfig::min_region_size`], and the overflowing mark itself
    /// return `false`.
    pub fn mark_rect(&mut self, rect: impl Into<Rect>) -> bool {
        let rect = rect.into();
        if !self.enabled
            || !rect.is_valid()
            || rect.width < self.config.min_region_size
            || rect.height < self.config.min_region_size
        {
            return false;
        }
        if let Some(existing) = self.regions.iter_mut().rev().find(|r| r.touches(&rect)) {
            *existing = existing.union(&rect);
            return true;
        }
        if self.regions.len() < self.config.max_dirty_regions {
            self.regions.push(rect);
            return true;
        }
        tracing::warn!(
            capacity = self.config.max_dirty_regions,
            "dirty regions exhausted; falling back to full redraws"
        );
        self.regions.clear();
        self.enabled = false;
        self.degraded = true;
        false
    }

    /// Pending regions, oldest first.
    #[must_use]
    pub fn regions(&self) -> &[Rect] {
        &self.regions
    }

    /// Number of pending regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Sum of the pending regions' areas, saturating at `i64::MAX`. Overlaps
    /// are counted twice.
    #[must_use]
    pub fn pending_area(&self) -> i64 {
        self.regions
            .iter()
            .fold(0_i64, |acc, r| acc.saturating_add(r.area()))
    }

    /// Decides how the next pass should draw on a `screen_width × screen_height`
    /// surface.
    ///
    /// Returns `None` for a full redraw: tracking is disabled, or the pending
    /// area exceeds [`RegionConfig::dirty_threshold`] of the screen. Otherwise
    /// runs a second merge pass over the working set and returns the result,
    /// which may be empty. The working set itself is left untouched.
    #[must_use]
    pub fn merge_regions(&self, screen_width: u32, screen_height: u32) -> Option<Vec<Rect>> {
        if !self.enabled {
            return None;
        }
        let screen_area = i64::from(screen_width) * i64::from(screen_height);
        if self.pending_area() as f64 > screen_area as f64 * self.config.dirty_threshold {
            return None;
        }
        let mut merged: Vec<Rect> = Vec::with_capacity(self.regions.len());
        for region in &self.regions {
            match merged.iter_mut().find(|m| m.touches(region)) {
                Some(m) => *m = m.union(region),
                None => merged.push(*region),
            }
        }
        Some(merged)
    }

    /// Discards pending regions. Counters are kept.
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Counts a finished draw pass.
    pub fn record_draw(&mut self, kind: DrawKind) {
        self.counters.record(kind);
    }

    /// Draw counters plus the current pending-region count.
    #[must_use]
    pub fn stats(&self) -> DrawStats {
        self.counters.snapshot(self.regions.len())
    }

    /// Zeroes the draw counters.
    pub fn reset_stats(&mut self) {
        self.counters = DrawCounters::default();
    }
}
