// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles in display-surface units and the [`Bounded`] capability.

/// Axis-aligned rectangle in display-surface units (terminal cells).
///
/// The rectangle covers `x..x + width` horizontally and `y..y + height`
/// vertically. Sizes are never negative when built through [`Rect::new`];
/// rectangles with public fields set by hand can be checked with
/// [`Rect::is_valid`].
///
/// Edge arithmetic saturates at the `i32` limits. A rectangle whose far edge
/// would pass `i32::MAX` is not [valid](Rect::is_valid), and the index and the
/// dirty tracker refuse it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal extent, `>= 0`.
    pub width: i32,
    /// Vertical extent, `>= 0`.
    pub height: i32,
}

impl Rect {
    /// Creates a rectangle, clamping negative sizes to zero.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Creates a rectangle from its left/top and right/bottom edges.
    ///
    /// Sizes saturate at `i32::MAX`.
    #[must_use]
    pub const fn from_edges(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    /// Exclusive right edge, saturating at `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating at `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Returns `true` if both sizes are non-negative and both far edges are
    /// representable.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.width >= 0
            && self.height >= 0
            && self.x.checked_add(self.width).is_some()
            && self.y.checked_add(self.height).is_some()
    }

    /// Returns `true` if the rectangle covers no area.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Area in square units. Computed in `i64` so large surfaces cannot overflow.
    #[must_use]
    pub const fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    /// Half-open point containment: `x ∈ [self.x, self.right())`, same for `y`.
    #[inline]
    #[must_use]
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Boundary-inclusive containment of another rectangle.
    ///
    /// A rectangle equal to `self` is contained.
    #[inline]
    #[must_use]
    pub const fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.right() <= self.right()
            && other.y >= self.y
            && other.bottom() <= self.bottom()
    }

    /// Edge-inclusive overlap test: rectangles that merely touch overlap.
    #[inline]
    #[must_use]
    pub const fn touches(&self, other: &Self) -> bool {
        !(self.right() < other.x
            || other.right() < self.x
            || self.bottom() < other.y
            || other.bottom() < self.y)
    }

    /// Smallest rectangle covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Splits into four quadrants: top-left, top-right, bottom-left, bottom-right.
    ///
    /// The quadrants tile `self` exactly; for odd sizes the right and bottom
    /// halves take the extra unit.
    #[must_use]
    pub fn quadrants(&self) -> [Self; 4] {
        let hw = self.width / 2;
        let hh = self.height / 2;
        let (mx, my) = (self.x.saturating_add(hw), self.y.saturating_add(hh));
        [
            Self::new(self.x, self.y, hw, hh),
            Self::new(mx, self.y, self.width - hw, hh),
            Self::new(self.x, my, hw, self.height - hh),
            Self::new(mx, my, self.width - hw, self.height - hh),
        ]
    }
}

#[cfg(feature = "kurbo")]
impl From<kurbo::Rect> for Rect {
    /// Floors origin and size independently, then truncates to cell units.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "display coordinates fit in i32; out-of-range floats saturate"
    )]
    fn from(rect: kurbo::Rect) -> Self {
        let origin = rect.origin().floor();
        let size = rect.size().floor();
        Self::new(
            origin.x as i32,
            origin.y as i32,
            size.width as i32,
            size.height as i32,
        )
    }
}

#[cfg(feature = "kurbo")]
impl From<Rect> for kurbo::Rect {
    fn from(rect: Rect) -> Self {
        Self::new(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.right()),
            f64::from(rect.bottom()),
        )
    }
}

/// Anything with an axis-aligned bounding box in display-surface units.
///
/// Every type the index or the dirty tracker consumes exposes its bounds
/// through this single accessor.
pub trait Bounded {
    /// Current bounding box.
    fn bounds(&self) -> Rect;
}

impl Bounded for Rect {
    #[inline]
    fn bounds(&self) -> Rect {
        *self
    }
}

impl<B: Bounded + ?Sized> Bounded for &B {
    #[inline]
    fn bounds(&self) -> Rect {
        (**self).bounds()
    }
}
