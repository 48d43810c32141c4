// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events and handler outcomes.

/// Kind of an input event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer button pressed or screen touched.
    Press,
    /// Pointer button released.
    Release,
    /// Pointer moved with a button held.
    Drag,
    /// Drag ended over a target.
    Drop,
    /// Wheel or touch scroll.
    Scroll,
    /// Pointer moved without a button held.
    Move,
    /// Key pressed.
    Key,
    /// Character typed.
    Char,
    /// Surface resized.
    Resize,
}

impl EventKind {
    /// The single-bit set containing this kind.
    #[must_use]
    pub const fn flag(self) -> EventKinds {
        match self {
            Self::Press => EventKinds::PRESS,
            Self::Release => EventKinds::RELEASE,
            Self::Drag => EventKinds::DRAG,
            Self::Drop => EventKinds::DROP,
            Self::Scroll => EventKinds::SCROLL,
            Self::Move => EventKinds::MOVE,
            Self::Key => EventKinds::KEY,
            Self::Char => EventKinds::CHAR,
            Self::Resize => EventKinds::RESIZE,
        }
    }
}

bitflags::bitflags! {
    /// A set of [`EventKind`]s.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EventKinds: u16 {
        /// [`EventKind::Press`].
        const PRESS   = 1 << 0;
        /// [`EventKind::Release`].
        const RELEASE = 1 << 1;
        /// [`EventKind::Drag`].
        const DRAG    = 1 << 2;
        /// [`EventKind::Drop`].
        const DROP    = 1 << 3;
        /// [`EventKind::Scroll`].
        const SCROLL  = 1 << 4;
        /// [`EventKind::Move`].
        const MOVE    = 1 << 5;
        /// [`EventKind::Key`].
        const KEY     = 1 << 6;
        /// [`EventKind::Char`].
        const CHAR    = 1 << 7;
        /// [`EventKind::Resize`].
        const RESIZE  = 1 << 8;
    }
}

impl EventKinds {
    /// Returns `true` if `kind` is in the set.
    #[must_use]
    pub fn has(self, kind: EventKind) -> bool {
        self.contains(kind.flag())
    }
}

impl Default for EventKinds {
    /// Press, drag, and drop: the kinds routed spatially unless configured otherwise.
    fn default() -> Self {
        Self::PRESS | Self::DRAG | Self::DROP
    }
}

/// An input event with a caller-owned payload.
///
/// `x`/`y` are surface cells. Kinds without a position (keys, characters)
/// leave them at whatever the host reports; they are only read for kinds
/// routed through the spatial index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Event<P = ()> {
    /// What happened.
    pub kind: EventKind,
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Everything else the host reports: button, modifiers, key code.
    pub payload: P,
}

impl Event {
    /// An event without payload.
    #[must_use]
    pub const fn new(kind: EventKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            payload: (),
        }
    }
}

impl<P> Event<P> {
    /// An event carrying `payload`.
    #[must_use]
    pub const fn with_payload(kind: EventKind, x: i32, y: i32, payload: P) -> Self {
        Self {
            kind,
            x,
            y,
            payload,
        }
    }
}

/// What a handler wants to happen after it ran.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Offer the event to the next candidate.
    #[default]
    Continue,
    /// Stop offering the event.
    Stop,
    /// Stop offering the event and report it as consumed.
    StopAndConsume,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pointer_set() {
        let kinds = EventKinds::default();
        assert!(kinds.has(EventKind::Press));
        assert!(kinds.has(EventKind::Drag));
        assert!(kinds.has(EventKind::Drop));
        assert!(!kinds.has(EventKind::Release));
        assert!(!kinds.has(EventKind::Key));
    }

    #[test]
    fn flags_are_distinct() {
        let all = [
            EventKind::Press,
            EventKind::Release,
            EventKind::Drag,
            EventKind::Drop,
            EventKind::Scroll,
            EventKind::Move,
            EventKind::Key,
            EventKind::Char,
            EventKind::Resize,
        ];
        let union = all.iter().fold(EventKinds::empty(), |acc, k| acc | k.flag());
        assert_eq!(union, EventKinds::all());
        assert_eq!(union.bits().count_ones() as usize, all.len());
    }
}
