//! Pointer input events and per-device tracking.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
}

/// What happened to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    /// The pointer left the tracking surface.
    Leave,
}

/// A raw pointer event in physical (page) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Point,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point) -> Self {
        Self {
            kind,
            position,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn down(position: Point) -> Self {
        Self::new(PointerEventKind::Down, position)
    }

    pub fn moved(position: Point) -> Self {
        Self::new(PointerEventKind::Move, position)
    }

    pub fn up(position: Point) -> Self {
        Self::new(PointerEventKind::Up, position)
    }

    pub fn leave(position: Point) -> Self {
        Self::new(PointerEventKind::Leave, position)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Remembers the last well-formed pointer position.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    /// Last finite logical position seen.
    last_good: Option<Point>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a malformed position with the last known-good one.
    ///
    /// Returns `None` if the position is malformed and nothing good has
    /// been seen yet; the event should then be dropped.
    pub fn sanitize(&mut self, position: Point) -> Option<Point> {
        if position.is_finite() {
            self.last_good = Some(position);
            Some(position)
        } else {
            log::debug!("Malformed pointer position {position:?}, using {:?}", self.last_good);
            self.last_good
        }
    }
}
