//! Pointer gestures that edit path geometry.
//!
//! A gesture interprets one pointer-down-to-pointer-up cycle (or several,
//! for multi-click constructs like drawing a path) as a geometry edit. The
//! dispatcher owns at most one active gesture and forwards events to it.

mod drag;
mod insert;
mod pen;
mod toggle;

pub use drag::{DragHandleGesture, DragSegmentGesture};
pub use insert::InsertSegmentGesture;
pub use pen::DrawPathGesture;
pub use toggle::ToggleHandlesGesture;

use crate::document::Document;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Lifecycle of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GesturePhase {
    /// Created, no event received yet.
    #[default]
    Idle,
    /// Receiving events.
    Active,
    /// Finished; its edits are committed.
    Completed,
    /// Aborted; its working edits were rolled back where possible.
    Cancelled,
}

impl GesturePhase {
    pub fn is_finished(self) -> bool {
        matches!(self, GesturePhase::Completed | GesturePhase::Cancelled)
    }
}

/// The gesture families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureKind {
    /// Create or delete the handles of a segment.
    ToggleHandles,
    /// Drag one handle, mirroring a linked sibling.
    DragHandle,
    /// Drag a segment's anchor (handles follow).
    DragSegment,
    /// Split a curve and drag the new segment.
    InsertSegment,
    /// Click-by-click path drawing.
    DrawPath,
}

/// What a gesture does when the pointer leaves the tracking surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeavePolicy {
    /// Abort and roll back working edits.
    Cancel,
    /// Stay active and resume when events come back.
    Pause,
}

/// What a gesture may touch while handling one event.
pub struct GestureContext<'a> {
    pub document: &'a mut Document,
    /// Close-path snap radius in logical units.
    pub close_tolerance: f64,
    changed: bool,
}

impl<'a> GestureContext<'a> {
    pub fn new(document: &'a mut Document, close_tolerance: f64) -> Self {
        Self {
            document,
            close_tolerance,
            changed: false,
        }
    }

    /// Record that geometry was mutated during this event.
    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Whether geometry was mutated during this event.
    pub fn changed(&self) -> bool {
        self.changed
    }
}

/// A short-lived interpreter of pointer events into geometry edits.
///
/// Handlers never fail: malformed input is ignored and a missing target
/// cancels the gesture. Every handler returns the phase after the event.
pub trait Gesture: std::fmt::Debug {
    fn kind(&self) -> GestureKind;

    fn phase(&self) -> GesturePhase;

    fn leave_policy(&self) -> LeavePolicy {
        LeavePolicy::Pause
    }

    /// Whether a pointer-down while active belongs to this gesture.
    fn accepts_clicks(&self) -> bool {
        false
    }

    fn on_mouse_down(&mut self, _point: Point, _ctx: &mut GestureContext<'_>) -> GesturePhase {
        self.phase()
    }

    fn on_mouse_move(&mut self, _point: Point, _ctx: &mut GestureContext<'_>) -> GesturePhase {
        self.phase()
    }

    fn on_mouse_up(&mut self, _point: Point, _ctx: &mut GestureContext<'_>) -> GesturePhase {
        self.phase()
    }

    fn on_mouse_leave(&mut self, _point: Point, ctx: &mut GestureContext<'_>) -> GesturePhase {
        match self.leave_policy() {
            LeavePolicy::Cancel => self.cancel(ctx),
            LeavePolicy::Pause => self.phase(),
        }
    }

    /// Abort, rolling back working edits.
    fn cancel(&mut self, ctx: &mut GestureContext<'_>) -> GesturePhase;

    /// Commit the current working state and finish.
    fn force_complete(&mut self, ctx: &mut GestureContext<'_>) -> GesturePhase;
}
