//! Insert a segment on a curve and drag it into place.

use super::drag::SegmentDrag;
use super::{Gesture, GestureContext, GestureKind, GesturePhase, LeavePolicy};
use crate::error::EditResult;
use crate::geometry::{PathId, SegmentId, SegmentRef};
use kurbo::{Point, Vec2};

/// Handles of the split curve's end segments before the split.
#[derive(Debug, Clone, Copy)]
struct NeighborHandles {
    previous: (SegmentId, Vec2),
    next: (SegmentId, Vec2),
}

/// Splits curve `index` of a path at `t` on mouse-down, then behaves like
/// a segment drag on the new segment. Cancelling removes the inserted
/// segment and restores the two handles the split shortened; the rest of
/// the path is left alone.
#[derive(Debug, Clone)]
pub struct InsertSegmentGesture {
    path: PathId,
    index: usize,
    t: f64,
    neighbors: Option<NeighborHandles>,
    drag: Option<SegmentDrag>,
    phase: GesturePhase,
}

impl InsertSegmentGesture {
    pub fn new(path: PathId, index: usize, t: f64) -> Self {
        Self {
            path,
            index,
            t,
            neighbors: None,
            drag: None,
            phase: GesturePhase::Idle,
        }
    }

    /// The inserted segment, once mouse-down has split the curve.
    pub fn inserted(&self) -> Option<SegmentRef> {
        self.drag.as_ref().map(|d| d.target)
    }

    fn insert(&mut self, point: Point, ctx: &mut GestureContext<'_>) -> EditResult<bool> {
        let path = ctx.document.path_mut(self.path)?;
        let Some(next) = path.next_index(self.index) else {
            return Ok(false);
        };
        let (before, after) = (&path.segments[self.index], &path.segments[next]);
        let neighbors = NeighborHandles {
            previous: (before.id(), before.handle_out),
            next: (after.id(), after.handle_in),
        };
        let Some(segment) = path.split_curve(self.index, self.t) else {
            return Ok(false);
        };
        ctx.mark_changed();
        log::debug!("Inserted segment on curve {} at t={:.3}", self.index, self.t);

        let target = SegmentRef::new(self.path, segment);
        self.neighbors = Some(neighbors);
        self.drag = Some(SegmentDrag::begin(target, point, ctx)?);
        Ok(true)
    }

    /// Undo the split: drop the new segment and put back the neighbors'
    /// handles, whichever of them still exist.
    fn roll_back(&mut self, ctx: &mut GestureContext<'_>) -> EditResult<()> {
        let (Some(inserted), Some(neighbors)) = (self.inserted(), self.neighbors.take()) else {
            return Ok(());
        };
        let path = ctx.document.path_mut(self.path)?;
        if let Some(index) = path.index_of(inserted.segment) {
            path.segments.remove(index);
        }
        let (previous, handle_out) = neighbors.previous;
        if let Some(segment) = path.segment_mut(previous) {
            segment.handle_out = handle_out;
        }
        let (next, handle_in) = neighbors.next;
        if let Some(segment) = path.segment_mut(next) {
            segment.handle_in = handle_in;
        }
        ctx.mark_changed();
        Ok(())
    }

    fn apply(&mut self, point: Point, ctx: &mut GestureContext<'_>) -> EditResult<()> {
        match &mut self.drag {
            Some(drag) => drag.update(point, ctx, |seg, _, delta| seg.translate(delta)),
            None => Ok(()),
        }
    }

    fn settle(&mut self, result: EditResult<()>, on_ok: GesturePhase) {
        self.phase = match result {
            Ok(()) => on_ok,
            Err(err) => {
                log::debug!("Segment insertion cancelled: {err}");
                GesturePhase::Cancelled
            }
        };
    }
}

impl Gesture for InsertSegmentGesture {
    fn kind(&self) -> GestureKind {
        GestureKind::InsertSegment
    }

    fn phase(&self) -> GesturePhase {
        self.phase
    }

    fn leave_policy(&self) -> LeavePolicy {
        LeavePolicy::Cancel
    }

    fn on_mouse_down(&mut self, point: Point, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase != GesturePhase::Idle {
            return self.phase;
        }
        self.phase = match self.insert(point, ctx) {
            Ok(true) => GesturePhase::Active,
            Ok(false) => {
                log::debug!("Curve {} cannot be split at t={}", self.index, self.t);
                GesturePhase::Cancelled
            }
            Err(err) => {
                log::debug!("Segment insertion cancelled: {err}");
                GesturePhase::Cancelled
            }
        };
        self.phase
    }

    fn on_mouse_move(&mut self, point: Point, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase == GesturePhase::Active {
            let result = self.apply(point, ctx);
            self.settle(result, GesturePhase::Active);
        }
        self.phase
    }

    fn on_mouse_up(&mut self, point: Point, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase == GesturePhase::Active {
            let result = self.apply(point, ctx);
            self.settle(result, GesturePhase::Completed);
        }
        self.phase
    }

    fn cancel(&mut self, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase.is_finished() {
            return self.phase;
        }
        if let Err(err) = self.roll_back(ctx) {
            log::debug!("Nothing to restore after insertion: {err}");
        }
        self.phase = GesturePhase::Cancelled;
        self.phase
    }

    fn force_complete(&mut self, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if !self.phase.is_finished() {
            let live = self.inserted().is_some_and(|t| ctx.document.contains(t));
            self.phase = if live {
                GesturePhase::Completed
            } else {
                GesturePhase::Cancelled
            };
        }
        self.phase
    }
}
