//! Handle and anchor dragging.

use super::{Gesture, GestureContext, GestureKind, GesturePhase, LeavePolicy};
use crate::error::EditResult;
use crate::geometry::{HandleSide, Segment, SegmentRef};
use kurbo::{Point, Vec2};

/// Shared drag bookkeeping for gestures editing one segment.
///
/// Every update is computed from the original segment and the press point,
/// so repeated moves to the same point never apply a delta twice.
#[derive(Debug, Clone)]
pub(super) struct SegmentDrag {
    pub(super) target: SegmentRef,
    start: Point,
    original: Segment,
    last: Point,
}

impl SegmentDrag {
    /// Capture the target as it is at press time.
    pub(super) fn begin(target: SegmentRef, start: Point, ctx: &GestureContext<'_>) -> EditResult<Self> {
        let original = ctx.document.segment(target)?.clone();
        Ok(Self {
            target,
            start,
            original,
            last: start,
        })
    }

    /// Apply `edit` for the pointer at `point`.
    pub(super) fn update(
        &mut self,
        point: Point,
        ctx: &mut GestureContext<'_>,
        edit: impl FnOnce(&mut Segment, &Segment, Vec2),
    ) -> EditResult<()> {
        if !point.is_finite() {
            log::debug!("Ignoring non-finite drag point {point:?}");
            return Ok(());
        }
        let segment = ctx.document.segment_mut(self.target)?;
        if point == self.last {
            return Ok(());
        }
        let mut updated = self.original.clone();
        edit(&mut updated, &self.original, point - self.start);
        if !updated.is_finite() {
            log::debug!("Drag to {point:?} produced non-finite geometry, ignored");
            return Ok(());
        }
        *segment = updated;
        self.last = point;
        ctx.mark_changed();
        Ok(())
    }

    /// Put the original segment back.
    pub(super) fn restore(&self, ctx: &mut GestureContext<'_>) -> EditResult<()> {
        if self.last != self.start {
            ctx.document.restore_segment(self.target, &self.original)?;
            ctx.mark_changed();
        }
        Ok(())
    }
}

/// Finish a drag-driven phase transition, cancelling on stale targets.
fn settle(result: EditResult<()>, on_ok: GesturePhase, what: &str) -> GesturePhase {
    match result {
        Ok(()) => on_ok,
        Err(err) => {
            log::debug!("{what} cancelled: {err}");
            GesturePhase::Cancelled
        }
    }
}

/// Drags one handle. On a linked segment the sibling is mirrored unless
/// the gesture was started unlinked (e.g. with Alt held).
#[derive(Debug, Clone)]
pub struct DragHandleGesture {
    target: SegmentRef,
    side: HandleSide,
    mirror: bool,
    drag: Option<SegmentDrag>,
    phase: GesturePhase,
}

impl DragHandleGesture {
    pub fn new(target: SegmentRef, side: HandleSide) -> Self {
        Self {
            target,
            side,
            mirror: true,
            drag: None,
            phase: GesturePhase::Idle,
        }
    }

    /// A drag that never moves the sibling handle.
    pub fn unlinked(target: SegmentRef, side: HandleSide) -> Self {
        Self {
            mirror: false,
            ..Self::new(target, side)
        }
    }

    fn apply(&mut self, point: Point, ctx: &mut GestureContext<'_>) -> EditResult<()> {
        let (side, mirror) = (self.side, self.mirror);
        match &mut self.drag {
            Some(drag) => drag.update(point, ctx, |seg, original, delta| {
                seg.drag_handle(original, side, delta, mirror)
            }),
            None => Ok(()),
        }
    }
}

impl Gesture for DragHandleGesture {
    fn kind(&self) -> GestureKind {
        GestureKind::DragHandle
    }

    fn phase(&self) -> GesturePhase {
        self.phase
    }

    fn on_mouse_down(&mut self, point: Point, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase != GesturePhase::Idle {
            return self.phase;
        }
        let result = SegmentDrag::begin(self.target, point, ctx).map(|drag| self.drag = Some(drag));
        self.phase = settle(result, GesturePhase::Active, "Handle drag");
        self.phase
    }

    fn on_mouse_move(&mut self, point: Point, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase == GesturePhase::Active {
            let result = self.apply(point, ctx);
            self.phase = settle(result, GesturePhase::Active, "Handle drag");
        }
        self.phase
    }

    fn on_mouse_up(&mut self, point: Point, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase == GesturePhase::Active {
            let result = self.apply(point, ctx);
            self.phase = settle(result, GesturePhase::Completed, "Handle drag");
        }
        self.phase
    }

    fn cancel(&mut self, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase.is_finished() {
            return self.phase;
        }
        if let Some(drag) = &self.drag {
            if let Err(err) = drag.restore(ctx) {
                log::debug!("Nothing to restore after handle drag: {err}");
            }
        }
        self.phase = GesturePhase::Cancelled;
        self.phase
    }

    fn force_complete(&mut self, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if !self.phase.is_finished() {
            let live = self.drag.as_ref().is_some_and(|d| ctx.document.contains(d.target));
            self.phase = if live {
                GesturePhase::Completed
            } else {
                GesturePhase::Cancelled
            };
        }
        self.phase
    }
}

/// Drags a segment's anchor; its handles move with it.
#[derive(Debug, Clone)]
pub struct DragSegmentGesture {
    target: SegmentRef,
    drag: Option<SegmentDrag>,
    phase: GesturePhase,
}

impl DragSegmentGesture {
    pub fn new(target: SegmentRef) -> Self {
        Self {
            target,
            drag: None,
            phase: GesturePhase::Idle,
        }
    }

    fn apply(&mut self, point: Point, ctx: &mut GestureContext<'_>) -> EditResult<()> {
        match &mut self.drag {
            Some(drag) => drag.update(point, ctx, |seg, _, delta| seg.translate(delta)),
            None => Ok(()),
        }
    }
}

impl Gesture for DragSegmentGesture {
    fn kind(&self) -> GestureKind {
        GestureKind::DragSegment
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
        let result = SegmentDrag::begin(self.target, point, ctx).map(|drag| self.drag = Some(drag));
        self.phase = settle(result, GesturePhase::Active, "Segment drag");
        self.phase
    }

    fn on_mouse_move(&mut self, point: Point, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase == GesturePhase::Active {
            let result = self.apply(point, ctx);
            self.phase = settle(result, GesturePhase::Active, "Segment drag");
        }
        self.phase
    }

    fn on_mouse_up(&mut self, point: Point, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase == GesturePhase::Active {
            let result = self.apply(point, ctx);
            self.phase = settle(result, GesturePhase::Completed, "Segment drag");
        }
        self.phase
    }

    fn cancel(&mut self, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase.is_finished() {
            return self.phase;
        }
        if let Some(drag) = &self.drag {
            if let Err(err) = drag.restore(ctx) {
                log::debug!("Nothing to restore after segment drag: {err}");
            }
        }
        self.phase = GesturePhase::Cancelled;
        self.phase
    }

    fn force_complete(&mut self, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if !self.phase.is_finished() {
            let live = self.drag.as_ref().is_some_and(|d| ctx.document.contains(d.target));
            self.phase = if live {
                GesturePhase::Completed
            } else {
                GesturePhase::Cancelled
            };
        }
        self.phase
    }
}
