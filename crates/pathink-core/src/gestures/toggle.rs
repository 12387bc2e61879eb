//! Create or delete a segment's handles with a single click.

use super::{Gesture, GestureContext, GestureKind, GesturePhase};
use crate::error::{EditError, EditResult};
use crate::geometry::SegmentRef;
use kurbo::Point;

/// Clears the handles of a segment that has any, otherwise derives smooth
/// handles from its neighbors. Completes on mouse-down.
#[derive(Debug, Clone)]
pub struct ToggleHandlesGesture {
    target: SegmentRef,
    phase: GesturePhase,
}

impl ToggleHandlesGesture {
    pub fn new(target: SegmentRef) -> Self {
        Self {
            target,
            phase: GesturePhase::Idle,
        }
    }

    fn toggle(&self, ctx: &mut GestureContext<'_>) -> EditResult<()> {
        let path = ctx.document.path_mut(self.target.path)?;
        let index = path
            .index_of(self.target.segment)
            .ok_or(EditError::StaleSegment(self.target))?;
        let before = path.segments[index].clone();
        if before.has_handles() {
            path.segments[index].clear_handles();
        } else {
            path.smooth_segment(index);
        }
        // Open ends have no smooth handles to derive.
        if path.segments[index] != before {
            ctx.mark_changed();
        }
        Ok(())
    }
}

impl Gesture for ToggleHandlesGesture {
    fn kind(&self) -> GestureKind {
        GestureKind::ToggleHandles
    }

    fn phase(&self) -> GesturePhase {
        self.phase
    }

    fn on_mouse_down(&mut self, _point: Point, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase != GesturePhase::Idle {
            return self.phase;
        }
        self.phase = match self.toggle(ctx) {
            Ok(()) => GesturePhase::Completed,
            Err(err) => {
                log::debug!("Toggle handles cancelled: {err}");
                GesturePhase::Cancelled
            }
        };
        self.phase
    }

    fn cancel(&mut self, _ctx: &mut GestureContext<'_>) -> GesturePhase {
        if !self.phase.is_finished() {
            self.phase = GesturePhase::Cancelled;
        }
        self.phase
    }

    fn force_complete(&mut self, _ctx: &mut GestureContext<'_>) -> GesturePhase {
        if !self.phase.is_finished() {
            self.phase = GesturePhase::Completed;
        }
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gestures::test_support::{document_with, init_logging};
    use crate::geometry::{HandleSide, Segment};
    use kurbo::Vec2;

    fn line() -> Vec<Segment> {
        vec![
            Segment::new(Point::new(-10.0, 0.0)),
            Segment::new(Point::ZERO),
            Segment::new(Point::new(10.0, 0.0)),
        ]
    }

    #[test]
    fn test_creates_handles_on_corner() {
        init_logging();
        let (mut doc, refs) = document_with(line(), false);
        let mut gesture = ToggleHandlesGesture::new(refs[1]);
        let mut ctx = GestureContext::new(&mut doc, 1.0);

        assert_eq!(gesture.on_mouse_down(Point::ZERO, &mut ctx), GesturePhase::Completed);
        assert!(ctx.changed());
        let seg = doc.segment(refs[1]).unwrap();
        assert!(seg.has_handle(HandleSide::In) && seg.has_handle(HandleSide::Out));
        assert!(seg.linked);
    }

    #[test]
    fn test_deletes_existing_handles() {
        let mut segments = line();
        segments[1] = Segment::with_handles(Point::ZERO, Vec2::new(-3.0, 1.0), Vec2::new(3.0, -1.0));
        let (mut doc, refs) = document_with(segments, false);

        let mut ctx = GestureContext::new(&mut doc, 1.0);
        ToggleHandlesGesture::new(refs[1]).on_mouse_down(Point::ZERO, &mut ctx);
        assert!(!doc.segment(refs[1]).unwrap().has_handles());
    }

    #[test]
    fn test_toggle_twice_is_net_noop() {
        let (mut doc, refs) = document_with(line(), true);
        let before = doc.segment(refs[0]).unwrap().clone();

        for _ in 0..2 {
            let mut ctx = GestureContext::new(&mut doc, 1.0);
            ToggleHandlesGesture::new(refs[0]).on_mouse_down(Point::ZERO, &mut ctx);
        }
        assert_eq!(doc.segment(refs[0]).unwrap(), &before);
    }

    #[test]
    fn test_open_end_toggle_changes_nothing() {
        let (mut doc, refs) = document_with(line(), false);
        let before = doc.paths().to_vec();

        let mut ctx = GestureContext::new(&mut doc, 1.0);
        let phase = ToggleHandlesGesture::new(refs[0]).on_mouse_down(Point::new(-10.0, 0.0), &mut ctx);
        assert_eq!(phase, GesturePhase::Completed);
        assert!(!ctx.changed());
        assert_eq!(doc.paths(), before.as_slice());
    }

    #[test]
    fn test_stale_target_cancels() {
        let (mut doc, refs) = document_with(line(), false);
        doc.remove_segment(refs[1]).unwrap();
        let snapshot = doc.paths().to_vec();

        let mut ctx = GestureContext::new(&mut doc, 1.0);
        let phase = ToggleHandlesGesture::new(refs[1]).on_mouse_down(Point::ZERO, &mut ctx);
        assert_eq!(phase, GesturePhase::Cancelled);
        assert!(!ctx.changed());
        assert_eq!(doc.paths(), snapshot.as_slice());
    }
}
