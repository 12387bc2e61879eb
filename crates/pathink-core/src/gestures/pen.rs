//! Click-by-click path drawing.

use super::{Gesture, GestureContext, GestureKind, GesturePhase};
use crate::error::{EditError, EditResult};
use crate::geometry::{Path, PathId, Segment, SegmentRef};
use kurbo::{Point, Vec2};

/// Builds a new path one click at a time, spanning many pointer cycles.
///
/// Each click appends a segment; dragging before release pulls out
/// symmetric handles. Clicking the first anchor closes the path, clicking
/// the last anchor finishes it open. A path with fewer than two segments
/// is discarded when the gesture ends.
#[derive(Debug, Clone, Default)]
pub struct DrawPathGesture {
    path: Option<PathId>,
    /// Segment being shaped and where the press happened.
    pressed: Option<(SegmentRef, Point)>,
    phase: GesturePhase,
}

impl DrawPathGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// The path under construction.
    pub fn path(&self) -> Option<PathId> {
        self.path
    }

    fn click(&mut self, point: Point, ctx: &mut GestureContext<'_>) -> EditResult<GesturePhase> {
        let Some(id) = self.path else {
            let segment = Segment::new(point);
            let segment_id = segment.id();
            let id = ctx.document.add_path(Path::new(vec![segment], false));
            self.path = Some(id);
            self.pressed = Some((SegmentRef::new(id, segment_id), point));
            ctx.mark_changed();
            log::debug!("Started drawing path {id:?}");
            return Ok(GesturePhase::Active);
        };

        let close_tolerance = ctx.close_tolerance;
        let path = ctx.document.path_mut(id)?;
        let (Some(first), Some(last)) = (path.segments.first(), path.segments.last()) else {
            return Err(EditError::StalePath(id));
        };
        let (first, last) = (first.anchor, last.anchor);

        if path.len() >= 2 && first.distance(point) <= close_tolerance {
            path.closed = true;
            ctx.mark_changed();
            return Ok(self.finish(ctx));
        }
        if last.distance(point) <= close_tolerance {
            return Ok(self.finish(ctx));
        }

        let segment = Segment::new(point);
        self.pressed = Some((SegmentRef::new(id, segment.id()), point));
        path.segments.push(segment);
        ctx.mark_changed();
        Ok(GesturePhase::Active)
    }

    fn shape_handles(&self, point: Point, ctx: &mut GestureContext<'_>) -> EditResult<()> {
        let Some((target, start)) = self.pressed else {
            return Ok(());
        };
        let segment = ctx.document.segment_mut(target)?;
        let drag: Vec2 = point - start;
        if segment.handle_out == drag {
            return Ok(());
        }
        segment.handle_out = drag;
        segment.handle_in = -drag;
        segment.linked = drag != Vec2::ZERO;
        ctx.mark_changed();
        Ok(())
    }

    /// End the gesture, discarding a path too short to have a curve.
    fn finish(&mut self, ctx: &mut GestureContext<'_>) -> GesturePhase {
        self.pressed = None;
        if let Some(id) = self.path {
            let too_short = ctx.document.path(id).map(|p| p.len() < 2).unwrap_or(false);
            if too_short {
                ctx.document.remove_path(id);
                ctx.mark_changed();
                log::debug!("Discarded path {id:?} with a single segment");
            }
        }
        self.phase = GesturePhase::Completed;
        self.phase
    }

    fn settle(&mut self, result: EditResult<GesturePhase>) -> GesturePhase {
        self.phase = match result {
            Ok(phase) => phase,
            Err(err) => {
                log::debug!("Path drawing cancelled: {err}");
                self.pressed = None;
                GesturePhase::Cancelled
            }
        };
        self.phase
    }
}

impl Gesture for DrawPathGesture {
    fn kind(&self) -> GestureKind {
        GestureKind::DrawPath
    }

    fn phase(&self) -> GesturePhase {
        self.phase
    }

    fn accepts_clicks(&self) -> bool {
        self.phase == GesturePhase::Active
    }

    fn on_mouse_down(&mut self, point: Point, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase.is_finished() {
            return self.phase;
        }
        if !point.is_finite() {
            return self.phase;
        }
        let result = self.click(point, ctx);
        self.settle(result)
    }

    fn on_mouse_move(&mut self, point: Point, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase == GesturePhase::Active && point.is_finite() {
            let result = self.shape_handles(point, ctx).map(|()| GesturePhase::Active);
            return self.settle(result);
        }
        self.phase
    }

    fn on_mouse_up(&mut self, point: Point, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase == GesturePhase::Active && point.is_finite() {
            let result = self.shape_handles(point, ctx).map(|()| GesturePhase::Active);
            self.settle(result);
        }
        self.pressed = None;
        self.phase
    }

    fn cancel(&mut self, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase.is_finished() {
            return self.phase;
        }
        if let Some(id) = self.path.take() {
            if ctx.document.remove_path(id).is_some() {
                ctx.mark_changed();
            }
        }
        self.pressed = None;
        self.phase = GesturePhase::Cancelled;
        self.phase
    }

    fn force_complete(&mut self, ctx: &mut GestureContext<'_>) -> GesturePhase {
        if self.phase.is_finished() {
            return self.phase;
        }
        self.finish(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::geometry::HandleSide;
    use crate::gestures::test_support::init_logging;

    fn click(gesture: &mut DrawPathGesture, doc: &mut Document, point: Point) -> GesturePhase {
        let mut ctx = GestureContext::new(doc, 2.0);
        gesture.on_mouse_down(point, &mut ctx);
        gesture.on_mouse_up(point, &mut ctx)
    }

    #[test]
    fn test_clicks_append_segments() {
        init_logging();
        let mut doc = Document::new();
        let mut gesture = DrawPathGesture::new();

        for p in [Point::ZERO, Point::new(50.0, 0.0), Point::new(50.0, 50.0)] {
            assert_eq!(click(&mut gesture, &mut doc, p), GesturePhase::Active);
        }
        assert!(gesture.accepts_clicks());
        let path = doc.path(gesture.path().unwrap()).unwrap();
        assert_eq!(path.len(), 3);
        assert!(!path.closed);
    }

    #[test]
    fn test_click_on_first_anchor_closes() {
        let mut doc = Document::new();
        let mut gesture = DrawPathGesture::new();
        click(&mut gesture, &mut doc, Point::ZERO);
        click(&mut gesture, &mut doc, Point::new(50.0, 0.0));
        click(&mut gesture, &mut doc, Point::new(50.0, 50.0));

        let phase = click(&mut gesture, &mut doc, Point::new(1.0, 1.0));
        assert_eq!(phase, GesturePhase::Completed);
        let path = doc.path(gesture.path().unwrap()).unwrap();
        assert!(path.closed);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_click_on_last_anchor_finishes_open() {
        let mut doc = Document::new();
        let mut gesture = DrawPathGesture::new();
        click(&mut gesture, &mut doc, Point::ZERO);
        click(&mut gesture, &mut doc, Point::new(50.0, 0.0));

        assert_eq!(click(&mut gesture, &mut doc, Point::new(50.0, 1.0)), GesturePhase::Completed);
        let path = doc.path(gesture.path().unwrap()).unwrap();
        assert!(!path.closed);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_drag_pulls_symmetric_handles() {
        let mut doc = Document::new();
        let mut gesture = DrawPathGesture::new();
        let mut ctx = GestureContext::new(&mut doc, 2.0);

        gesture.on_mouse_down(Point::new(10.0, 10.0), &mut ctx);
        gesture.on_mouse_move(Point::new(20.0, 10.0), &mut ctx);
        gesture.on_mouse_up(Point::new(20.0, 15.0), &mut ctx);

        let seg = &doc.path(gesture.path().unwrap()).unwrap().segments[0];
        assert_eq!(seg.handle_out, Vec2::new(10.0, 5.0));
        assert_eq!(seg.handle_in, Vec2::new(-10.0, -5.0));
        assert!(seg.linked);
        assert_eq!(seg.handle_position(HandleSide::Out), Some(Point::new(20.0, 15.0)));
    }

    #[test]
    fn test_hover_moves_do_not_edit() {
        let mut doc = Document::new();
        let mut gesture = DrawPathGesture::new();
        click(&mut gesture, &mut doc, Point::ZERO);

        let mut ctx = GestureContext::new(&mut doc, 2.0);
        gesture.on_mouse_move(Point::new(30.0, 30.0), &mut ctx);
        assert!(!ctx.changed());
    }

    #[test]
    fn test_force_complete_discards_single_segment() {
        let mut doc = Document::new();
        let mut gesture = DrawPathGesture::new();
        click(&mut gesture, &mut doc, Point::ZERO);

        let mut ctx = GestureContext::new(&mut doc, 2.0);
        assert_eq!(gesture.force_complete(&mut ctx), GesturePhase::Completed);
        assert!(doc.paths().is_empty());
    }

    #[test]
    fn test_cancel_removes_path() {
        let mut doc = Document::new();
        let mut gesture = DrawPathGesture::new();
        click(&mut gesture, &mut doc, Point::ZERO);
        click(&mut gesture, &mut doc, Point::new(9.0, 9.0));

        let mut ctx = GestureContext::new(&mut doc, 2.0);
        assert_eq!(gesture.cancel(&mut ctx), GesturePhase::Cancelled);
        assert!(doc.paths().is_empty());
    }

    #[test]
    fn test_path_removed_out_of_band_cancels() {
        let mut doc = Document::new();
        let mut gesture = DrawPathGesture::new();
        click(&mut gesture, &mut doc, Point::ZERO);
        doc.remove_path(gesture.path().unwrap());

        assert_eq!(click(&mut gesture, &mut doc, Point::new(40.0, 0.0)), GesturePhase::Cancelled);
        assert!(doc.paths().is_empty());
    }
}
