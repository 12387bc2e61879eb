//! Routes pointer events to the single active gesture.

use crate::config::EditorConfig;
use crate::document::Document;
use crate::gestures::{
    DragHandleGesture, DragSegmentGesture, DrawPathGesture, Gesture, GestureContext, GestureKind,
    GesturePhase, InsertSegmentGesture, ToggleHandlesGesture,
};
use crate::hit_test::{HitTarget, HitTester};
use crate::input::{Modifiers, PointerEvent, PointerEventKind, PointerTracker};
use crate::transform::Viewport;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Which family of gestures a pointer-down starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    /// Edit existing paths through whatever the pointer hits.
    #[default]
    Select,
    /// Draw new paths click by click.
    Pen,
}

/// Ruler cursor feedback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RulerHint {
    /// Logical pointer position, rounded to whole units.
    Show(Point),
    Hide,
}

/// Notifications produced while handling input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EditorEvent {
    GestureStarted(GestureKind),
    /// Geometry may have changed. Sent with `committed` once per completed
    /// gesture; drag previews and rollbacks are uncommitted.
    GeometryChanged { committed: bool },
    GestureEnded { kind: GestureKind, phase: GesturePhase },
    Ruler(RulerHint),
}

/// Pick the gesture for a pointer-down on `target` in select mode.
pub fn select_gesture(target: &HitTarget, modifiers: Modifiers) -> Box<dyn Gesture> {
    match *target {
        HitTarget::Handle { segment, side } if modifiers.alt => {
            Box::new(DragHandleGesture::unlinked(segment, side))
        }
        HitTarget::Handle { segment, side } => Box::new(DragHandleGesture::new(segment, side)),
        HitTarget::Anchor(segment) if modifiers.alt => Box::new(ToggleHandlesGesture::new(segment)),
        HitTarget::Anchor(segment) => Box::new(DragSegmentGesture::new(segment)),
        HitTarget::Curve { path, index, t, .. } => Box::new(InsertSegmentGesture::new(path, index, t)),
    }
}

/// Owns the view and at most one active gesture.
///
/// The document is borrowed per call; gestures only ever see it through a
/// [`GestureContext`] built for the event being handled.
#[derive(Debug, Default)]
pub struct GestureDispatcher {
    viewport: Viewport,
    mode: ToolMode,
    active: Option<Box<dyn Gesture>>,
    /// Whether the active gesture has mutated geometry.
    dirty: bool,
    tracker: PointerTracker,
}

impl GestureDispatcher {
    /// Create a dispatcher with a default layout for `config`.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_viewport(Viewport::new(config))
    }

    /// Create a dispatcher over an already laid-out viewport.
    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            viewport,
            mode: ToolMode::default(),
            active: None,
            dirty: false,
            tracker: PointerTracker::new(),
        }
    }

    /// Current layout and view transform.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable access for resize, zoom and pan.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Replace the configuration and rebuild the transform.
    pub fn set_config(&mut self, config: EditorConfig) {
        self.viewport.set_config(config);
    }

    /// Active tool.
    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Switch tools. A gesture in progress is completed first.
    pub fn set_mode(&mut self, mode: ToolMode, document: &mut Document) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        if mode != self.mode {
            self.forward(document, &mut events, |gesture, ctx| gesture.force_complete(ctx));
            self.mode = mode;
        }
        events
    }

    /// Whether a gesture currently holds the slot.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Kind of the gesture holding the slot.
    pub fn active_kind(&self) -> Option<GestureKind> {
        self.active.as_ref().map(|g| g.kind())
    }

    /// Handle one pointer event given in physical coordinates.
    pub fn handle_event(&mut self, event: PointerEvent, document: &mut Document) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        let logical = self.viewport.transform().physical_to_logical(event.position);
        let Some(point) = self.tracker.sanitize(logical) else {
            log::debug!("Dropping {:?} event with no usable position", event.kind);
            return events;
        };

        match event.kind {
            PointerEventKind::Down => self.pointer_down(point, event.modifiers, document, &mut events),
            PointerEventKind::Move => self.forward(document, &mut events, |g, ctx| g.on_mouse_move(point, ctx)),
            PointerEventKind::Up => self.forward(document, &mut events, |g, ctx| g.on_mouse_up(point, ctx)),
            PointerEventKind::Leave => {
                self.forward(document, &mut events, |g, ctx| g.on_mouse_leave(point, ctx))
            }
        }

        // Rulers show whole logical units.
        let hint = match event.kind {
            PointerEventKind::Leave => RulerHint::Hide,
            _ => RulerHint::Show(Point::new(point.x.round(), point.y.round())),
        };
        events.push(EditorEvent::Ruler(hint));
        events
    }

    /// Abort the active gesture, rolling back its working edits.
    pub fn cancel(&mut self, document: &mut Document) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        self.forward(document, &mut events, |gesture, ctx| gesture.cancel(ctx));
        events
    }

    /// Commit the active gesture as it stands.
    pub fn finish(&mut self, document: &mut Document) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        self.forward(document, &mut events, |gesture, ctx| gesture.force_complete(ctx));
        events
    }

    fn pointer_down(
        &mut self,
        point: Point,
        modifiers: Modifiers,
        document: &mut Document,
        events: &mut Vec<EditorEvent>,
    ) {
        if let Some(active) = &self.active {
            if active.accepts_clicks() {
                self.forward(document, events, |g, ctx| g.on_mouse_down(point, ctx));
                return;
            }
            log::debug!("Pointer down during {:?}, completing it", active.kind());
            self.forward(document, events, |gesture, ctx| gesture.force_complete(ctx));
        }

        let gesture: Box<dyn Gesture> = match self.mode {
            ToolMode::Pen => Box::new(DrawPathGesture::new()),
            ToolMode::Select => {
                let tester = HitTester::new(self.viewport.config().hit_tolerance_px);
                match tester.hit_test(document, point, self.viewport.transform()) {
                    Some(hit) => select_gesture(&hit.target, modifiers),
                    None => return,
                }
            }
        };

        log::debug!("Starting {:?} at {point:?}", gesture.kind());
        events.push(EditorEvent::GestureStarted(gesture.kind()));
        self.active = Some(gesture);
        self.dirty = false;
        self.forward(document, events, |g, ctx| g.on_mouse_down(point, ctx));
    }

    /// Run `handle` on the active gesture, if any, and report the outcome.
    fn forward(
        &mut self,
        document: &mut Document,
        events: &mut Vec<EditorEvent>,
        handle: impl FnOnce(&mut dyn Gesture, &mut GestureContext<'_>) -> GesturePhase,
    ) {
        let Some(gesture) = self.active.as_mut() else {
            return;
        };
        let close_tolerance = self
            .viewport
            .transform()
            .logical_tolerance(self.viewport.config().close_path_tolerance_px);
        let mut ctx = GestureContext::new(document, close_tolerance);
        let phase = handle(gesture.as_mut(), &mut ctx);
        let changed = ctx.changed();
        self.settle(phase, changed, events);
    }

    fn settle(&mut self, phase: GesturePhase, changed: bool, events: &mut Vec<EditorEvent>) {
        self.dirty |= changed;
        if !phase.is_finished() {
            if changed {
                events.push(EditorEvent::GeometryChanged { committed: false });
            }
            return;
        }

        let Some(gesture) = self.active.take() else {
            return;
        };
        // Every completion is a commit point for history, even a plain click.
        if phase == GesturePhase::Completed {
            events.push(EditorEvent::GeometryChanged { committed: true });
        } else if self.dirty {
            events.push(EditorEvent::GeometryChanged { committed: false });
        }
        self.dirty = false;
        log::debug!("{:?} ended as {phase:?}", gesture.kind());
        events.push(EditorEvent::GestureEnded {
            kind: gesture.kind(),
            phase,
        });
    }
}
