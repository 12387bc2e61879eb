//! View transform between pointer, canvas and logical coordinates.
//!
//! Three spaces are involved:
//! - physical: page coordinates of pointer events, in CSS pixels;
//! - canvas: relative to the drawable canvas origin (the container inset by
//!   the canvas margin), multiplied by the device pixel ratio;
//! - logical: the drawing's own coordinates, `(canvas - pan) / scale`.

use crate::config::EditorConfig;
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest user zoom.
pub const MIN_ZOOM: f64 = 0.01;
/// Largest user zoom.
pub const MAX_ZOOM: f64 = 64.0;

/// Everything the view transform is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutInputs {
    /// Page position of the canvas container (CSS px).
    pub origin: Point,
    /// Size of the canvas container (CSS px).
    pub css_size: Size,
    pub device_pixel_ratio: f64,
    /// Size of the drawing's logical viewport.
    pub viewport: Size,
    /// User zoom on top of the fit-to-canvas scale.
    pub zoom: f64,
    /// Translation in canvas pixels.
    pub pan: Vec2,
}

impl Default for LayoutInputs {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            css_size: Size::ZERO,
            device_pixel_ratio: 1.0,
            viewport: Size::new(1.0, 1.0),
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

/// A resolved transform. Pure function of [`LayoutInputs`] and config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    drawable: Size,
    device_pixel_ratio: f64,
    scale: f64,
    canvas_origin: Point,
    pan: Vec2,
}

impl ViewTransform {
    /// Resolve the transform. Degenerate inputs are clamped, never rejected.
    pub fn compute(inputs: &LayoutInputs, config: &EditorConfig) -> Self {
        let margin = finite_or(config.canvas_margin, 0.0).max(0.0);
        let css_width = finite_or(inputs.css_size.width, 0.0);
        let css_height = finite_or(inputs.css_size.height, 0.0);
        let drawable = Size::new(
            (css_width - margin * 2.0).max(1.0),
            (css_height - margin * 2.0).max(1.0),
        );
        let viewport = Size::new(
            finite_or(inputs.viewport.width, 1.0).max(1.0),
            finite_or(inputs.viewport.height, 1.0).max(1.0),
        );
        let device_pixel_ratio = positive_or(inputs.device_pixel_ratio, 1.0);
        let zoom = positive_or(inputs.zoom, 1.0);

        let fit = (drawable.width / viewport.width).min(drawable.height / viewport.height);
        let raw = fit * device_pixel_ratio * zoom;
        let floor = config.scale_floor();
        let scale = if raw.is_finite() { raw.max(floor) } else { floor };
        if scale != raw {
            log::trace!("Clamped view scale {raw} to {scale}");
        }

        let origin = if inputs.origin.is_finite() {
            inputs.origin
        } else {
            Point::ZERO
        };
        let pan = if inputs.pan.is_finite() {
            inputs.pan
        } else {
            Vec2::ZERO
        };

        Self {
            drawable,
            device_pixel_ratio,
            scale,
            canvas_origin: origin + Vec2::new(margin, margin),
            pan,
        }
    }

    /// Combined logical-to-canvas scale (fit, pixel ratio and zoom).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Device pixels per CSS pixel.
    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Drawable canvas size in CSS pixels (container minus margins).
    pub fn drawable_size(&self) -> Size {
        self.drawable
    }

    /// Drawable canvas size in device pixels (backing-store size).
    pub fn backing_size(&self) -> Size {
        self.drawable * self.device_pixel_ratio
    }

    /// Transform from physical to canvas coordinates.
    pub fn physical_to_canvas_affine(&self) -> Affine {
        Affine::scale(self.device_pixel_ratio) * Affine::translate(-self.canvas_origin.to_vec2())
    }

    /// Transform from logical to canvas coordinates (for rendering).
    pub fn logical_to_canvas_affine(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.scale)
    }

    /// Convert a pointer position to canvas pixels.
    pub fn physical_to_canvas(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.canvas_origin.x) * self.device_pixel_ratio,
            (point.y - self.canvas_origin.y) * self.device_pixel_ratio,
        )
    }

    /// Convert canvas pixels back to a pointer position.
    pub fn canvas_to_physical(&self, point: Point) -> Point {
        Point::new(
            point.x / self.device_pixel_ratio + self.canvas_origin.x,
            point.y / self.device_pixel_ratio + self.canvas_origin.y,
        )
    }

    /// Convert canvas pixels to logical coordinates.
    pub fn canvas_to_logical(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.pan.x) / self.scale,
            (point.y - self.pan.y) / self.scale,
        )
    }

    /// Convert logical coordinates to canvas pixels.
    pub fn logical_to_canvas(&self, point: Point) -> Point {
        Point::new(
            point.x * self.scale + self.pan.x,
            point.y * self.scale + self.pan.y,
        )
    }

    /// Convert a pointer position to logical coordinates.
    pub fn physical_to_logical(&self, point: Point) -> Point {
        self.canvas_to_logical(self.physical_to_canvas(point))
    }

    /// Convert a logical point back to a pointer position.
    pub fn logical_to_physical(&self, point: Point) -> Point {
        self.canvas_to_physical(self.logical_to_canvas(point))
    }

    /// Convert an on-screen distance in CSS pixels to logical units.
    pub fn logical_tolerance(&self, css_px: f64) -> f64 {
        css_px * self.device_pixel_ratio / self.scale
    }
}

/// Owns the layout inputs and the transform derived from them.
///
/// Every mutation rebuilds the transform in a single assignment, so readers
/// never see a scale that disagrees with the translation.
#[derive(Debug, Clone)]
pub struct Viewport {
    config: EditorConfig,
    inputs: LayoutInputs,
    transform: ViewTransform,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Viewport {
    /// Create a viewport with default layout inputs.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_inputs(config, LayoutInputs::default())
    }

    /// Create a viewport from known layout inputs.
    pub fn with_inputs(config: EditorConfig, inputs: LayoutInputs) -> Self {
        let transform = ViewTransform::compute(&inputs, &config);
        Self {
            config,
            inputs,
            transform,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Inputs the current transform was computed from.
    pub fn inputs(&self) -> &LayoutInputs {
        &self.inputs
    }

    /// The current transform.
    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    /// Swap the configuration (margin or scale floor may change).
    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
        self.rebuild();
    }

    /// The canvas container moved or resized, or the pixel ratio changed.
    pub fn resize(&mut self, origin: Point, css_size: Size, device_pixel_ratio: f64) {
        self.inputs.origin = origin;
        self.inputs.css_size = css_size;
        self.inputs.device_pixel_ratio = device_pixel_ratio;
        self.rebuild();
    }

    /// The drawing's logical viewport changed.
    pub fn set_viewport_size(&mut self, viewport: Size) {
        self.inputs.viewport = viewport;
        self.rebuild();
    }

    /// Set the user zoom, clamped to `MIN_ZOOM..=MAX_ZOOM`.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.inputs.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
            self.rebuild();
        }
    }

    /// Zoom by `factor`, keeping the logical point under `physical` fixed.
    pub fn zoom_at(&mut self, physical: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 || !physical.is_finite() {
            return;
        }
        let anchor = self.transform.physical_to_logical(physical);
        self.inputs.zoom = (self.inputs.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let zoomed = ViewTransform::compute(&self.inputs, &self.config);

        let target = zoomed.physical_to_canvas(physical);
        let actual = zoomed.logical_to_canvas(anchor);
        self.inputs.pan += target - actual;
        self.rebuild();
    }

    /// Pan by a delta in canvas pixels.
    pub fn pan(&mut self, delta: Vec2) {
        if delta.is_finite() {
            self.inputs.pan += delta;
            self.rebuild();
        }
    }

    /// Reset zoom and pan.
    pub fn reset(&mut self) {
        self.inputs.zoom = 1.0;
        self.inputs.pan = Vec2::ZERO;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.transform = ViewTransform::compute(&self.inputs, &self.config);
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
