//! Path geometry: segments, handles and paths.
//!
//! Handles are stored as offsets from their segment's anchor. Absolute
//! handle positions are always derived (`anchor + offset`), so moving an
//! anchor carries its handles along and the two can never drift apart.

pub use kurbo::{Point, Rect, Size, Vec2};

use kurbo::{BezPath, CubicBez, ParamCurve};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Curve smoothing factor (centripetal catmull-rom).
const SMOOTH_FACTOR: f64 = 0.5;

/// Unique identifier for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathId(pub Uuid);

impl PathId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PathId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub Uuid);

impl SegmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SegmentId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity of a segment inside the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentRef {
    pub path: PathId,
    pub segment: SegmentId,
}

impl SegmentRef {
    pub fn new(path: PathId, segment: SegmentId) -> Self {
        Self { path, segment }
    }
}

/// Which of a segment's two handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleSide {
    /// Control point of the curve arriving at the anchor.
    In,
    /// Control point of the curve leaving the anchor.
    Out,
}

impl HandleSide {
    /// The other handle of the same segment.
    pub fn sibling(self) -> Self {
        match self {
            HandleSide::In => HandleSide::Out,
            HandleSide::Out => HandleSide::In,
        }
    }
}

/// A vertex of a path with optional Bézier handles.
///
/// A zero offset means "no handle on that side".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub(crate) id: SegmentId,
    /// Anchor point in logical coordinates.
    pub anchor: Point,
    /// Incoming handle, relative to the anchor.
    pub handle_in: Vec2,
    /// Outgoing handle, relative to the anchor.
    pub handle_out: Vec2,
    /// Whether dragging one handle mirrors the other (smooth point).
    pub linked: bool,
}

impl Segment {
    /// Create a straight vertex.
    pub fn new(anchor: Point) -> Self {
        Self {
            id: SegmentId::new(),
            anchor,
            handle_in: Vec2::ZERO,
            handle_out: Vec2::ZERO,
            linked: false,
        }
    }

    /// Create a smooth segment with linked handles.
    pub fn with_handles(anchor: Point, handle_in: Vec2, handle_out: Vec2) -> Self {
        Self {
            id: SegmentId::new(),
            anchor,
            handle_in,
            handle_out,
            linked: true,
        }
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    /// Handle offset for a side (zero when absent).
    pub fn handle(&self, side: HandleSide) -> Vec2 {
        match side {
            HandleSide::In => self.handle_in,
            HandleSide::Out => self.handle_out,
        }
    }

    /// Set the handle offset for a side.
    pub fn set_handle(&mut self, side: HandleSide, offset: Vec2) {
        match side {
            HandleSide::In => self.handle_in = offset,
            HandleSide::Out => self.handle_out = offset,
        }
    }

    pub fn has_handle(&self, side: HandleSide) -> bool {
        self.handle(side) != Vec2::ZERO
    }

    /// Check if either handle is present.
    pub fn has_handles(&self) -> bool {
        self.has_handle(HandleSide::In) || self.has_handle(HandleSide::Out)
    }

    /// Absolute position of a handle, if present.
    pub fn handle_position(&self, side: HandleSide) -> Option<Point> {
        self.has_handle(side).then(|| self.anchor + self.handle(side))
    }

    /// Remove both handles, turning the segment into a corner.
    pub fn clear_handles(&mut self) {
        self.handle_in = Vec2::ZERO;
        self.handle_out = Vec2::ZERO;
        self.linked = false;
    }

    /// Move the anchor; handles follow because they are offsets.
    pub fn translate(&mut self, delta: Vec2) {
        self.anchor += delta;
    }

    /// Set `side` to `original`'s offset plus `delta`.
    ///
    /// With `mirror` on a linked segment, the sibling handle (when present
    /// in `original`) moves by `-delta`.
    pub fn drag_handle(&mut self, original: &Segment, side: HandleSide, delta: Vec2, mirror: bool) {
        self.set_handle(side, original.handle(side) + delta);
        let sibling = side.sibling();
        if mirror && original.linked && original.has_handle(sibling) {
            self.set_handle(sibling, original.handle(sibling) - delta);
        } else {
            self.set_handle(sibling, original.handle(sibling));
        }
    }

    /// Check that every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.anchor.is_finite() && self.handle_in.is_finite() && self.handle_out.is_finite()
    }
}

/// An ordered sequence of segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub(crate) id: PathId,
    pub segments: Vec<Segment>,
    pub closed: bool,
}

impl Path {
    pub fn new(segments: Vec<Segment>, closed: bool) -> Self {
        Self {
            id: PathId::new(),
            segments,
            closed,
        }
    }

    /// Create a polygon/polyline of straight vertices.
    pub fn from_points(points: impl IntoIterator<Item = Point>, closed: bool) -> Self {
        Self::new(points.into_iter().map(Segment::new).collect(), closed)
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn index_of(&self, id: SegmentId) -> Option<usize> {
        self.segments.iter().position(|s| s.id == id)
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn segment_mut(&mut self, id: SegmentId) -> Option<&mut Segment> {
        self.segments.iter_mut().find(|s| s.id == id)
    }

    /// Index of the segment before `index`, wrapping on closed paths.
    pub fn previous_index(&self, index: usize) -> Option<usize> {
        let len = self.segments.len();
        if index >= len || len < 2 {
            None
        } else if index > 0 {
            Some(index - 1)
        } else if self.closed {
            Some(len - 1)
        } else {
            None
        }
    }

    /// Index of the segment after `index`, wrapping on closed paths.
    pub fn next_index(&self, index: usize) -> Option<usize> {
        let len = self.segments.len();
        if index >= len || len < 2 {
            None
        } else if index + 1 < len {
            Some(index + 1)
        } else if self.closed {
            Some(0)
        } else {
            None
        }
    }

    /// Number of curves (open paths have one fewer than segments).
    pub fn curve_count(&self) -> usize {
        match self.segments.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// The cubic running from segment `index` to the next segment.
    pub fn curve(&self, index: usize) -> Option<CubicBez> {
        if index >= self.curve_count() {
            return None;
        }
        let a = &self.segments[index];
        let b = &self.segments[(index + 1) % self.segments.len()];
        Some(CubicBez::new(
            a.anchor,
            a.anchor + a.handle_out,
            b.anchor + b.handle_in,
            b.anchor,
        ))
    }

    /// Iterate over all curves with their start-segment index.
    pub fn curves(&self) -> impl Iterator<Item = (usize, CubicBez)> + '_ {
        (0..self.curve_count()).filter_map(|i| self.curve(i).map(|c| (i, c)))
    }

    /// Bounding box of every anchor and handle (contains the whole outline).
    pub fn control_bounds(&self) -> Option<Rect> {
        let mut points = self.segments.iter().flat_map(|s| {
            [
                Some(s.anchor),
                s.handle_position(HandleSide::In),
                s.handle_position(HandleSide::Out),
            ]
            .into_iter()
            .flatten()
        });
        let first = points.next()?;
        Some(points.fold(Rect::from_points(first, first), |r, p| r.union_pt(p)))
    }

    /// Convert to a kurbo `BezPath` for renderers.
    pub fn to_bezpath(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.segments.first() else {
            return path;
        };
        path.move_to(first.anchor);
        for (_, curve) in self.curves() {
            path.curve_to(curve.p1, curve.p2, curve.p3);
        }
        if self.closed {
            path.close_path();
        }
        path
    }

    /// Derive smooth handles for the segment at `index` from its neighbors.
    ///
    /// Centripetal catmull-rom needs both neighbors, so the end segments of
    /// an open path are left without handles. Returns false if `index` is
    /// out of range.
    pub fn smooth_segment(&mut self, index: usize) -> bool {
        if index >= self.segments.len() {
            return false;
        }
        let prev = self.previous_index(index).map(|i| self.segments[i].anchor);
        let next = self.next_index(index).map(|i| self.segments[i].anchor);
        let p1 = self.segments[index].anchor;
        let p0 = prev.unwrap_or(p1);
        let p2 = next.unwrap_or(p1);

        let d1_a = p0.distance(p1).powf(SMOOTH_FACTOR);
        let d2_a = p1.distance(p2).powf(SMOOTH_FACTOR);
        let d1_2a = d1_a * d1_a;
        let d2_2a = d2_a * d2_a;
        let (v0, v1, v2) = (p0.to_vec2(), p1.to_vec2(), p2.to_vec2());

        let segment = &mut self.segments[index];
        if prev.is_some() {
            let a = 2.0 * d2_2a + 3.0 * d2_a * d1_a + d1_2a;
            let n = 3.0 * d2_a * (d2_a + d1_a);
            segment.handle_in = if n != 0.0 {
                (v0 * d2_2a + v1 * a - v2 * d1_2a) / n - v1
            } else {
                Vec2::ZERO
            };
        }
        if next.is_some() {
            let a = 2.0 * d1_2a + 3.0 * d1_a * d2_a + d2_2a;
            let n = 3.0 * d1_a * (d1_a + d2_a);
            segment.handle_out = if n != 0.0 {
                (v2 * d1_2a + v1 * a - v0 * d2_2a) / n - v1
            } else {
                Vec2::ZERO
            };
        }
        segment.linked = segment.has_handle(HandleSide::In) && segment.has_handle(HandleSide::Out);
        true
    }

    /// Split curve `index` at parameter `t`, inserting a new segment.
    ///
    /// The outline keeps its shape: the neighboring handles are shortened
    /// to the sub-curves. Straight curves get a plain vertex.
    pub fn split_curve(&mut self, index: usize, t: f64) -> Option<SegmentId> {
        let curve = self.curve(index)?;
        if !t.is_finite() || t <= 0.0 || t >= 1.0 {
            return None;
        }
        let len = self.segments.len();
        let next = (index + 1) % len;
        let straight = !self.segments[index].has_handle(HandleSide::Out)
            && !self.segments[next].has_handle(HandleSide::In);

        let segment = if straight {
            Segment::new(curve.eval(t))
        } else {
            let left = curve.subsegment(0.0..t);
            let right = curve.subsegment(t..1.0);
            self.segments[index].handle_out = left.p1 - left.p0;
            self.segments[next].handle_in = right.p2 - right.p3;
            Segment::with_handles(left.p3, left.p2 - left.p3, right.p1 - right.p0)
        };
        let id = segment.id;
        self.segments.insert(index + 1, segment);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn test_handle_position_is_anchor_plus_offset() {
        let mut seg = Segment::with_handles(
            Point::new(10.0, 10.0),
            Vec2::new(-5.0, 0.0),
            Vec2::new(5.0, 0.0),
        );
        assert_eq!(seg.handle_position(HandleSide::Out), Some(Point::new(15.0, 10.0)));

        seg.translate(Vec2::new(1.0, 2.0));
        assert_eq!(seg.handle_position(HandleSide::In), Some(Point::new(6.0, 12.0)));
        assert_eq!(seg.handle_position(HandleSide::Out), Some(Point::new(16.0, 12.0)));
    }

    #[test]
    fn test_zero_offset_means_no_handle() {
        let seg = Segment::new(Point::new(1.0, 1.0));
        assert!(!seg.has_handles());
        assert_eq!(seg.handle_position(HandleSide::In), None);
    }

    #[test]
    fn test_drag_linked_handle_mirrors_sibling() {
        let original = Segment::with_handles(Point::ZERO, Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0));
        let mut seg = original.clone();
        seg.drag_handle(&original, HandleSide::Out, Vec2::new(5.0, 0.0), true);
        assert!(approx(seg.handle_out, Vec2::new(15.0, 0.0)));
        assert!(approx(seg.handle_in, Vec2::new(-15.0, 0.0)));
    }

    #[test]
    fn test_drag_unlinked_handle_leaves_sibling() {
        let mut original = Segment::with_handles(Point::ZERO, Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0));
        original.linked = false;
        let mut seg = original.clone();
        seg.drag_handle(&original, HandleSide::In, Vec2::new(0.0, 4.0), true);
        assert!(approx(seg.handle_in, Vec2::new(-10.0, 4.0)));
        assert!(approx(seg.handle_out, Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn test_neighbors_open_and_closed() {
        let mut path = Path::from_points([Point::ZERO, Point::new(10.0, 0.0), Point::new(10.0, 10.0)], false);
        assert_eq!(path.previous_index(0), None);
        assert_eq!(path.next_index(2), None);
        assert_eq!(path.curve_count(), 2);

        path.closed = true;
        assert_eq!(path.previous_index(0), Some(2));
        assert_eq!(path.next_index(2), Some(0));
        assert_eq!(path.curve_count(), 3);
    }

    #[test]
    fn test_smooth_collinear_segment() {
        let mut path = Path::from_points(
            [Point::new(-10.0, 0.0), Point::ZERO, Point::new(10.0, 0.0)],
            false,
        );
        assert!(path.smooth_segment(1));
        let seg = &path.segments[1];
        assert!(approx(seg.handle_in, Vec2::new(-10.0 / 3.0, 0.0)));
        assert!(approx(seg.handle_out, Vec2::new(10.0 / 3.0, 0.0)));
        assert!(seg.linked);
    }

    #[test]
    fn test_smooth_open_ends_get_no_handles() {
        let mut path = Path::from_points(
            [Point::ZERO, Point::new(10.0, 0.0), Point::new(20.0, 5.0)],
            false,
        );
        assert!(path.smooth_segment(0));
        assert!(path.smooth_segment(2));
        assert!(!path.segments[0].has_handles());
        assert!(!path.segments[2].has_handles());
        assert!(!path.segments[0].linked);

        path.closed = true;
        path.smooth_segment(0);
        assert!(path.segments[0].has_handle(HandleSide::In));
        assert!(path.segments[0].has_handle(HandleSide::Out));
    }

    #[test]
    fn test_bezpath_of_closed_path() {
        let path = Path::from_points(
            [Point::ZERO, Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
            true,
        );
        let bez = path.to_bezpath();
        // move, three curves, close
        assert_eq!(bez.elements().len(), 5);
        assert!(Path::new(Vec::new(), false).to_bezpath().elements().is_empty());
    }

    #[test]
    fn test_split_straight_curve_inserts_vertex() {
        let mut path = Path::from_points([Point::ZERO, Point::new(10.0, 0.0)], false);
        let id = path.split_curve(0, 0.5).unwrap();
        assert_eq!(path.len(), 3);
        let seg = path.segment(id).unwrap();
        assert!(!seg.has_handles());
        assert!((seg.anchor.y).abs() < 1e-9);
        assert!(seg.anchor.x > 0.0 && seg.anchor.x < 10.0);
    }

    #[test]
    fn test_split_curve_preserves_shape() {
        let mut path = Path::new(
            vec![
                Segment::with_handles(Point::ZERO, Vec2::ZERO, Vec2::new(0.0, 10.0)),
                Segment::with_handles(Point::new(20.0, 0.0), Vec2::new(0.0, 10.0), Vec2::ZERO),
            ],
            false,
        );
        let before = path.curve(0).unwrap();
        let mid = before.eval(0.25);
        path.split_curve(0, 0.5).unwrap();

        assert_eq!(path.curve_count(), 2);
        let left = path.curve(0).unwrap();
        assert!((left.eval(0.5) - mid).hypot() < 1e-9);
        assert!((path.segments[1].anchor - before.eval(0.5)).hypot() < 1e-9);
    }

    #[test]
    fn test_split_rejects_endpoints() {
        let mut path = Path::from_points([Point::ZERO, Point::new(10.0, 0.0)], false);
        assert!(path.split_curve(0, 0.0).is_none());
        assert!(path.split_curve(0, f64::NAN).is_none());
        assert!(path.split_curve(3, 0.5).is_none());
    }

    #[test]
    fn test_control_bounds_include_handles() {
        let path = Path::new(
            vec![
                Segment::with_handles(Point::ZERO, Vec2::ZERO, Vec2::new(0.0, -30.0)),
                Segment::new(Point::new(10.0, 10.0)),
            ],
            false,
        );
        let bounds = path.control_bounds().unwrap();
        assert_eq!(bounds, Rect::new(0.0, -30.0, 10.0, 10.0));
    }
}
