//! The path collection edited by gestures.

use crate::error::{EditError, EditResult};
use crate::geometry::{Path, PathId, Segment, SegmentId, SegmentRef};

/// Ordered collection of paths (back to front).
///
/// The owning application keeps history and persistence; the editing core
/// only addresses paths and segments by id, so references held by a
/// gesture can go stale when an out-of-band edit (e.g. undo) removes them.
#[derive(Debug, Clone, Default)]
pub struct Document {
    paths: Vec<Path>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paths(paths: Vec<Path>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Add a path on top and return its id.
    pub fn add_path(&mut self, path: Path) -> PathId {
        let id = path.id();
        self.paths.push(path);
        id
    }

    /// Remove a path, returning it.
    pub fn remove_path(&mut self, id: PathId) -> Option<Path> {
        let index = self.paths.iter().position(|p| p.id() == id)?;
        Some(self.paths.remove(index))
    }

    /// Replace every path (e.g. when the application restores a snapshot).
    pub fn replace_paths(&mut self, paths: Vec<Path>) {
        self.paths = paths;
    }

    pub fn path(&self, id: PathId) -> EditResult<&Path> {
        self.paths
            .iter()
            .find(|p| p.id() == id)
            .ok_or(EditError::StalePath(id))
    }

    pub fn path_mut(&mut self, id: PathId) -> EditResult<&mut Path> {
        self.paths
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(EditError::StalePath(id))
    }

    pub fn segment(&self, target: SegmentRef) -> EditResult<&Segment> {
        self.path(target.path)?
            .segment(target.segment)
            .ok_or(EditError::StaleSegment(target))
    }

    pub fn segment_mut(&mut self, target: SegmentRef) -> EditResult<&mut Segment> {
        self.path_mut(target.path)?
            .segment_mut(target.segment)
            .ok_or(EditError::StaleSegment(target))
    }

    /// Check whether a segment reference still resolves.
    pub fn contains(&self, target: SegmentRef) -> bool {
        self.segment(target).is_ok()
    }

    /// Overwrite a live segment with a previously captured copy.
    pub fn restore_segment(&mut self, target: SegmentRef, original: &Segment) -> EditResult<()> {
        *self.segment_mut(target)? = original.clone();
        Ok(())
    }

    /// Remove a segment from its path.
    pub fn remove_segment(&mut self, target: SegmentRef) -> EditResult<Segment> {
        let path = self.path_mut(target.path)?;
        let index = path
            .index_of(target.segment)
            .ok_or(EditError::StaleSegment(target))?;
        Ok(path.segments.remove(index))
    }

    /// Find which path owns a segment.
    pub fn locate(&self, segment: SegmentId) -> Option<SegmentRef> {
        self.paths
            .iter()
            .find(|p| p.segment(segment).is_some())
            .map(|p| SegmentRef::new(p.id(), segment))
    }
}
