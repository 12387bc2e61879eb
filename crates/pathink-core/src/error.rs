//! Error types for the editing core.

use crate::geometry::{PathId, SegmentRef};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Errors raised while a gesture edits geometry.
///
/// These never leave the dispatcher: a gesture that hits one of them
/// cancels itself and leaves the document untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Path no longer exists: {0:?}")]
    StalePath(PathId),
    #[error("Segment no longer exists: {0:?}")]
    StaleSegment(SegmentRef),
}

/// Result type for document edits.
pub type EditResult<T> = Result<T, EditError>;
