//! PathInk Core Library
//!
//! Platform-agnostic core of an interactive Bézier path editor: view
//! transform, hit testing, and the pointer gestures that edit paths.

pub mod config;
pub mod dispatcher;
pub mod document;
pub mod error;
pub mod geometry;
pub mod gestures;
pub mod input;
pub mod transform;

pub use config::EditorConfig;
pub use dispatcher::{EditorEvent, GestureDispatcher, RulerHint, ToolMode, select_gesture};
pub use document::Document;
pub use error::{ConfigError, EditError};
pub use geometry::{HandleSide, Path, PathId, Segment, SegmentId, SegmentRef};
pub use gestures::{Gesture, GestureContext, GestureKind, GesturePhase, LeavePolicy};
pub use hit_test::{Hit, HitTarget, HitTester};
pub use input::{Modifiers, PointerEvent, PointerEventKind};
pub use transform::{LayoutInputs, ViewTransform, Viewport};
