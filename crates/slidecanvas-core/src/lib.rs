//! SlideCanvas Core Library
//!
//! Geometry and interaction engine for a fixed-size slide: stage transforms,
//! snapping, per-kind resize policies, selection and drag, the line tool and
//! multi-selection group transforms.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod document;
pub mod drag;
pub mod element;
pub mod group;
pub mod handles;
pub mod input;
pub mod resize;
pub mod snap;
pub mod text;
pub mod tools;

pub use camera::{PinchGesture, Stage};
pub use canvas::{CanvasMode, Feedback, SlideCanvas};
pub use config::{ConfigError, ConfigResult, EngineConfig};
pub use document::{DocumentStore, SlideDocument, StoreError, StoreResult};
pub use drag::{DragSession, GroupDragSession, SelectionRect};
pub use element::{Bounds, Element, ElementContent, ElementId, ElementKind, ElementPatch};
pub use group::GroupTransform;
pub use handles::{CursorKind, Handle, HandleKind};
pub use input::{Key, Modifiers, MouseButton, PointerEvent};
pub use resize::{ResizePolicy, ResizeSession, RotateSession};
pub use snap::{MarginGuide, Orientation, SnapContext, SnapGuide, SnapOutcome};
pub use text::{ApproxTextMeasurer, TextMeasurer, TextMetrics};
pub use tools::LineTool;
