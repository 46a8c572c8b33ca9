//! Resize/rotate handles: the closed handle set, placement per element kind,
//! hit testing and cursors.

use crate::element::{Bounds, Element, ElementContent, ElementKind};
use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 12.0;
/// Distance from the top edge to the rotation handle (in logical units).
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Pointer cursor the host should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorKind {
    #[default]
    Default,
    Move,
    Copy,
    Crosshair,
    Grab,
    NwseResize,
    NeswResize,
    EwResize,
    NsResize,
}

/// The kind of handle. Determines which edges a resize moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    Rotate,
}

impl HandleKind {
    pub const CORNERS: [HandleKind; 4] = [
        HandleKind::TopLeft,
        HandleKind::TopRight,
        HandleKind::BottomRight,
        HandleKind::BottomLeft,
    ];

    pub const RESIZE: [HandleKind; 8] = [
        HandleKind::TopLeft,
        HandleKind::Top,
        HandleKind::TopRight,
        HandleKind::Right,
        HandleKind::BottomRight,
        HandleKind::Bottom,
        HandleKind::BottomLeft,
        HandleKind::Left,
    ];

    /// Parse a handle name as sent by hosts ("top-left", "nw", ...).
    /// Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "top-left" | "nw" => HandleKind::TopLeft,
            "top" | "top-center" | "n" => HandleKind::Top,
            "top-right" | "ne" => HandleKind::TopRight,
            "right" | "middle-right" | "e" => HandleKind::Right,
            "bottom-right" | "se" => HandleKind::BottomRight,
            "bottom" | "bottom-center" | "s" => HandleKind::Bottom,
            "bottom-left" | "sw" => HandleKind::BottomLeft,
            "left" | "middle-left" | "w" => HandleKind::Left,
            "rotate" | "rotation" => HandleKind::Rotate,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            HandleKind::TopLeft | HandleKind::TopRight | HandleKind::BottomRight | HandleKind::BottomLeft
        )
    }

    pub fn is_edge(self) -> bool {
        matches!(
            self,
            HandleKind::Top | HandleKind::Right | HandleKind::Bottom | HandleKind::Left
        )
    }

    pub fn moves_left(self) -> bool {
        matches!(self, HandleKind::TopLeft | HandleKind::Left | HandleKind::BottomLeft)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, HandleKind::TopRight | HandleKind::Right | HandleKind::BottomRight)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, HandleKind::TopLeft | HandleKind::Top | HandleKind::TopRight)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, HandleKind::BottomLeft | HandleKind::Bottom | HandleKind::BottomRight)
    }

    /// Whether the handle changes the width.
    pub fn affects_width(self) -> bool {
        self.moves_left() || self.moves_right()
    }

    /// Whether the handle changes the height.
    pub fn affects_height(self) -> bool {
        self.moves_top() || self.moves_bottom()
    }

    /// The handle diagonally or directly across. `Rotate` has none.
    pub fn opposite(self) -> Option<HandleKind> {
        let opposite = match self {
            HandleKind::TopLeft => HandleKind::BottomRight,
            HandleKind::Top => HandleKind::Bottom,
            HandleKind::TopRight => HandleKind::BottomLeft,
            HandleKind::Right => HandleKind::Left,
            HandleKind::BottomRight => HandleKind::TopLeft,
            HandleKind::Bottom => HandleKind::Top,
            HandleKind::BottomLeft => HandleKind::TopRight,
            HandleKind::Left => HandleKind::Right,
            HandleKind::Rotate => return None,
        };
        Some(opposite)
    }

    pub fn cursor(self) -> CursorKind {
        match self {
            HandleKind::TopLeft | HandleKind::BottomRight => CursorKind::NwseResize,
            HandleKind::TopRight | HandleKind::BottomLeft => CursorKind::NeswResize,
            HandleKind::Left | HandleKind::Right => CursorKind::EwResize,
            HandleKind::Top | HandleKind::Bottom => CursorKind::NsResize,
            HandleKind::Rotate => CursorKind::Grab,
        }
    }

    /// Where this handle sits on an axis-aligned rectangle.
    pub fn anchor_on(self, bounds: &Bounds) -> Point {
        match self {
            HandleKind::TopLeft => Point::new(bounds.left(), bounds.top()),
            HandleKind::Top => Point::new(bounds.center_x(), bounds.top()),
            HandleKind::TopRight => Point::new(bounds.right(), bounds.top()),
            HandleKind::Right => Point::new(bounds.right(), bounds.center_y()),
            HandleKind::BottomRight => Point::new(bounds.right(), bounds.bottom()),
            HandleKind::Bottom => Point::new(bounds.center_x(), bounds.bottom()),
            HandleKind::BottomLeft => Point::new(bounds.left(), bounds.bottom()),
            HandleKind::Left => Point::new(bounds.left(), bounds.center_y()),
            HandleKind::Rotate => Point::new(bounds.center_x(), bounds.top() - ROTATE_HANDLE_OFFSET),
        }
    }
}

/// A handle with its position in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    pub position: Point,
}

impl Handle {
    pub fn new(kind: HandleKind, position: Point) -> Self {
        Self { kind, position }
    }

    /// Check if a point hits this handle. `tolerance` is in logical units.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Handle kinds an element family exposes.
pub fn available_handles(kind: ElementKind) -> &'static [HandleKind] {
    match kind {
        ElementKind::Shape | ElementKind::Image | ElementKind::Table | ElementKind::Blurb => &[
            HandleKind::TopLeft,
            HandleKind::Top,
            HandleKind::TopRight,
            HandleKind::Right,
            HandleKind::BottomRight,
            HandleKind::Bottom,
            HandleKind::BottomLeft,
            HandleKind::Left,
            HandleKind::Rotate,
        ],
        ElementKind::Icon => &[
            HandleKind::TopLeft,
            HandleKind::TopRight,
            HandleKind::BottomRight,
            HandleKind::BottomLeft,
            HandleKind::Rotate,
        ],
        ElementKind::Text => &[HandleKind::Left, HandleKind::Right, HandleKind::Rotate],
        ElementKind::Line => &[],
    }
}

/// Whether `element` exposes `handle`.
pub fn supports_handle(element: &Element, handle: HandleKind) -> bool {
    available_handles(element.kind()).contains(&handle)
}

/// The rectangle handles attach to: the glyph bounds for icons, the element
/// box otherwise.
pub fn handle_frame(element: &Element) -> Bounds {
    match &element.content {
        ElementContent::Icon(icon) => icon.glyph.glyph_bounds(&element.bounds()),
        _ => element.bounds(),
    }
}

/// Handles for an element, rotated with it around its center.
pub fn get_handles(element: &Element) -> Vec<Handle> {
    let frame = handle_frame(element);
    let rotation = Affine::rotate_about(element.rotation, element.bounds().center());
    available_handles(element.kind())
        .iter()
        .map(|&kind| Handle::new(kind, rotation * kind.anchor_on(&frame)))
        .collect()
}

/// Find which handle (if any) is hit at the given logical point.
pub fn hit_test_handles(element: &Element, point: Point, tolerance: f64) -> Option<HandleKind> {
    get_handles(element)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}
