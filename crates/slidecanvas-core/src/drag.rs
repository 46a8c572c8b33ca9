//! Rubber band selection, single-element drag and group drag.

use crate::element::{Bounds, Element, ElementId, ElementPatch};
use crate::group::GroupTransform;
use crate::snap::{snap_drag, SnapContext, SnapGuide};
use kurbo::{Point, Rect, Vec2};

/// Marquee rectangle while dragging over empty canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    /// Starting point in logical coordinates.
    pub start: Point,
    /// Current point in logical coordinates.
    pub current: Point,
}

impl SelectionRect {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            current: start,
        }
    }

    /// Get the selection rectangle as a Rect.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.start.x.min(self.current.x),
            self.start.y.min(self.current.y),
            self.start.x.max(self.current.x),
            self.start.y.max(self.current.y),
        )
    }

    pub fn to_bounds(&self) -> Bounds {
        Bounds::from_rect(self.to_rect())
    }

    /// Ids of the visible elements lying fully inside the band, in document order.
    pub fn select<'a>(&self, elements: impl IntoIterator<Item = &'a Element>) -> Vec<ElementId> {
        let band = self.to_bounds();
        elements
            .into_iter()
            .filter(|e| e.visible && band.contains_bounds(&e.bounds()))
            .map(|e| e.id)
            .collect()
    }
}

/// An active single-element drag.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub element_id: ElementId,
    /// Whether the dragged element is an alt-drag copy.
    pub is_duplicate: bool,
    origin: Bounds,
    start_pointer: Point,
    moved: bool,
    current: Bounds,
    guides: Vec<SnapGuide>,
}

impl DragSession {
    /// Start dragging `element`. Locked elements cannot be dragged.
    pub fn start(element: &Element, pointer: Point, is_duplicate: bool) -> Option<Self> {
        if element.locked {
            log::debug!("Element {} is locked, drag ignored", element.id);
            return None;
        }
        log::debug!("Drag start on {} (duplicate: {})", element.id, is_duplicate);
        Some(Self {
            element_id: element.id,
            is_duplicate,
            origin: element.bounds(),
            start_pointer: pointer,
            moved: false,
            current: element.bounds(),
            guides: Vec::new(),
        })
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current.origin() - self.origin.origin()
    }

    /// Move to follow the pointer, snapping against `siblings`. Returns the
    /// proposed rectangle. Nothing snaps until the pointer leaves its start.
    pub fn update(&mut self, pointer: Point, siblings: &[Bounds], ctx: &SnapContext) -> Bounds {
        if !self.moved && pointer == self.start_pointer {
            return self.current;
        }
        self.moved = true;
        let candidate = self.origin.translate(pointer - self.start_pointer);
        let outcome = snap_drag(&candidate, siblings, ctx);
        self.current = outcome.bounds;
        self.guides = outcome.guides;
        self.current
    }

    pub fn current(&self) -> Bounds {
        self.current
    }

    pub fn guides(&self) -> &[SnapGuide] {
        &self.guides
    }

    /// Whether the pointer has left its starting point.
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Patch committing the position, rounded to whole units. Empty when the
    /// pointer never moved.
    pub fn finish(self) -> ElementPatch {
        if !self.moved {
            log::trace!("Drag on {} ended without movement", self.element_id);
            return ElementPatch::default();
        }
        let rounded = self.current.round_position();
        log::debug!("Drag end on {} at ({}, {})", self.element_id, rounded.x, rounded.y);
        ElementPatch::position(rounded.x, rounded.y)
    }
}

/// An active drag of the whole multi-selection.
#[derive(Debug, Clone)]
pub struct GroupDragSession {
    group: GroupTransform,
    start_pointer: Point,
    moved: bool,
    delta: Vec2,
    guides: Vec<SnapGuide>,
}

impl GroupDragSession {
    pub fn new(group: GroupTransform, pointer: Point) -> Self {
        log::debug!("Group drag start with {} members", group.member_ids().len());
        Self {
            group,
            start_pointer: pointer,
            moved: false,
            delta: Vec2::ZERO,
            guides: Vec::new(),
        }
    }

    pub fn group(&self) -> &GroupTransform {
        &self.group
    }

    /// Move the group box, snapping it as one rectangle. Returns each member's
    /// proposed rectangle.
    pub fn update(
        &mut self,
        pointer: Point,
        siblings: &[Bounds],
        ctx: &SnapContext,
    ) -> Vec<(ElementId, Bounds)> {
        if !self.moved && pointer == self.start_pointer {
            return self.group.translate(Vec2::ZERO);
        }
        self.moved = true;
        let origin = self.group.bounds();
        let candidate = origin.translate(pointer - self.start_pointer);
        let outcome = snap_drag(&candidate, siblings, ctx);
        self.delta = outcome.bounds.origin() - origin.origin();
        self.guides = outcome.guides;
        self.group.translate(self.delta)
    }

    pub fn guides(&self) -> &[SnapGuide] {
        &self.guides
    }

    /// One patch per member for a single batched commit. Empty when the
    /// pointer never moved.
    pub fn finish(self) -> Vec<(ElementId, ElementPatch)> {
        if !self.moved {
            return Vec::new();
        }
        self.group.translate_patches(self.delta)
    }
}
