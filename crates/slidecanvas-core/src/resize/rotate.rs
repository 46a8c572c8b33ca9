//! Rotation through the handle above the top edge.

use crate::element::{Element, ElementId, ElementPatch};
use crate::snap::{snap_angle, ANGLE_SNAP_INCREMENT};
use kurbo::Point;

/// Angle (radians) of `pointer` around `center`, with 0 pointing straight up.
/// With `snap`, rounded to 15 degree steps.
pub fn rotation_angle(center: Point, pointer: Point, snap: bool) -> f64 {
    let dx = pointer.x - center.x;
    let dy = pointer.y - center.y;
    let angle = dy.atan2(dx) + std::f64::consts::FRAC_PI_2;
    if snap {
        snap_angle(angle.to_degrees(), ANGLE_SNAP_INCREMENT).to_radians()
    } else {
        angle
    }
}

/// An active rotation gesture.
#[derive(Debug, Clone)]
pub struct RotateSession {
    pub element_id: ElementId,
    center: Point,
    original: f64,
    current: f64,
}

impl RotateSession {
    /// Start rotating. Locked elements cannot be rotated.
    pub fn start(element: &Element) -> Option<Self> {
        if element.locked {
            log::debug!("Element {} is locked, rotation ignored", element.id);
            return None;
        }
        Some(Self {
            element_id: element.id,
            center: element.bounds().center(),
            original: element.rotation,
            current: element.rotation,
        })
    }

    /// Track the pointer. Returns the proposed angle.
    pub fn update(&mut self, pointer: Point, snap: bool) -> f64 {
        self.current = rotation_angle(self.center, pointer, snap);
        self.current
    }

    pub fn angle(&self) -> f64 {
        self.current
    }

    pub fn original_angle(&self) -> f64 {
        self.original
    }

    /// Patch committing the current angle.
    pub fn finish(self) -> ElementPatch {
        ElementPatch {
            rotation: Some(self.current),
            ..Default::default()
        }
    }
}
