//! Resize controllers.
//!
//! A [`ResizeSession`] owns one handle gesture from press to release. It keeps
//! the element as it was at press time, turns each pointer position into a
//! proposed rectangle through the element family's policy, and produces the
//! single [`ElementPatch`] committed on release.

mod freeform;
mod icon;
mod rotate;
mod text;

pub use freeform::{resize_free, resize_uniform};
pub use icon::resize_icon;
pub use rotate::{rotation_angle, RotateSession};
pub use text::resize_text;

use crate::config::EngineConfig;
use crate::element::{Bounds, Element, ElementContent, ElementId, ElementKind, ElementPatch};
use crate::handles::{supports_handle, HandleKind};
use crate::input::Modifiers;
use crate::snap::{snap_resize, Orientation, SnapContext, SnapGuide};
use crate::text::TextMeasurer;
use kurbo::{Point, Size, Vec2};
use std::time::{Duration, Instant};

/// Resize behavior per element family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePolicy {
    FreeForm,
    Icon,
    Text,
}

impl ResizePolicy {
    /// Lines have no resize policy.
    pub fn for_kind(kind: ElementKind) -> Option<Self> {
        match kind {
            ElementKind::Shape | ElementKind::Image | ElementKind::Table | ElementKind::Blurb => {
                Some(ResizePolicy::FreeForm)
            }
            ElementKind::Icon => Some(ResizePolicy::Icon),
            ElementKind::Text => Some(ResizePolicy::Text),
            ElementKind::Line => None,
        }
    }
}

/// What a resize frame needs from its surroundings.
pub struct ResizeEnv<'a> {
    /// Snap targets, already filtered.
    pub siblings: &'a [Bounds],
    pub snap: SnapContext,
    pub measurer: &'a dyn TextMeasurer,
}

/// One proposed resize frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeFrame {
    pub bounds: Bounds,
    /// Replacement content, for kinds whose payload tracks the size (tables).
    pub content: Option<ElementContent>,
    pub guides: Vec<SnapGuide>,
}

/// An active handle drag on one element.
#[derive(Debug, Clone)]
pub struct ResizeSession {
    origin: Element,
    handle: HandleKind,
    policy: ResizePolicy,
    min_size: Size,
    frame_interval: Duration,
    start_pointer: Point,
    last_pointer: Point,
    last_modifiers: Modifiers,
    last_good_ratio: Option<f64>,
    last_frame_at: Option<Instant>,
    frame: ResizeFrame,
}

impl ResizeSession {
    /// Begin a resize. Returns `None` when the element is locked or does not
    /// expose `handle` (including `Rotate`, which has its own session).
    pub fn start(
        element: &Element,
        handle: HandleKind,
        pointer: Point,
        config: &EngineConfig,
    ) -> Option<Self> {
        if element.locked {
            log::debug!("Element {} is locked, resize ignored", element.id);
            return None;
        }
        if handle == HandleKind::Rotate || !supports_handle(element, handle) {
            log::debug!("{:?} does not expose {:?}", element.kind(), handle);
            return None;
        }
        let policy = ResizePolicy::for_kind(element.kind())?;
        log::debug!("Resize start on {} with {:?}", element.id, handle);

        let origin_ratio = ratio_of(element.width, element.height);
        Some(Self {
            origin: element.clone(),
            handle,
            policy,
            min_size: config.min_size(element.kind()),
            frame_interval: Duration::from_millis(config.resize_frame_interval_ms),
            start_pointer: pointer,
            last_pointer: pointer,
            last_modifiers: Modifiers::default(),
            last_good_ratio: forced_ratio(element).or(origin_ratio),
            last_frame_at: None,
            frame: ResizeFrame {
                bounds: element.bounds(),
                content: None,
                guides: Vec::new(),
            },
        })
    }

    pub fn element_id(&self) -> ElementId {
        self.origin.id
    }

    pub fn handle(&self) -> HandleKind {
        self.handle
    }

    pub fn policy(&self) -> ResizePolicy {
        self.policy
    }

    /// The element as it was when the gesture started.
    pub fn origin(&self) -> &Element {
        &self.origin
    }

    /// Latest proposed frame.
    pub fn frame(&self) -> &ResizeFrame {
        &self.frame
    }

    /// Track a pointer move. Frames arriving sooner than the configured
    /// interval after the previous one reuse it.
    pub fn update(
        &mut self,
        pointer: Point,
        modifiers: Modifiers,
        env: &ResizeEnv<'_>,
        now: Instant,
    ) -> &ResizeFrame {
        self.last_pointer = pointer;
        self.last_modifiers = modifiers;
        if let Some(previous) = self.last_frame_at {
            if now.saturating_duration_since(previous) < self.frame_interval {
                log::trace!("Resize frame throttled");
                return &self.frame;
            }
        }
        self.last_frame_at = Some(now);
        self.frame = self.compute(pointer, modifiers, env);
        &self.frame
    }

    /// End the gesture. Recomputes from the last pointer position, so a
    /// throttled final move is never lost.
    pub fn finish(mut self, env: &ResizeEnv<'_>) -> ElementPatch {
        self.frame = self.compute(self.last_pointer, self.last_modifiers, env);
        log::debug!(
            "Resize end on {}: {:.1}x{:.1}",
            self.origin.id,
            self.frame.bounds.width,
            self.frame.bounds.height
        );
        let patch = ElementPatch::from_bounds(&self.frame.bounds);
        match self.frame.content {
            Some(content) => patch.with_content(content),
            None => patch,
        }
    }

    fn compute(&mut self, pointer: Point, modifiers: Modifiers, env: &ResizeEnv<'_>) -> ResizeFrame {
        let origin = self.origin.bounds();
        let delta = pointer - self.start_pointer;

        let fixed_policy = match (self.policy, &self.origin.content) {
            (ResizePolicy::Icon, ElementContent::Icon(icon)) => Some(ResizeFrame {
                bounds: resize_icon(&origin, &icon.glyph, self.handle, delta, self.min_size)
                    .unwrap_or(origin),
                content: None,
                guides: Vec::new(),
            }),
            (ResizePolicy::Text, ElementContent::Text(text)) => {
                let (bounds, guides) =
                    resize_text(&origin, text, self.handle, delta.x, self.min_size, env)
                        .unwrap_or((origin, Vec::new()));
                Some(ResizeFrame {
                    bounds,
                    content: None,
                    guides,
                })
            }
            _ => None,
        };
        match fixed_policy {
            Some(frame) => frame,
            None => self.compute_free_form(&origin, delta, modifiers, env),
        }
    }

    fn compute_free_form(
        &mut self,
        origin: &Bounds,
        delta: Vec2,
        modifiers: Modifiers,
        env: &ResizeEnv<'_>,
    ) -> ResizeFrame {
        let forced = forced_ratio(&self.origin);
        let uniform = forced.is_some() || modifiers.shift;

        let ratio = if uniform {
            let ratio = forced
                .or_else(|| ratio_of(origin.width, origin.height))
                .or(self.last_good_ratio);
            if ratio.is_none() {
                log::debug!("No usable aspect ratio for {}, resizing freely", self.origin.id);
            }
            ratio
        } else {
            None
        };

        let (bounds, guides) = match ratio {
            // Snapping one edge would break the ratio.
            Some(ratio) => (
                resize_uniform(origin, self.handle, delta, ratio, self.min_size),
                Vec::new(),
            ),
            None => {
                let proposed = resize_free(origin, self.handle, delta, self.min_size);
                self.snap_within_minimum(proposed, env)
            }
        };

        if let Some(ratio) = ratio_of(bounds.width, bounds.height) {
            if forced.is_none() && !uniform {
                self.last_good_ratio = Some(ratio);
            }
        }

        let content = match &self.origin.content {
            ElementContent::Table(table) => {
                let scale_x = scale_between(origin.width, bounds.width);
                let scale_y = scale_between(origin.height, bounds.height);
                Some(ElementContent::Table(table.scaled(scale_x, scale_y)))
            }
            _ => None,
        };

        ResizeFrame {
            bounds,
            content,
            guides,
        }
    }

    /// Apply edge snapping, dropping any axis where the snap would break the
    /// minimum size.
    fn snap_within_minimum(&self, proposed: Bounds, env: &ResizeEnv<'_>) -> (Bounds, Vec<SnapGuide>) {
        let snapped = snap_resize(&proposed, env.siblings, self.handle, &env.snap);
        let mut bounds = proposed;
        let mut guides = Vec::new();

        if snapped.snapped_x && snapped.bounds.width >= self.min_size.width {
            bounds.x = snapped.bounds.x;
            bounds.width = snapped.bounds.width;
            guides.extend(
                snapped
                    .guides
                    .iter()
                    .filter(|g| g.orientation == Orientation::Vertical)
                    .cloned(),
            );
        }
        if snapped.snapped_y && snapped.bounds.height >= self.min_size.height {
            bounds.y = snapped.bounds.y;
            bounds.height = snapped.bounds.height;
            guides.extend(
                snapped
                    .guides
                    .into_iter()
                    .filter(|g| g.orientation == Orientation::Horizontal),
            );
        }
        (bounds, guides)
    }
}

/// Width/height ratio, when both are usable.
fn ratio_of(width: f64, height: f64) -> Option<f64> {
    let ratio = width / height;
    (width > f64::EPSILON && height > f64::EPSILON && ratio.is_finite()).then_some(ratio)
}

/// Intrinsic ratio that forces uniform scaling regardless of Shift.
fn forced_ratio(element: &Element) -> Option<f64> {
    match &element.content {
        ElementContent::Shape(shape) => shape.aspect_ratio.filter(|r| *r > f64::EPSILON && r.is_finite()),
        _ => None,
    }
}

fn scale_between(from: f64, to: f64) -> f64 {
    if from > f64::EPSILON {
        to / from
    } else {
        1.0
    }
}
