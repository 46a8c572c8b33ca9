//! Snap functionality for aligning elements to the slide margins and to each
//! other.
//!
//! Everything here is a pure function of the candidate rectangle, the sibling
//! rectangles and a [`SnapContext`]. Distances are compared in logical units.

use crate::config::EngineConfig;
use crate::element::{Bounds, Element, ElementId};
use crate::handles::HandleKind;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Angle snap increment in degrees.
pub const ANGLE_SNAP_INCREMENT: f64 = 15.0;

/// Guide line orientation. A vertical guide marks an x position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// A transient alignment line shown while an element snaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapGuide {
    pub orientation: Orientation,
    /// x for vertical guides, y for horizontal ones.
    pub position: f64,
    /// Extent along the guide.
    pub start: f64,
    pub end: f64,
    /// The sibling that produced the guide, if any.
    pub element_id: Option<ElementId>,
    pub is_edge: bool,
    pub is_center: bool,
}

/// An always-visible slide margin line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginGuide {
    pub orientation: Orientation,
    pub position: f64,
    pub is_edge: bool,
}

/// Slide geometry and threshold for one snap evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapContext {
    pub slide: Size,
    pub margin: f64,
    /// Snap distance in logical units.
    pub threshold: f64,
}

impl SnapContext {
    /// Context for the current stage scale. The configured pixel threshold is
    /// converted to logical units.
    pub fn new(config: &EngineConfig, scale: f64) -> Self {
        let scale = if scale > f64::EPSILON { scale } else { 1.0 };
        Self {
            slide: config.slide_size(),
            margin: config.slide_margin,
            threshold: config.snap_threshold_px / scale,
        }
    }

    fn extent(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Vertical => self.slide.width,
            Orientation::Horizontal => self.slide.height,
        }
    }

    /// Margin line positions along one axis, with their center flag.
    fn margin_lines(&self, orientation: Orientation) -> [(f64, bool); 5] {
        let extent = self.extent(orientation);
        [
            (0.0, false),
            (self.margin, false),
            (extent / 2.0, true),
            (extent - self.margin, false),
            (extent, false),
        ]
    }
}

/// Result of a snap evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapOutcome {
    pub bounds: Bounds,
    pub snapped_x: bool,
    pub snapped_y: bool,
    pub guides: Vec<SnapGuide>,
}

impl SnapOutcome {
    /// Create a result with no snapping.
    pub fn none(bounds: Bounds) -> Self {
        Self {
            bounds,
            snapped_x: false,
            snapped_y: false,
            guides: Vec::new(),
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Which part of the candidate is being aligned on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Feature {
    Start,
    Center,
    End,
}

impl Feature {
    fn value(self, start: f64, size: f64) -> f64 {
        match self {
            Feature::Start => start,
            Feature::Center => start + size / 2.0,
            Feature::End => start + size,
        }
    }
}

/// Candidate or sibling projected onto one axis.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: f64,
    size: f64,
    cross_start: f64,
    cross_end: f64,
}

impl Span {
    fn of(bounds: &Bounds, orientation: Orientation) -> Self {
        match orientation {
            Orientation::Vertical => Span {
                start: bounds.x,
                size: bounds.width,
                cross_start: bounds.top(),
                cross_end: bounds.bottom(),
            },
            Orientation::Horizontal => Span {
                start: bounds.y,
                size: bounds.height,
                cross_start: bounds.left(),
                cross_end: bounds.right(),
            },
        }
    }
}

/// Best hit found on one axis.
#[derive(Debug, Clone)]
struct AxisHit {
    feature: Feature,
    target: f64,
    distance: f64,
    guide: SnapGuide,
}

/// Keep the nearer hit; on a tie the earlier one stays.
fn consider(best: &mut Option<AxisHit>, hit: AxisHit, threshold: f64) {
    if hit.distance >= threshold {
        return;
    }
    if best.as_ref().is_none_or(|b| hit.distance < b.distance) {
        *best = Some(hit);
    }
}

fn margin_hit(
    candidate: Span,
    features: &[Feature],
    orientation: Orientation,
    ctx: &SnapContext,
) -> Option<AxisHit> {
    let cross_extent = match orientation {
        Orientation::Vertical => ctx.slide.height,
        Orientation::Horizontal => ctx.slide.width,
    };
    let mut best = None;
    for &feature in features {
        let value = feature.value(candidate.start, candidate.size);
        for (position, is_center) in ctx.margin_lines(orientation) {
            let hit = AxisHit {
                feature,
                target: position,
                distance: (position - value).abs(),
                guide: SnapGuide {
                    orientation,
                    position,
                    start: 0.0,
                    end: cross_extent,
                    element_id: None,
                    is_edge: !is_center,
                    is_center,
                },
            };
            consider(&mut best, hit, ctx.threshold);
        }
    }
    best
}

fn element_hit(
    candidate: &Bounds,
    features: &[Feature],
    others: &[Bounds],
    orientation: Orientation,
    threshold: f64,
) -> Option<AxisHit> {
    let span = Span::of(candidate, orientation);
    let mut best = None;
    for other in others.iter().filter(|o| candidate.id.is_none() || o.id != candidate.id) {
        let target = Span::of(other, orientation);
        for &feature in features {
            let value = feature.value(span.start, span.size);
            let positions: &[Feature] = match feature {
                Feature::Center => &[Feature::Center],
                Feature::Start | Feature::End => &[Feature::Start, Feature::End],
            };
            for &target_feature in positions {
                let position = target_feature.value(target.start, target.size);
                let hit = AxisHit {
                    feature,
                    target: position,
                    distance: (position - value).abs(),
                    guide: SnapGuide {
                        orientation,
                        position,
                        start: span.cross_start.min(target.cross_start),
                        end: span.cross_end.max(target.cross_end),
                        element_id: other.id,
                        is_edge: feature != Feature::Center,
                        is_center: feature == Feature::Center,
                    },
                };
                consider(&mut best, hit, threshold);
            }
        }
    }
    best
}

/// Element hits replace margin hits on the same axis.
fn resolve_axis(
    candidate: &Bounds,
    features: &[Feature],
    others: &[Bounds],
    orientation: Orientation,
    ctx: &SnapContext,
) -> Option<AxisHit> {
    element_hit(candidate, features, others, orientation, ctx.threshold)
        .or_else(|| margin_hit(Span::of(candidate, orientation), features, orientation, ctx))
}

/// The always-visible margin lines for a slide.
pub fn margin_guides(ctx: &SnapContext) -> Vec<MarginGuide> {
    [Orientation::Vertical, Orientation::Horizontal]
        .into_iter()
        .flat_map(|orientation| {
            ctx.margin_lines(orientation)
                .into_iter()
                .map(move |(position, is_center)| MarginGuide {
                    orientation,
                    position,
                    is_edge: !is_center,
                })
        })
        .collect()
}

/// Snap targets among `elements`: visible, and not in `exclude`. Order is kept.
pub fn snap_targets<'a>(
    elements: impl IntoIterator<Item = &'a Element>,
    exclude: &[ElementId],
) -> Vec<Bounds> {
    elements
        .into_iter()
        .filter(|e| e.visible && !exclude.contains(&e.id))
        .map(Element::bounds)
        .collect()
}

/// Snap a moving rectangle. Left/center/right and top/middle/bottom are all
/// eligible; the size never changes.
pub fn snap_drag(candidate: &Bounds, others: &[Bounds], ctx: &SnapContext) -> SnapOutcome {
    const ALL: [Feature; 3] = [Feature::Start, Feature::Center, Feature::End];
    let mut outcome = SnapOutcome::none(*candidate);

    if let Some(hit) = resolve_axis(candidate, &ALL, others, Orientation::Vertical, ctx) {
        outcome.bounds.x += hit.target - hit.feature.value(candidate.x, candidate.width);
        outcome.snapped_x = true;
        outcome.guides.push(hit.guide);
    }
    if let Some(hit) = resolve_axis(candidate, &ALL, others, Orientation::Horizontal, ctx) {
        outcome.bounds.y += hit.target - hit.feature.value(candidate.y, candidate.height);
        outcome.snapped_y = true;
        outcome.guides.push(hit.guide);
    }
    outcome
}

/// Snap the edges a resize handle moves. Centers never snap here, and the
/// edge opposite the handle stays where it is.
pub fn snap_resize(
    candidate: &Bounds,
    others: &[Bounds],
    handle: HandleKind,
    ctx: &SnapContext,
) -> SnapOutcome {
    let mut outcome = SnapOutcome::none(*candidate);

    let x_feature = if handle.moves_left() {
        Some(Feature::Start)
    } else if handle.moves_right() {
        Some(Feature::End)
    } else {
        None
    };
    let y_feature = if handle.moves_top() {
        Some(Feature::Start)
    } else if handle.moves_bottom() {
        Some(Feature::End)
    } else {
        None
    };

    if let Some(feature) = x_feature {
        if let Some(hit) = resolve_axis(candidate, &[feature], others, Orientation::Vertical, ctx) {
            let b = &mut outcome.bounds;
            match feature {
                Feature::Start => {
                    let right = candidate.right();
                    b.x = hit.target;
                    b.width = right - hit.target;
                }
                _ => b.width = hit.target - candidate.x,
            }
            outcome.snapped_x = true;
            outcome.guides.push(hit.guide);
        }
    }
    if let Some(feature) = y_feature {
        if let Some(hit) = resolve_axis(candidate, &[feature], others, Orientation::Horizontal, ctx) {
            let b = &mut outcome.bounds;
            match feature {
                Feature::Start => {
                    let bottom = candidate.bottom();
                    b.y = hit.target;
                    b.height = bottom - hit.target;
                }
                _ => b.height = hit.target - candidate.y,
            }
            outcome.snapped_y = true;
            outcome.guides.push(hit.guide);
        }
    }
    outcome
}

/// Snap an angle to the nearest increment.
/// Returns the snapped angle in degrees (0-360).
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    let snapped = (angle_degrees / increment).round() * increment;
    snapped.rem_euclid(360.0)
}
