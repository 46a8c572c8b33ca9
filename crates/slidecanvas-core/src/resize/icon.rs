//! Icon resize: corner handles on the glyph bounds, aspect ratio always kept.

use super::freeform::anchor;
use crate::element::{Bounds, GlyphTransform};
use crate::handles::HandleKind;
use kurbo::{Size, Vec2};

/// Resize an icon by dragging a corner of its glyph.
///
/// The glyph scales uniformly by the factor of whichever axis moved more and
/// stays anchored at the opposite glyph corner. The element box is back-solved
/// from the new glyph so the glyph keeps its offset ratios inside it. `min`
/// applies to the element box.
///
/// Returns `None` for edge and rotate handles, which icons do not expose.
pub fn resize_icon(
    origin: &Bounds,
    glyph: &GlyphTransform,
    handle: HandleKind,
    delta: Vec2,
    min: Size,
) -> Option<Bounds> {
    if !handle.is_corner() {
        return None;
    }
    let glyph_origin = glyph.glyph_bounds(origin);
    if glyph_origin.width <= f64::EPSILON || glyph_origin.height <= f64::EPSILON {
        log::debug!("Icon glyph has zero size, resize skipped");
        return None;
    }

    let raw_width = if handle.moves_left() {
        glyph_origin.width - delta.x
    } else {
        glyph_origin.width + delta.x
    };
    let raw_height = if handle.moves_top() {
        glyph_origin.height - delta.y
    } else {
        glyph_origin.height + delta.y
    };
    let factor_x = raw_width / glyph_origin.width;
    let factor_y = raw_height / glyph_origin.height;
    let mut factor = if (factor_x - 1.0).abs() >= (factor_y - 1.0).abs() {
        factor_x
    } else {
        factor_y
    };

    // Element box scales by the same factor as the glyph.
    if origin.width > f64::EPSILON && origin.height > f64::EPSILON {
        factor = factor
            .max(min.width / origin.width)
            .max(min.height / origin.height);
    }

    let new_glyph = anchor(
        &glyph_origin,
        handle,
        glyph_origin.width * factor,
        glyph_origin.height * factor,
        false,
    );
    Some(glyph.element_bounds(&new_glyph))
}
