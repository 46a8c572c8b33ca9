//! Text resize: horizontal handles only, height follows the wrapped content.

use super::ResizeEnv;
use crate::element::{Bounds, TextContent};
use crate::handles::HandleKind;
use crate::snap::{snap_resize, SnapGuide};
use crate::text::TextMeasureRequest;
use kurbo::Size;

/// Width change from a Left/Right handle, with the moving edge snapped and the
/// height re-measured at the new width.
///
/// Returns `None` for any other handle.
pub fn resize_text(
    origin: &Bounds,
    content: &TextContent,
    handle: HandleKind,
    delta_x: f64,
    min: Size,
    env: &ResizeEnv<'_>,
) -> Option<(Bounds, Vec<SnapGuide>)> {
    let raw_width = match handle {
        HandleKind::Left => origin.width - delta_x,
        HandleKind::Right => origin.width + delta_x,
        _ => return None,
    };
    let width = raw_width.max(min.width);
    let x = if handle == HandleKind::Left {
        origin.right() - width
    } else {
        origin.x
    };
    let mut bounds = Bounds { x, width, ..*origin };

    let mut guides = Vec::new();
    let snapped = snap_resize(&bounds, env.siblings, handle, &env.snap);
    if snapped.snapped_x && snapped.bounds.width >= min.width {
        bounds = snapped.bounds;
        guides = snapped.guides;
    }

    let metrics = env.measurer.measure(&TextMeasureRequest::for_content(content, bounds.width));
    bounds.height = metrics.height.max(min.height);
    Some((bounds, guides))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap::SnapContext;
    use crate::text::ApproxTextMeasurer;

    const MIN: Size = Size::new(40.0, 10.0);

    fn env() -> ResizeEnv<'static> {
        ResizeEnv {
            siblings: &[],
            snap: SnapContext {
                slide: Size::new(1920.0, 1080.0),
                margin: 100.0,
                threshold: 5.0,
            },
            measurer: &ApproxTextMeasurer,
        }
    }

    fn content() -> TextContent {
        TextContent {
            text: "one two three four five six".to_string(),
            font_family: "Inter".to_string(),
            font_size: 20.0,
            line_height: 1.5,
        }
    }

    #[test]
    fn test_right_handle_reflows_height() {
        let origin = Bounds::new(300.0, 300.0, 400.0, 30.0);
        // 20px font: 11px advance. 120px => 10 chars per line.
        let (b, guides) = resize_text(
            &origin,
            &content(),
            HandleKind::Right,
            -280.0,
            MIN,
            &env(),
        )
        .unwrap();
        assert!((b.width - 120.0).abs() < 1e-9);
        assert!((b.x - 300.0).abs() < f64::EPSILON);
        assert!(b.height > origin.height);
        assert!(guides.is_empty());
    }

    #[test]
    fn test_left_handle_keeps_right_edge() {
        let origin = Bounds::new(300.0, 300.0, 400.0, 30.0);
        let (b, _) = resize_text(
            &origin,
            &content(),
            HandleKind::Left,
            50.0,
            MIN,
            &env(),
        )
        .unwrap();
        assert!((b.right() - 700.0).abs() < 1e-9);
        assert!((b.width - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_minimum_width() {
        let origin = Bounds::new(300.0, 300.0, 400.0, 30.0);
        let (b, _) = resize_text(
            &origin,
            &content(),
            HandleKind::Right,
            -1000.0,
            MIN,
            &env(),
        )
        .unwrap();
        assert!((b.width - MIN.width).abs() < f64::EPSILON);
        assert!(b.height >= MIN.height);
    }

    #[test]
    fn test_moving_edge_snaps_to_margin() {
        let origin = Bounds::new(300.0, 300.0, 400.0, 30.0);
        // Right edge lands at 957, three from the midline.
        let (b, guides) = resize_text(
            &origin,
            &content(),
            HandleKind::Right,
            257.0,
            MIN,
            &env(),
        )
        .unwrap();
        assert!((b.right() - 960.0).abs() < 1e-9);
        assert_eq!(guides.len(), 1);
    }

    #[test]
    fn test_vertical_handles_rejected() {
        let origin = Bounds::new(0.0, 0.0, 100.0, 30.0);
        let result = resize_text(
            &origin,
            &content(),
            HandleKind::Bottom,
            10.0,
            MIN,
            &env(),
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_same_width_same_height() {
        let origin = Bounds::new(300.0, 300.0, 400.0, 30.0);
        let run = || {
            resize_text(
                &origin,
                &content(),
                HandleKind::Right,
                -123.0,
                MIN,
                &env(),
            )
            .unwrap()
            .0
        };
        assert_eq!(run(), run());
    }
}
