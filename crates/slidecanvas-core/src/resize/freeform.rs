//! Free-form resize: eight handles, opposite edge fixed, optional uniform
//! scaling.

use crate::element::Bounds;
use crate::handles::HandleKind;
use kurbo::{Size, Vec2};

/// Raw width/height after moving the handle's edges by `delta`, before any
/// clamping.
fn raw_size(origin: &Bounds, handle: HandleKind, delta: Vec2) -> (f64, f64) {
    let width = if handle.moves_left() {
        origin.width - delta.x
    } else if handle.moves_right() {
        origin.width + delta.x
    } else {
        origin.width
    };
    let height = if handle.moves_top() {
        origin.height - delta.y
    } else if handle.moves_bottom() {
        origin.height + delta.y
    } else {
        origin.height
    };
    (width, height)
}

/// Place a rectangle of the given size so the edges the handle does not move
/// stay where they were in `origin`.
///
/// Axes the handle does not touch are centered on the origin when
/// `center_cross_axis` is set (uniform edge resize), and left alone otherwise.
pub(crate) fn anchor(
    origin: &Bounds,
    handle: HandleKind,
    width: f64,
    height: f64,
    center_cross_axis: bool,
) -> Bounds {
    let x = if handle.moves_left() {
        origin.right() - width
    } else if handle.affects_width() || !center_cross_axis {
        origin.x
    } else {
        origin.center_x() - width / 2.0
    };
    let y = if handle.moves_top() {
        origin.bottom() - height
    } else if handle.affects_height() || !center_cross_axis {
        origin.y
    } else {
        origin.center_y() - height / 2.0
    };
    Bounds {
        x,
        y,
        width,
        height,
        id: origin.id,
    }
}

/// Independent per-axis resize. The minimum size is applied before the
/// position is derived, so the fixed edge never drifts.
pub fn resize_free(origin: &Bounds, handle: HandleKind, delta: Vec2, min: Size) -> Bounds {
    let (width, height) = raw_size(origin, handle, delta);
    anchor(
        origin,
        handle,
        width.max(min.width),
        height.max(min.height),
        false,
    )
}

/// Uniform resize keeping `ratio` (width / height).
///
/// Corners take the factor from whichever axis changed more, relative to its
/// original size, and anchor at the opposite corner. Edges drive the
/// perpendicular axis and stay centered on the cross axis.
pub fn resize_uniform(
    origin: &Bounds,
    handle: HandleKind,
    delta: Vec2,
    ratio: f64,
    min: Size,
) -> Bounds {
    let (raw_width, raw_height) = raw_size(origin, handle, delta);

    let width_driven = if handle.is_corner() {
        let rel_x = if origin.width > f64::EPSILON {
            (raw_width / origin.width - 1.0).abs()
        } else {
            0.0
        };
        let rel_y = if origin.height > f64::EPSILON {
            (raw_height / origin.height - 1.0).abs()
        } else {
            0.0
        };
        rel_x >= rel_y
    } else {
        handle.affects_width()
    };

    let (mut width, mut height) = if width_driven {
        (raw_width, raw_width / ratio)
    } else {
        (raw_height * ratio, raw_height)
    };

    if width < min.width {
        width = min.width;
        height = width / ratio;
    }
    if height < min.height {
        height = min.height;
        width = height * ratio;
    }

    anchor(origin, handle, width, height, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Size = Size::new(20.0, 20.0);

    fn origin() -> Bounds {
        Bounds::new(100.0, 100.0, 200.0, 100.0)
    }

    #[test]
    fn test_right_handle_grows_width() {
        let b = resize_free(&origin(), HandleKind::Right, Vec2::new(50.0, 30.0), MIN);
        assert_eq!(b, Bounds::new(100.0, 100.0, 250.0, 100.0));
    }

    #[test]
    fn test_top_left_moves_origin() {
        let b = resize_free(&origin(), HandleKind::TopLeft, Vec2::new(-20.0, 10.0), MIN);
        assert_eq!(b, Bounds::new(80.0, 110.0, 220.0, 90.0));
    }

    #[test]
    fn test_minimum_size_for_every_handle() {
        let origin = origin();
        for handle in HandleKind::RESIZE {
            for delta in [
                Vec2::new(-1000.0, -1000.0),
                Vec2::new(1000.0, 1000.0),
                Vec2::new(-1000.0, 1000.0),
                Vec2::new(1000.0, -1000.0),
            ] {
                let b = resize_free(&origin, handle, delta, MIN);
                assert!(b.width >= MIN.width, "{handle:?} {delta:?}");
                assert!(b.height >= MIN.height, "{handle:?} {delta:?}");
                let u = resize_uniform(&origin, handle, delta, 2.0, MIN);
                assert!(u.width >= MIN.width - 1e-9, "{handle:?} {delta:?}");
                assert!(u.height >= MIN.height - 1e-9, "{handle:?} {delta:?}");
            }
        }
    }

    #[test]
    fn test_fixed_edge_for_every_handle() {
        let origin = origin();
        for handle in HandleKind::RESIZE {
            for delta in [Vec2::new(-500.0, -500.0), Vec2::new(37.0, -12.0), Vec2::new(500.0, 500.0)] {
                let b = resize_free(&origin, handle, delta, MIN);
                if handle.moves_left() {
                    assert!((b.right() - origin.right()).abs() < 1e-9, "{handle:?}");
                } else {
                    assert!((b.left() - origin.left()).abs() < 1e-9, "{handle:?}");
                }
                if handle.moves_top() {
                    assert!((b.bottom() - origin.bottom()).abs() < 1e-9, "{handle:?}");
                } else {
                    assert!((b.top() - origin.top()).abs() < 1e-9, "{handle:?}");
                }
            }
        }
    }

    #[test]
    fn test_uniform_corner_keeps_ratio_and_anchor() {
        let origin = origin();
        let b = resize_uniform(&origin, HandleKind::BottomRight, Vec2::new(100.0, 10.0), 2.0, MIN);
        // Width changed by 50%, height by 10%: width drives.
        assert!((b.width - 300.0).abs() < 1e-9);
        assert!((b.height - 150.0).abs() < 1e-9);
        assert!((b.x - 100.0).abs() < 1e-9);
        assert!((b.y - 100.0).abs() < 1e-9);

        let b = resize_uniform(&origin, HandleKind::TopLeft, Vec2::new(-10.0, -50.0), 2.0, MIN);
        // Height changed by 50%: height drives, bottom-right stays.
        assert!((b.height - 150.0).abs() < 1e-9);
        assert!((b.width - 300.0).abs() < 1e-9);
        assert!((b.right() - origin.right()).abs() < 1e-9);
        assert!((b.bottom() - origin.bottom()).abs() < 1e-9);
    }

    #[test]
    fn test_uniform_edge_centers_cross_axis() {
        let origin = origin();
        let b = resize_uniform(&origin, HandleKind::Right, Vec2::new(200.0, 0.0), 2.0, MIN);
        assert!((b.width - 400.0).abs() < 1e-9);
        assert!((b.height - 200.0).abs() < 1e-9);
        assert!((b.x - 100.0).abs() < 1e-9);
        assert!((b.center_y() - origin.center_y()).abs() < 1e-9);
    }

    #[test]
    fn test_uniform_minimum_keeps_ratio() {
        let b = resize_uniform(&origin(), HandleKind::BottomRight, Vec2::new(-500.0, -500.0), 2.0, MIN);
        assert!((b.width / b.height - 2.0).abs() < 1e-9);
        assert!(b.height >= MIN.height - 1e-9);
    }
}
