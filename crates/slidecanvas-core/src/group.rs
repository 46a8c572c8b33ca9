//! Multi-selection bounding box: translate and resize every member together.

use crate::element::{Bounds, Element, ElementContent, ElementId, ElementPatch};
use crate::handles::HandleKind;
use crate::resize::{resize_free, resize_uniform};
use kurbo::{Size, Vec2};

/// A member's rectangle expressed as fractions of the group box.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RelativeRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[derive(Debug, Clone)]
struct Member {
    element: Element,
    relative: RelativeRect,
    min_size: Size,
}

/// The union box of the unlocked selected elements, plus each member's place
/// inside it at the time the box was built.
#[derive(Debug, Clone)]
pub struct GroupTransform {
    bounds: Bounds,
    members: Vec<Member>,
    min_size: Size,
}

impl GroupTransform {
    /// Build from the selected elements. Locked ones are left out. Returns
    /// `None` when nothing movable remains.
    ///
    /// `min_size` gives each member's minimum. The box may shrink only as far
    /// as the member that hits its minimum first allows, so the group minimum
    /// is the union size times the largest per-member scale floor on each axis.
    pub fn from_elements<'a>(
        elements: impl IntoIterator<Item = &'a Element>,
        min_size: impl Fn(&Element) -> Size,
    ) -> Option<Self> {
        let movable: Vec<&Element> = elements.into_iter().filter(|e| !e.locked).collect();
        let bounds = movable
            .iter()
            .map(|e| e.bounds())
            .reduce(|a, b| a.union(&b))?;

        let mut min_scale = Vec2::ZERO;
        let members: Vec<Member> = movable
            .into_iter()
            .map(|element| {
                let min = min_size(element);
                min_scale.x = min_scale.x.max(scale_floor(min.width, element.width));
                min_scale.y = min_scale.y.max(scale_floor(min.height, element.height));
                Member {
                    relative: relative_rect(&element.bounds(), &bounds),
                    element: element.clone(),
                    min_size: min,
                }
            })
            .collect();

        Some(Self {
            bounds,
            members,
            min_size: Size::new(bounds.width * min_scale.x, bounds.height * min_scale.y),
        })
    }

    /// The union box.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn member_ids(&self) -> Vec<ElementId> {
        self.members.iter().map(|m| m.element.id).collect()
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    /// Every member moved by the same delta.
    pub fn translate(&self, delta: Vec2) -> Vec<(ElementId, Bounds)> {
        self.members
            .iter()
            .map(|m| (m.element.id, m.element.bounds().translate(delta)))
            .collect()
    }

    /// New group box for a handle drag. Shift makes the scale proportional,
    /// taken from the axis that moved most.
    pub fn resize_box(&self, handle: HandleKind, delta: Vec2, shift: bool) -> Bounds {
        let ratio = self.bounds.width / self.bounds.height;
        if shift && ratio.is_finite() && ratio > f64::EPSILON {
            resize_uniform(&self.bounds, handle, delta, ratio, self.min_size)
        } else {
            resize_free(&self.bounds, handle, delta, self.min_size)
        }
    }

    /// Member rectangles re-applied against `new_box`, each held at its own
    /// minimum size.
    pub fn layout(&self, new_box: &Bounds) -> Vec<(ElementId, Bounds)> {
        self.members
            .iter()
            .map(|m| {
                let rect = Bounds {
                    x: new_box.x + m.relative.x * new_box.width,
                    y: new_box.y + m.relative.y * new_box.height,
                    width: (m.relative.width * new_box.width).max(m.min_size.width),
                    height: (m.relative.height * new_box.height).max(m.min_size.height),
                    id: Some(m.element.id),
                };
                (m.element.id, rect)
            })
            .collect()
    }

    /// Patches for a translate commit, positions rounded to whole units.
    pub fn translate_patches(&self, delta: Vec2) -> Vec<(ElementId, ElementPatch)> {
        self.translate(delta)
            .into_iter()
            .map(|(id, b)| {
                let b = b.round_position();
                (id, ElementPatch::position(b.x, b.y))
            })
            .collect()
    }

    /// Patches for a resize commit against `new_box`. Text members also scale
    /// their font size by the smaller of the two axis factors.
    pub fn resize_patches(&self, new_box: &Bounds) -> Vec<(ElementId, ElementPatch)> {
        let scale_x = scale_between(self.bounds.width, new_box.width);
        let scale_y = scale_between(self.bounds.height, new_box.height);
        let font_scale = scale_x.min(scale_y);

        self.layout(new_box)
            .into_iter()
            .zip(&self.members)
            .map(|((id, rect), member)| {
                let mut patch = ElementPatch::from_bounds(&rect);
                match &member.element.content {
                    ElementContent::Text(text) => {
                        let mut text = text.clone();
                        text.font_size *= font_scale;
                        patch = patch.with_content(ElementContent::Text(text));
                    }
                    ElementContent::Table(table) => {
                        patch = patch.with_content(ElementContent::Table(
                            table.scaled(scale_x, scale_y),
                        ));
                    }
                    _ => {}
                }
                (id, patch)
            })
            .collect()
    }
}

fn relative_rect(member: &Bounds, group: &Bounds) -> RelativeRect {
    let fraction = |offset: f64, extent: f64| {
        if extent > f64::EPSILON {
            offset / extent
        } else {
            0.0
        }
    };
    RelativeRect {
        x: fraction(member.x - group.x, group.width),
        y: fraction(member.y - group.y, group.height),
        width: fraction(member.width, group.width),
        height: fraction(member.height, group.height),
    }
}

/// Smallest factor a member of extent `size` can be scaled by without going
/// under `min`.
fn scale_floor(min: f64, size: f64) -> f64 {
    if size > f64::EPSILON {
        min / size
    } else {
        0.0
    }
}

fn scale_between(from: f64, to: f64) -> f64 {
    if from > f64::EPSILON {
        to / from
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ShapeContent, TextContent};

    fn shape(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::new(ElementContent::Shape(ShapeContent::default()), x, y, w, h)
    }

    fn min(_: &Element) -> Size {
        Size::new(20.0, 20.0)
    }

    #[test]
    fn test_union_skips_locked() {
        let a = shape(0.0, 0.0, 100.0, 100.0);
        let b = shape(100.0, 0.0, 100.0, 100.0);
        let mut locked = shape(500.0, 500.0, 10.0, 10.0);
        locked.locked = true;

        let group = GroupTransform::from_elements([&a, &b, &locked], min).unwrap();
        assert_eq!(group.bounds(), Bounds::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(group.member_ids(), vec![a.id, b.id]);
    }

    #[test]
    fn test_all_locked_gives_none() {
        let mut a = shape(0.0, 0.0, 10.0, 10.0);
        a.locked = true;
        assert!(GroupTransform::from_elements([&a], min).is_none());
    }

    #[test]
    fn test_affine_scaling() {
        let a = shape(0.0, 0.0, 100.0, 100.0);
        let b = shape(100.0, 0.0, 100.0, 100.0);
        let group = GroupTransform::from_elements([&a, &b], min).unwrap();

        let new_box = group.resize_box(HandleKind::Right, Vec2::new(200.0, 0.0), false);
        assert_eq!(new_box, Bounds::new(0.0, 0.0, 400.0, 100.0));

        let layout = group.layout(&new_box);
        let (_, ra) = layout[0];
        let (_, rb) = layout[1];
        assert!((ra.x - 0.0).abs() < 1e-9 && (ra.width - 200.0).abs() < 1e-9);
        assert!((rb.x - 200.0).abs() < 1e-9 && (rb.width - 200.0).abs() < 1e-9);
        assert!((ra.height - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_translate_moves_all_members() {
        let a = shape(10.0, 10.0, 50.0, 50.0);
        let b = shape(100.0, 40.0, 50.0, 50.0);
        let group = GroupTransform::from_elements([&a, &b], min).unwrap();
        let patches = group.translate_patches(Vec2::new(20.4, -5.6));
        assert_eq!(patches[0].1, ElementPatch::position(30.0, 4.0));
        assert_eq!(patches[1].1, ElementPatch::position(120.0, 34.0));
    }

    #[test]
    fn test_text_font_scales_by_smaller_factor() {
        let mut content = TextContent::new("hello");
        content.font_size = 20.0;
        let text = Element::new(ElementContent::Text(content), 0.0, 0.0, 100.0, 50.0);
        let other = shape(100.0, 0.0, 100.0, 100.0);
        let group = GroupTransform::from_elements([&text, &other], min).unwrap();

        // 200x100 -> 400x150: scale_x 2, scale_y 1.5.
        let patches = group.resize_patches(&Bounds::new(0.0, 0.0, 400.0, 150.0));
        match &patches[0].1.content {
            Some(ElementContent::Text(t)) => assert!((t.font_size - 30.0).abs() < 1e-9),
            other => panic!("expected text content, got {other:?}"),
        }
        assert!(patches[1].1.content.is_none());
    }

    #[test]
    fn test_shift_resize_is_proportional() {
        let a = shape(0.0, 0.0, 200.0, 100.0);
        let group = GroupTransform::from_elements([&a], min).unwrap();
        let new_box = group.resize_box(HandleKind::BottomRight, Vec2::new(200.0, 10.0), true);
        assert!((new_box.width - 400.0).abs() < 1e-9);
        assert!((new_box.height - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_group_minimum_keeps_every_member_above_its_minimum() {
        let a = shape(0.0, 0.0, 200.0, 100.0);
        let blurb = Element::new(ElementContent::Blurb(Default::default()), 200.0, 0.0, 200.0, 100.0);
        let config = crate::config::EngineConfig::default();
        let group = GroupTransform::from_elements([&a, &blurb], |e| config.min_size(e.kind())).unwrap();
        // Blurb minimum 120x80 on a 200x100 member: 0.6 of 400 wide, 0.8 of 100 high.
        assert!((group.min_size().width - 240.0).abs() < 1e-9);
        assert!((group.min_size().height - 80.0).abs() < 1e-9);

        let new_box = group.resize_box(HandleKind::BottomRight, Vec2::new(-1000.0, -1000.0), false);
        assert!((new_box.width - 240.0).abs() < 1e-9);
        assert!((new_box.height - 80.0).abs() < 1e-9);

        let layout = group.layout(&new_box);
        let (_, shape_rect) = layout[0];
        let (_, blurb_rect) = layout[1];
        assert!(blurb_rect.width >= 120.0 && blurb_rect.height >= 80.0);
        assert!(shape_rect.width >= 20.0 && shape_rect.height >= 20.0);
    }

    #[test]
    fn test_layout_holds_member_minimum() {
        let small = shape(0.0, 0.0, 30.0, 30.0);
        let large = shape(30.0, 0.0, 270.0, 300.0);
        let group = GroupTransform::from_elements([&small, &large], |_| Size::new(25.0, 25.0)).unwrap();

        // A box below the computed minimum still lays members out at their floor.
        let layout = group.layout(&Bounds::new(0.0, 0.0, 60.0, 60.0));
        let (_, small_rect) = layout[0];
        assert!((small_rect.width - 25.0).abs() < 1e-9);
        assert!((small_rect.height - 25.0).abs() < 1e-9);
    }
}
