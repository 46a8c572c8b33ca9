//! Creation tools. The line tool draws a straight line with two clicks.

use crate::element::{Element, ElementContent, LineContent};
use kurbo::{Point, Vec2};

/// State of a tool interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// First point placed, waiting for the second click.
    Active {
        /// Starting point of the interaction.
        start: Point,
        /// Current point of the interaction.
        current: Point,
    },
}

/// Shift locks the line to the dominant axis by zeroing the smaller delta.
pub fn constrain_to_axis(start: Point, end: Point, shift: bool) -> Point {
    if !shift {
        return end;
    }
    let delta = end - start;
    if delta.x.abs() >= delta.y.abs() {
        Point::new(end.x, start.y)
    } else {
        Point::new(start.x, end.y)
    }
}

/// Line element spanning `start` to `end`.
///
/// The box is the min/max envelope of the two points, at least `min_extent`
/// on each axis, and the points are stored relative to its top-left.
pub fn line_element(start: Point, end: Point, min_extent: f64) -> Element {
    let origin = Point::new(start.x.min(end.x), start.y.min(end.y));
    let width = (end.x - start.x).abs().max(min_extent);
    let height = (end.y - start.y).abs().max(min_extent);
    let to_local = |p: Point| Point::ZERO + (p - origin);
    Element::new(
        ElementContent::Line(LineContent {
            points: [to_local(start), to_local(end)],
        }),
        origin.x,
        origin.y,
        width,
        height,
    )
}

/// Two-click line tool.
#[derive(Debug, Clone, Default)]
pub struct LineTool {
    pub state: ToolState,
    min_extent: f64,
}

impl LineTool {
    pub fn new(min_extent: f64) -> Self {
        Self {
            state: ToolState::Idle,
            min_extent,
        }
    }

    /// Check if the first point has been placed.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Active { .. })
    }

    /// Handle a click. The first click stores the start; the second returns the
    /// finished line. A second click on the start point itself is ignored.
    pub fn click(&mut self, point: Point, shift: bool) -> Option<Element> {
        match self.state {
            ToolState::Idle => {
                log::debug!("Line start at ({:.1}, {:.1})", point.x, point.y);
                self.state = ToolState::Active {
                    start: point,
                    current: point,
                };
                None
            }
            ToolState::Active { start, .. } => {
                let end = constrain_to_axis(start, point, shift);
                if end - start == Vec2::ZERO {
                    log::debug!("Zero-length line ignored");
                    return None;
                }
                self.state = ToolState::Idle;
                let element = line_element(start, end, self.min_extent);
                log::debug!("Line created: {}", element.id);
                Some(element)
            }
        }
    }

    /// Track the pointer between the clicks. Returns the preview line.
    pub fn update(&mut self, point: Point, shift: bool) -> Option<Element> {
        if let ToolState::Active { start, current } = &mut self.state {
            *current = constrain_to_axis(*start, point, shift);
            return Some(line_element(*start, *current, self.min_extent));
        }
        None
    }

    /// Abandon the line in progress.
    pub fn cancel(&mut self) {
        if self.is_active() {
            log::debug!("Line tool cancelled");
        }
        self.state = ToolState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_click_line() {
        let mut tool = LineTool::new(1.0);
        assert!(!tool.is_active());

        assert!(tool.click(Point::new(300.0, 200.0), false).is_none());
        assert!(tool.is_active());

        let line = tool.click(Point::new(100.0, 260.0), false).unwrap();
        assert!(!tool.is_active());
        assert!((line.x - 100.0).abs() < f64::EPSILON);
        assert!((line.y - 200.0).abs() < f64::EPSILON);
        assert!((line.width - 200.0).abs() < f64::EPSILON);
        assert!((line.height - 60.0).abs() < f64::EPSILON);
        match &line.content {
            ElementContent::Line(l) => {
                assert_eq!(l.points[0], Point::new(200.0, 0.0));
                assert_eq!(l.points[1], Point::new(0.0, 60.0));
            }
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn test_shift_zeroes_smaller_delta() {
        assert_eq!(
            constrain_to_axis(Point::new(0.0, 0.0), Point::new(100.0, 12.0), true),
            Point::new(100.0, 0.0)
        );
        assert_eq!(
            constrain_to_axis(Point::new(0.0, 0.0), Point::new(-8.0, 90.0), true),
            Point::new(0.0, 90.0)
        );
        assert_eq!(
            constrain_to_axis(Point::new(0.0, 0.0), Point::new(100.0, 12.0), false),
            Point::new(100.0, 12.0)
        );
    }

    #[test]
    fn test_horizontal_line_has_minimum_height() {
        let mut tool = LineTool::new(1.0);
        tool.click(Point::new(10.0, 50.0), false);
        let line = tool.click(Point::new(210.0, 53.0), true).unwrap();
        assert!((line.height - 1.0).abs() < f64::EPSILON);
        assert!((line.width - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_preview_follows_pointer() {
        let mut tool = LineTool::new(1.0);
        assert!(tool.update(Point::new(5.0, 5.0), false).is_none());
        tool.click(Point::new(0.0, 0.0), false);
        let preview = tool.update(Point::new(40.0, 30.0), false).unwrap();
        assert!((preview.width - 40.0).abs() < f64::EPSILON);
        assert!(tool.is_active());
    }

    #[test]
    fn test_cancel_interaction() {
        let mut tool = LineTool::new(1.0);
        tool.click(Point::new(0.0, 0.0), false);
        tool.cancel();
        assert!(!tool.is_active());
        // Next click starts over.
        assert!(tool.click(Point::new(10.0, 10.0), false).is_none());
    }

    #[test]
    fn test_zero_length_ignored() {
        let mut tool = LineTool::new(1.0);
        tool.click(Point::new(10.0, 10.0), false);
        assert!(tool.click(Point::new(10.0, 10.0), false).is_none());
        assert!(tool.is_active());
    }
}
