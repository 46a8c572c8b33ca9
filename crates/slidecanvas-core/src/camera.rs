//! Stage module for pan/zoom transforms between screen and slide space.

use crate::config::EngineConfig;
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// The stage maps logical slide coordinates to screen coordinates.
///
/// The slide is centered in the viewport at the current scale, then shifted by
/// `position` (the pan offset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Pan offset in screen pixels.
    pub position: Vec2,
    /// Current scale, always within `[min_zoom, max_zoom]`.
    scale: f64,
    /// Viewport size in screen pixels.
    pub viewport: Size,
    /// Logical slide size.
    pub slide: Size,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
}

impl Stage {
    /// Create a stage at scale 1 with no pan.
    pub fn new(viewport: Size, config: &EngineConfig) -> Self {
        Self {
            position: Vec2::ZERO,
            scale: 1.0_f64.clamp(config.min_zoom, config.max_zoom),
            viewport,
            slide: config.slide_size(),
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_step: config.zoom_step,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Offset that centers the scaled slide inside the viewport.
    pub fn centering_offset(&self) -> Vec2 {
        Vec2::new(
            (self.viewport.width - self.slide.width * self.scale) / 2.0,
            (self.viewport.height - self.slide.height * self.scale) / 2.0,
        )
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts logical coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.position + self.centering_offset()) * Affine::scale(self.scale)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to logical coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-(self.position + self.centering_offset()))
    }

    pub fn logical_to_screen(&self, point: Point) -> Point {
        self.transform() * point
    }

    pub fn screen_to_logical(&self, point: Point) -> Point {
        self.inverse_transform() * point
    }

    /// Convert a screen-pixel distance (e.g. the snap threshold) to logical units.
    pub fn screen_distance_to_logical(&self, pixels: f64) -> f64 {
        pixels / self.scale
    }

    /// Change the viewport, e.g. on window resize.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Set the scale, clamped to the zoom bounds.
    ///
    /// The pan offset is rescaled by the same ratio, so the logical point under
    /// the viewport center stays put.
    pub fn set_scale(&mut self, scale: f64) {
        let new_scale = scale.clamp(self.min_zoom, self.max_zoom);
        if !new_scale.is_finite() || (new_scale - self.scale).abs() < f64::EPSILON {
            return;
        }
        self.position *= new_scale / self.scale;
        self.scale = new_scale;
        log::trace!("Stage scale set to {:.3}", self.scale);
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale * self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale / self.zoom_step);
    }

    /// Apply a multiplicative zoom factor (pinch, wheel).
    pub fn zoom_by(&mut self, factor: f64) {
        if factor > 0.0 && factor.is_finite() {
            self.set_scale(self.scale * factor);
        }
    }

    /// Pan the stage by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Largest scale that shows the whole slide with `padding` screen pixels
    /// around it. Resets the pan.
    pub fn fit_to_viewport(&mut self, padding: f64) {
        let available = Size::new(
            (self.viewport.width - padding * 2.0).max(1.0),
            (self.viewport.height - padding * 2.0).max(1.0),
        );
        let scale_x = available.width / self.slide.width;
        let scale_y = available.height / self.slide.height;
        self.scale = scale_x.min(scale_y).clamp(self.min_zoom, self.max_zoom);
        self.position = Vec2::ZERO;
        log::debug!("Stage fit to viewport at scale {:.3}", self.scale);
    }
}

/// Tracks the distance between two touch points during a pinch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchGesture {
    last_distance: f64,
}

impl PinchGesture {
    pub fn start(a: Point, b: Point) -> Self {
        Self {
            last_distance: (b - a).hypot(),
        }
    }

    /// Scale factor since the previous update: `new / previous` distance.
    /// A degenerate zero distance yields 1.0.
    pub fn update(&mut self, a: Point, b: Point) -> f64 {
        let distance = (b - a).hypot();
        let factor = if self.last_distance > f64::EPSILON && distance > f64::EPSILON {
            distance / self.last_distance
        } else {
            1.0
        };
        if distance > f64::EPSILON {
            self.last_distance = distance;
        }
        factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage() -> Stage {
        Stage::new(Size::new(1920.0, 1080.0), &EngineConfig::default())
    }

    #[test]
    fn test_identity_when_viewport_matches_slide() {
        let stage = stage();
        let p = Point::new(100.0, 200.0);
        let screen = stage.logical_to_screen(p);
        assert!((screen.x - 100.0).abs() < f64::EPSILON);
        assert!((screen.y - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_centering_offset() {
        let mut stage = Stage::new(Size::new(1000.0, 800.0), &EngineConfig::default());
        stage.set_scale(0.5);
        let offset = stage.centering_offset();
        assert!((offset.x - 20.0).abs() < 1e-9);
        assert!((offset.y - 130.0).abs() < 1e-9);
        let origin = stage.logical_to_screen(Point::ZERO);
        assert!((origin.x - 20.0).abs() < 1e-9);
        assert!((origin.y - 130.0).abs() < 1e-9);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut stage = Stage::new(Size::new(1280.0, 720.0), &EngineConfig::default());
        stage.set_scale(1.5);
        stage.pan(Vec2::new(30.0, -20.0));

        let original = Point::new(123.0, 456.0);
        let back = stage.logical_to_screen(stage.screen_to_logical(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut stage = stage();
        stage.set_scale(0.001);
        assert!((stage.scale() - stage.min_zoom).abs() < f64::EPSILON);
        stage.set_scale(1000.0);
        assert!((stage.scale() - stage.max_zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_keeps_viewport_center() {
        let mut stage = Stage::new(Size::new(1600.0, 900.0), &EngineConfig::default());
        stage.pan(Vec2::new(120.0, -40.0));
        let center = Point::new(800.0, 450.0);
        let before = stage.screen_to_logical(center);

        stage.zoom_in();
        stage.zoom_in();
        let after = stage.screen_to_logical(center);

        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_steps() {
        let mut stage = stage();
        stage.zoom_in();
        assert!((stage.scale() - 1.1).abs() < 1e-12);
        stage.zoom_out();
        assert!((stage.scale() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_screen_distance_scaling() {
        let mut stage = stage();
        stage.set_scale(2.0);
        assert!((stage.screen_distance_to_logical(5.0) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fit_to_viewport() {
        let mut stage = Stage::new(Size::new(1000.0, 1000.0), &EngineConfig::default());
        stage.pan(Vec2::new(50.0, 50.0));
        stage.fit_to_viewport(20.0);
        assert!((stage.scale() - 960.0 / 1920.0).abs() < 1e-12);
        assert_eq!(stage.position, Vec2::ZERO);
    }

    #[test]
    fn test_pinch_factor() {
        let mut pinch = PinchGesture::start(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let factor = pinch.update(Point::new(0.0, 0.0), Point::new(150.0, 0.0));
        assert!((factor - 1.5).abs() < 1e-12);
        let factor = pinch.update(Point::new(0.0, 0.0), Point::new(75.0, 0.0));
        assert!((factor - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_pinch_degenerate_distance() {
        let mut pinch = PinchGesture::start(Point::new(10.0, 10.0), Point::new(10.0, 10.0));
        assert!((pinch.update(Point::new(0.0, 0.0), Point::new(50.0, 0.0)) - 1.0).abs() < f64::EPSILON);
        let mut pinch = PinchGesture::start(Point::new(0.0, 0.0), Point::new(50.0, 0.0));
        assert!((pinch.update(Point::new(5.0, 5.0), Point::new(5.0, 5.0)) - 1.0).abs() < f64::EPSILON);
    }
}
