//! Engine configuration: slide extent, zoom bounds, snap thresholds and
//! per-kind minimum sizes.

use crate::element::ElementKind;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Logical slide width.
pub const CANVAS_WIDTH: f64 = 1920.0;
/// Logical slide height.
pub const CANVAS_HEIGHT: f64 = 1080.0;
/// Inset of the margin guide lines from the slide boundary.
pub const SLIDE_MARGIN: f64 = 100.0;
/// Snap distance in screen pixels.
pub const SNAP_THRESHOLD: f64 = 5.0;
/// Minimum allowed stage scale.
pub const MIN_ZOOM: f64 = 0.1;
/// Maximum allowed stage scale.
pub const MAX_ZOOM: f64 = 4.0;
/// Zoom multiplier per zoom-in/zoom-out step.
pub const ZOOM_STEP: f64 = 1.1;
/// Minimum interval between two recomputed free-form resize frames.
pub const RESIZE_FRAME_INTERVAL_MS: u64 = 16;
/// Minimum extent of a line element's bounding box on either axis.
pub const LINE_MIN_EXTENT: f64 = 1.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Minimum width/height per element kind, in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinSizes {
    pub text: (f64, f64),
    pub shape: (f64, f64),
    pub image: (f64, f64),
    pub icon: (f64, f64),
    pub table: (f64, f64),
    pub blurb: (f64, f64),
    pub line: (f64, f64),
}

impl Default for MinSizes {
    fn default() -> Self {
        Self {
            text: (40.0, 10.0),
            shape: (20.0, 20.0),
            image: (20.0, 20.0),
            icon: (16.0, 16.0),
            table: (60.0, 40.0),
            blurb: (120.0, 80.0),
            line: (LINE_MIN_EXTENT, LINE_MIN_EXTENT),
        }
    }
}

impl MinSizes {
    /// Minimum size for an element kind.
    pub fn for_kind(&self, kind: ElementKind) -> Size {
        let (w, h) = match kind {
            ElementKind::Text => self.text,
            ElementKind::Shape => self.shape,
            ElementKind::Image => self.image,
            ElementKind::Icon => self.icon,
            ElementKind::Table => self.table,
            ElementKind::Blurb => self.blurb,
            ElementKind::Line => self.line,
        };
        Size::new(w, h)
    }

    fn all(&self) -> [(f64, f64); 7] {
        [
            self.text, self.shape, self.image, self.icon, self.table, self.blurb, self.line,
        ]
    }
}

/// Tunables consumed by the geometry engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub slide_width: f64,
    pub slide_height: f64,
    pub slide_margin: f64,
    /// Snap distance in screen pixels (divided by the stage scale before use).
    pub snap_threshold_px: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    pub resize_frame_interval_ms: u64,
    pub line_min_extent: f64,
    pub min_sizes: MinSizes,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            slide_width: CANVAS_WIDTH,
            slide_height: CANVAS_HEIGHT,
            slide_margin: SLIDE_MARGIN,
            snap_threshold_px: SNAP_THRESHOLD,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            resize_frame_interval_ms: RESIZE_FRAME_INTERVAL_MS,
            line_min_extent: LINE_MIN_EXTENT,
            min_sizes: MinSizes::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.slide_width > 0.0 && self.slide_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "slide size must be positive, got {}x{}",
                self.slide_width, self.slide_height
            )));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(ConfigError::Invalid(format!(
                "zoom bounds must satisfy 0 < min <= max, got [{}, {}]",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.snap_threshold_px < 0.0 {
            return Err(ConfigError::Invalid("snap threshold must not be negative".into()));
        }
        if self.zoom_step <= 1.0 {
            return Err(ConfigError::Invalid("zoom step must be greater than 1".into()));
        }
        if self.line_min_extent <= 0.0 {
            return Err(ConfigError::Invalid("line extent must be positive".into()));
        }
        if self.min_sizes.all().iter().any(|&(w, h)| w <= 0.0 || h <= 0.0) {
            return Err(ConfigError::Invalid("minimum sizes must be positive".into()));
        }
        Ok(())
    }

    /// Logical slide extent.
    pub fn slide_size(&self) -> Size {
        Size::new(self.slide_width, self.slide_height)
    }

    /// Minimum size for an element kind.
    pub fn min_size(&self, kind: ElementKind) -> Size {
        self.min_sizes.for_kind(kind)
    }
}
