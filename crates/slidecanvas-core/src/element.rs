//! Slide element definitions.
//!
//! Elements are owned by the document store. The geometry engine reads them,
//! proposes new rectangles while a gesture runs, and commits an [`ElementPatch`]
//! when it ends.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Element families. Each family has its own resize policy and minimum size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Text,
    Shape,
    Image,
    Icon,
    Table,
    Blurb,
    Line,
}

impl ElementKind {
    /// Whether this kind uses the free-form eight-handle resize policy.
    pub fn is_free_form(self) -> bool {
        matches!(
            self,
            ElementKind::Shape | ElementKind::Image | ElementKind::Table | ElementKind::Blurb
        )
    }
}

/// An axis-aligned rectangle in logical slide units, optionally tagged with the
/// element it describes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ElementId>,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            id: None,
        }
    }

    pub fn with_id(mut self, id: ElementId) -> Self {
        self.id = Some(id);
        self
    }

    /// Build from a kurbo rect (normalized so width/height are non-negative).
    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.right(), self.bottom())
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Whether `other` lies entirely inside this rectangle.
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Smallest rectangle enclosing both. The id is dropped.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::from_rect(self.to_rect().union(other.to_rect()))
    }

    pub fn translate(&self, delta: Vec2) -> Bounds {
        Bounds {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..*self
        }
    }

    /// Position rounded to whole units (size untouched).
    pub fn round_position(&self) -> Bounds {
        Bounds {
            x: self.x.round(),
            y: self.y.round(),
            ..*self
        }
    }
}

/// Placement of an icon glyph inside its element box.
///
/// Both components are normalized to the element box: the glyph's left edge
/// sits at `box.x + offset.x * box.width` and its width is
/// `scale.x * box.width`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphTransform {
    pub offset: Vec2,
    pub scale: Vec2,
}

impl Default for GlyphTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl GlyphTransform {
    /// Glyph fills the whole element box.
    pub const IDENTITY: GlyphTransform = GlyphTransform {
        offset: Vec2::ZERO,
        scale: Vec2::new(1.0, 1.0),
    };

    /// Compute the transform from an icon's viewBox and the bounds of its glyph
    /// path inside that viewBox.
    pub fn from_view_box(view_box: Rect, glyph: Rect) -> Self {
        if view_box.width() <= 0.0 || view_box.height() <= 0.0 {
            return Self::IDENTITY;
        }
        Self {
            offset: Vec2::new(
                (glyph.x0 - view_box.x0) / view_box.width(),
                (glyph.y0 - view_box.y0) / view_box.height(),
            ),
            scale: Vec2::new(
                glyph.width() / view_box.width(),
                glyph.height() / view_box.height(),
            ),
        }
    }

    /// Scale components with zero (or negative) entries replaced by 1.
    fn safe_scale(&self) -> Vec2 {
        let fix = |s: f64| if s > f64::EPSILON { s } else { 1.0 };
        Vec2::new(fix(self.scale.x), fix(self.scale.y))
    }

    /// Visual glyph bounds for an element box.
    pub fn glyph_bounds(&self, element: &Bounds) -> Bounds {
        let scale = self.safe_scale();
        Bounds {
            x: element.x + self.offset.x * element.width,
            y: element.y + self.offset.y * element.height,
            width: element.width * scale.x,
            height: element.height * scale.y,
            id: element.id,
        }
    }

    /// Back-solve the element box that places its glyph at `glyph`.
    pub fn element_bounds(&self, glyph: &Bounds) -> Bounds {
        let scale = self.safe_scale();
        let width = glyph.width / scale.x;
        let height = glyph.height / scale.y;
        Bounds {
            x: glyph.x - self.offset.x * width,
            y: glyph.y - self.offset.y * height,
            width,
            height,
            id: glyph.id,
        }
    }
}

/// Text element payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
    pub font_family: String,
    pub font_size: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_family: "Inter".to_string(),
            font_size: 24.0,
            line_height: 1.2,
        }
    }
}

/// Basic shape outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeType {
    #[default]
    Rectangle,
    Ellipse,
    Triangle,
    Star,
    Arrow,
    Decorative,
}

/// Shape element payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeContent {
    pub shape_type: ShapeType,
    /// Intrinsic width/height ratio. When set, every resize is uniform.
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
}

/// Image element payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageContent {
    pub source: String,
}

/// Icon element payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconContent {
    pub name: String,
    #[serde(default)]
    pub glyph: GlyphTransform,
}

/// Table element payload. Column widths and row heights are absolute and
/// sum to the element's width and height.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableContent {
    pub column_widths: Vec<f64>,
    pub row_heights: Vec<f64>,
}

impl TableContent {
    /// Evenly divided grid filling `width` x `height`.
    pub fn uniform(columns: usize, rows: usize, width: f64, height: f64) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            column_widths: vec![width / columns as f64; columns],
            row_heights: vec![height / rows as f64; rows],
        }
    }

    /// Grid rescaled by independent horizontal and vertical factors.
    pub fn scaled(&self, scale_x: f64, scale_y: f64) -> Self {
        Self {
            column_widths: self.column_widths.iter().map(|w| w * scale_x).collect(),
            row_heights: self.row_heights.iter().map(|h| h * scale_y).collect(),
        }
    }
}

/// Speech-bubble element payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlurbContent {
    pub text: String,
}

/// Straight line payload. Points are relative to the element's top-left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineContent {
    pub points: [Point; 2],
}

/// Type-specific element payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementContent {
    Text(TextContent),
    Shape(ShapeContent),
    Image(ImageContent),
    Icon(IconContent),
    Table(TableContent),
    Blurb(BlurbContent),
    Line(LineContent),
}

impl ElementContent {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementContent::Text(_) => ElementKind::Text,
            ElementContent::Shape(_) => ElementKind::Shape,
            ElementContent::Image(_) => ElementKind::Image,
            ElementContent::Icon(_) => ElementKind::Icon,
            ElementContent::Table(_) => ElementKind::Table,
            ElementContent::Blurb(_) => ElementKind::Blurb,
            ElementContent::Line(_) => ElementKind::Line,
        }
    }
}

/// A positioned element on the slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in radians around the element center.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    pub content: ElementContent,
    /// Presentation attributes; opaque to the geometry engine.
    #[serde(default)]
    pub style: serde_json::Value,
}

fn default_visible() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

impl Element {
    /// Create a visible, unlocked element with a fresh id.
    pub fn new(content: ElementContent, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            width,
            height,
            rotation: 0.0,
            locked: false,
            visible: true,
            opacity: 1.0,
            content,
            style: serde_json::Value::Null,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    /// Current rectangle, tagged with this element's id.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height).with_id(self.id)
    }

    /// Deep copy with a new id.
    pub fn duplicate(&self) -> Element {
        Element {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }

    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
    }

    pub fn as_text(&self) -> Option<&TextContent> {
        match &self.content {
            ElementContent::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Partial element update. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ElementContent>,
}

impl ElementPatch {
    /// Move only.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    /// Full rectangle.
    pub fn from_bounds(bounds: &Bounds) -> Self {
        Self {
            x: Some(bounds.x),
            y: Some(bounds.y),
            width: Some(bounds.width),
            height: Some(bounds.height),
            ..Default::default()
        }
    }

    pub fn with_content(mut self, content: ElementContent) -> Self {
        self.content = Some(content);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == ElementPatch::default()
    }
}
