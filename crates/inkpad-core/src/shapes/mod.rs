//! Shape definitions for the drawing surface.

mod brush;
mod segment;

pub use brush::{BrushPath, DEFAULT_BRUSH_WIDTH};
pub use segment::{DEFAULT_SEGMENT_WIDTH, Segment};

use kurbo::{BezPath, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => Some(Self::new(
                channel(&hex[0..1])? * 17,
                channel(&hex[1..2])? * 17,
                channel(&hex[2..3])? * 17,
                255,
            )),
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Line style of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
}

/// Distance from a point to a line segment (a→b), clamped to its extent.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Common behaviour of committed shapes.
pub trait ShapeTrait {
    /// Bounding box in world coordinates (stroke width not included).
    fn bounds(&self) -> Rect;

    /// Distance from a world point to the shape's centerline.
    fn distance_to(&self, point: Point) -> f64;

    /// Centerline path in world coordinates.
    fn to_path(&self) -> BezPath;

    /// Endpoints other segments may snap to.
    fn endpoints(&self) -> Vec<Point>;

    /// Stroke color.
    fn color(&self) -> SerializableColor;

    /// Stroke width in world units.
    fn width(&self) -> f64;
}

/// A committed shape. Never mutated in place once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Segment(Segment),
    Brush(BrushPath),
}

impl Shape {
    fn as_trait(&self) -> &dyn ShapeTrait {
        match self {
            Shape::Segment(s) => s,
            Shape::Brush(b) => b,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.as_trait().bounds()
    }

    pub fn distance_to(&self, point: Point) -> f64 {
        self.as_trait().distance_to(point)
    }

    pub fn to_path(&self) -> BezPath {
        self.as_trait().to_path()
    }

    pub fn endpoints(&self) -> Vec<Point> {
        self.as_trait().endpoints()
    }

    pub fn color(&self) -> SerializableColor {
        self.as_trait().color()
    }

    pub fn width(&self) -> f64 {
        self.as_trait().width()
    }

    /// Dash style, `Solid` for brush paths.
    pub fn stroke_style(&self) -> StrokeStyle {
        match self {
            Shape::Segment(s) => s.style,
            Shape::Brush(_) => StrokeStyle::Solid,
        }
    }

    pub fn as_segment(&self) -> Option<&Segment> {
        match self {
            Shape::Segment(s) => Some(s),
            Shape::Brush(_) => None,
        }
    }

    pub fn as_brush(&self) -> Option<&BrushPath> {
        match self {
            Shape::Brush(b) => Some(b),
            Shape::Segment(_) => None,
        }
    }
}

impl From<Segment> for Shape {
    fn from(segment: Segment) -> Self {
        Shape::Segment(segment)
    }
}

impl From<BrushPath> for Shape {
    fn from(brush: BrushPath) -> Self {
        Shape::Brush(brush)
    }
}
