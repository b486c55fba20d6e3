//! Freehand brush path shape.

use super::{SerializableColor, ShapeTrait, point_to_polyline_dist};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// Default brush stroke width in world units.
pub const DEFAULT_BRUSH_WIDTH: f64 = 4.0;

/// A freehand polyline sampled at pointer-move granularity.
///
/// May hold zero or one point when a stroke ended without movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushPath {
    /// Points in the path (world space).
    #[serde(default)]
    pub points: Vec<Point>,
    /// Stroke color.
    pub color: SerializableColor,
    /// Stroke width in world units.
    pub width: f64,
}

impl BrushPath {
    /// Create an empty black path with the default width.
    pub fn new() -> Self {
        Self::from_points(Vec::new())
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            points,
            color: SerializableColor::black(),
            width: DEFAULT_BRUSH_WIDTH,
        }
    }

    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Default for BrushPath {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeTrait for BrushPath {
    fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p))
    }

    fn distance_to(&self, point: Point) -> f64 {
        match self.points.as_slice() {
            [] => f64::INFINITY,
            [only] => (point - *only).hypot(),
            points => point_to_polyline_dist(point, points),
        }
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.points.first() else {
            return path;
        };

        path.move_to(*first);
        for point in &self.points[1..] {
            path.line_to(*point);
        }
        path
    }

    fn endpoints(&self) -> Vec<Point> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 1 => vec![*first, *last],
            (Some(first), _) => vec![*first],
            _ => Vec::new(),
        }
    }

    fn color(&self) -> SerializableColor {
        self.color
    }

    fn width(&self) -> f64 {
        self.width
    }
}
