//! Straight segment shape.

use super::{SerializableColor, ShapeTrait, StrokeStyle, point_to_segment_dist};
use kurbo::{BezPath, Line as KurboLine, Point, Rect};
use serde::{Deserialize, Serialize};

/// Default segment stroke width in world units.
pub const DEFAULT_SEGMENT_WIDTH: f64 = 2.0;

/// A straight segment between two world points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Solid or dashed.
    #[serde(default)]
    pub style: StrokeStyle,
    /// Stroke color.
    pub color: SerializableColor,
    /// Stroke width in world units.
    pub width: f64,
}

impl Segment {
    /// Create a solid black segment with the default width.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            style: StrokeStyle::Solid,
            color: SerializableColor::black(),
            width: DEFAULT_SEGMENT_WIDTH,
        }
    }

    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Length of the segment.
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    /// Midpoint of the segment.
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Get as a kurbo Line.
    pub fn as_kurbo(&self) -> KurboLine {
        KurboLine::new(self.start, self.end)
    }
}

impl ShapeTrait for Segment {
    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn distance_to(&self, point: Point) -> f64 {
        point_to_segment_dist(point, self.start, self.end)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }

    fn endpoints(&self) -> Vec<Point> {
        vec![self.start, self.end]
    }

    fn color(&self) -> SerializableColor {
        self.color
    }

    fn width(&self) -> f64 {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_creation() {
        let segment = Segment::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!((segment.length() - 100.0).abs() < f64::EPSILON);
        assert_eq!(segment.style, StrokeStyle::Solid);
    }

    #[test]
    fn test_midpoint() {
        let segment = Segment::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        assert_eq!(segment.midpoint(), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_distance() {
        let segment = Segment::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(segment.distance_to(Point::new(50.0, 0.0)).abs() < f64::EPSILON);
        assert!((segment.distance_to(Point::new(50.0, 50.0)) - 50.0).abs() < 1e-9);
        assert!((segment.distance_to(Point::new(110.0, 0.0)) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds() {
        let segment = Segment::new(Point::new(50.0, 80.0), Point::new(10.0, 20.0));
        let bounds = segment.bounds();
        assert_eq!(bounds, Rect::new(10.0, 20.0, 50.0, 80.0));
    }

    #[test]
    fn test_zero_length_path_still_drawable() {
        let segment = Segment::new(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        assert_eq!(segment.to_path().elements().len(), 2);
    }
}
