//! Eraser hit-testing.

use crate::shapes::Shape;
use kurbo::Point;

/// Default eraser radius in screen pixels.
pub const DEFAULT_ERASER_RADIUS_PX: f64 = 10.0;

/// Convert an on-screen eraser size to world units.
pub fn world_radius(size_px: f64, scale: f64) -> f64 {
    size_px / scale
}

/// Check whether the eraser circle at `point` touches `shape`.
///
/// Brush paths are all-or-nothing: a hit on any piece removes the path.
/// An empty brush path is never hit.
pub fn hits(shape: &Shape, point: Point, radius: f64) -> bool {
    shape.distance_to(point) <= radius
}

/// Remove every shape the eraser touches. Returns how many were removed.
pub fn erase_at(shapes: &mut Vec<Shape>, point: Point, radius: f64) -> usize {
    let before = shapes.len();
    shapes.retain(|shape| !hits(shape, point, radius));
    before - shapes.len()
}
