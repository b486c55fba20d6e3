//! Snap functionality for segment endpoints.
//!
//! Two behaviours, in priority order:
//! 1. endpoint snap to existing shape endpoints, measured in screen pixels
//!    so the tolerance does not change with zoom;
//! 2. axis/diagonal snap of the direction from the segment start.

use crate::camera::ViewState;
use crate::shapes::Shape;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Endpoint snap tolerance in screen pixels.
pub const ENDPOINT_SNAP_RADIUS_PX: f64 = 12.0;

/// Angular tolerance for axis/diagonal snapping, in degrees.
pub const AXIS_SNAP_TOLERANCE_DEG: f64 = 10.0;

/// Snap tolerances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnapConfig {
    /// Endpoint snap radius in screen pixels.
    pub endpoint_radius_px: f64,
    /// Axis/diagonal tolerance in degrees.
    pub angle_tolerance_deg: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            endpoint_radius_px: ENDPOINT_SNAP_RADIUS_PX,
            angle_tolerance_deg: AXIS_SNAP_TOLERANCE_DEG,
        }
    }
}

/// Which part of a shape a snap target came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapTargetKind {
    SegmentStart,
    SegmentEnd,
    BrushStart,
    BrushEnd,
}

/// A point that can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    /// Location in world space.
    pub point: Point,
    /// Origin of the target, for visual feedback.
    pub kind: SnapTargetKind,
}

/// Direction an axis snap locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSnap {
    Horizontal,
    Vertical,
    Diagonal,
}

/// How a snapped point was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapKind {
    /// Raw point, unchanged.
    None,
    /// Snapped onto an existing endpoint.
    Endpoint(SnapTarget),
    /// Direction from the segment start locked to an axis or diagonal.
    Axis(AxisSnap),
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point (world space).
    pub point: Point,
    /// How it was snapped.
    pub kind: SnapKind,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            kind: SnapKind::None,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        !matches!(self.kind, SnapKind::None)
    }

    /// The endpoint target, if this was an endpoint snap.
    pub fn endpoint_target(&self) -> Option<SnapTarget> {
        match self.kind {
            SnapKind::Endpoint(target) => Some(target),
            _ => None,
        }
    }
}

/// Collect endpoint snap targets from all shapes.
///
/// Segments contribute start and end; brush paths their first and last point.
pub fn collect_endpoint_targets(shapes: &[Shape]) -> Vec<SnapTarget> {
    let mut targets = Vec::with_capacity(shapes.len() * 2);
    for shape in shapes {
        match shape {
            Shape::Segment(s) => {
                targets.push(SnapTarget { point: s.start, kind: SnapTargetKind::SegmentStart });
                targets.push(SnapTarget { point: s.end, kind: SnapTargetKind::SegmentEnd });
            }
            Shape::Brush(b) => {
                if let Some(first) = b.points.first() {
                    targets.push(SnapTarget { point: *first, kind: SnapTargetKind::BrushStart });
                }
                if let (Some(last), true) = (b.points.last(), b.points.len() > 1) {
                    targets.push(SnapTarget { point: *last, kind: SnapTargetKind::BrushEnd });
                }
            }
        }
    }
    targets
}

/// Find the endpoint nearest to `point` in screen space, if within `radius_px`.
pub fn snap_to_endpoint(
    point: Point,
    targets: &[SnapTarget],
    view: &ViewState,
    radius_px: f64,
) -> Option<SnapTarget> {
    let screen = view.to_screen(point);
    let mut best: Option<(SnapTarget, f64)> = None;

    for target in targets {
        let dist = (view.to_screen(target.point) - screen).hypot();
        if best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((*target, dist));
        }
    }

    best.filter(|(_, dist)| *dist <= radius_px)
        .map(|(target, _)| target)
}

/// Lock the direction `start → raw` to horizontal, vertical or a diagonal.
///
/// Horizontal and vertical keep the raw coordinate along the axis; a
/// diagonal keeps the raw length. Returns `None` if no direction is within
/// `tolerance_deg` or the vector has zero length.
pub fn snap_axis(start: Point, raw: Point, tolerance_deg: f64) -> Option<(Point, AxisSnap)> {
    let delta = raw - start;
    let length = delta.hypot();
    if length < f64::EPSILON {
        return None;
    }

    let angle = delta.y.atan2(delta.x).to_degrees();
    let near = |target: f64| angle_distance(angle, target) <= tolerance_deg;

    if near(0.0) || near(180.0) {
        return Some((Point::new(raw.x, start.y), AxisSnap::Horizontal));
    }
    if near(90.0) || near(-90.0) {
        return Some((Point::new(start.x, raw.y), AxisSnap::Vertical));
    }
    for diagonal in [45.0_f64, 135.0, -45.0, -135.0] {
        if near(diagonal) {
            let rad = diagonal.to_radians();
            let point = Point::new(start.x + length * rad.cos(), start.y + length * rad.sin());
            return Some((point, AxisSnap::Diagonal));
        }
    }
    None
}

/// Snap a point while drawing a segment from `start`.
///
/// Endpoint snap wins; otherwise the axis/diagonal rule applies.
pub fn snap_segment_endpoint(
    start: Point,
    raw: Point,
    shapes: &[Shape],
    view: &ViewState,
    config: &SnapConfig,
) -> SnapResult {
    let targets = collect_endpoint_targets(shapes);
    if let Some(target) = snap_to_endpoint(raw, &targets, view, config.endpoint_radius_px) {
        return SnapResult {
            point: target.point,
            kind: SnapKind::Endpoint(target),
        };
    }

    match snap_axis(start, raw, config.angle_tolerance_deg) {
        Some((point, axis)) => SnapResult {
            point,
            kind: SnapKind::Axis(axis),
        },
        None => SnapResult::none(raw),
    }
}

/// Snap the first point of a new segment (endpoint snap only).
pub fn snap_segment_start(
    raw: Point,
    shapes: &[Shape],
    view: &ViewState,
    config: &SnapConfig,
) -> SnapResult {
    let targets = collect_endpoint_targets(shapes);
    match snap_to_endpoint(raw, &targets, view, config.endpoint_radius_px) {
        Some(target) => SnapResult {
            point: target.point,
            kind: SnapKind::Endpoint(target),
        },
        None => SnapResult::none(raw),
    }
}

/// Smallest absolute difference between two angles in degrees.
fn angle_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}
