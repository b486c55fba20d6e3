//! View state for pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed scale.
pub const MIN_SCALE: f64 = 0.2;
/// Largest allowed scale.
pub const MAX_SCALE: f64 = 6.0;
/// Default wheel sensitivity: `scale *= exp(-delta_y * k)`.
pub const DEFAULT_ZOOM_SENSITIVITY: f64 = 0.0015;

/// The view transform of a canvas.
///
/// Maps world coordinates to screen coordinates with
/// `screen = world * scale + offset`, componentwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Zoom factor, always within `[MIN_SCALE, MAX_SCALE]`.
    pub scale: f64,
    /// Screen-space translation (pan).
    pub offset: Vec2,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewState {
    /// Create a view with the default transform (identity).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a view with the given scale (clamped) and offset.
    pub fn with(scale: f64, offset: Vec2) -> Self {
        Self {
            scale: clamp_scale(scale),
            offset,
        }
    }

    /// Return a copy that is safe to use as a transform.
    ///
    /// Persisted data may carry a scale outside the allowed range or a
    /// non-finite value; those are clamped or reset.
    pub fn sanitized(self) -> Self {
        let scale = if self.scale.is_finite() {
            clamp_scale(self.scale)
        } else {
            1.0
        };
        let offset = if self.offset.x.is_finite() && self.offset.y.is_finite() {
            self.offset
        } else {
            Vec2::ZERO
        };
        Self { scale, offset }
    }

    /// Affine transform from world to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Affine transform from screen to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    /// Convert a world point to screen coordinates.
    pub fn to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.offset.x,
            world.y * self.scale + self.offset.y,
        )
    }

    /// Convert a screen point to world coordinates.
    pub fn to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }

    /// Pan by a delta in screen coordinates. Independent of scale.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by `factor`, keeping the world point under `screen_point` fixed.
    ///
    /// Returns `false` if the clamped scale did not change.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) -> bool {
        let new_scale = clamp_scale(self.scale * factor);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return false;
        }

        let world_point = self.to_world(screen_point);
        self.scale = new_scale;

        // Solve offset so that to_screen(world_point) == screen_point
        self.offset = Vec2::new(
            screen_point.x - world_point.x * new_scale,
            screen_point.y - world_point.y * new_scale,
        );
        true
    }

    /// Apply a wheel event: `scale *= exp(-delta_y * sensitivity)`.
    pub fn zoom_by_wheel(&mut self, screen_point: Point, delta_y: f64, sensitivity: f64) -> bool {
        let factor = (-delta_y * sensitivity).exp();
        if !factor.is_finite() {
            return false;
        }
        self.zoom_at(screen_point, factor)
    }

    /// Reset to the identity transform.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fit the view so `bounds` (world) fills `viewport` (screen) minus padding.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        if bounds.width() <= f64::EPSILON && bounds.height() <= f64::EPSILON {
            self.reset();
            let center = bounds.center();
            self.offset = Vec2::new(
                viewport.width / 2.0 - center.x,
                viewport.height / 2.0 - center.y,
            );
            return;
        }

        let padded = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );
        let scale_x = padded.width / bounds.width().max(f64::EPSILON);
        let scale_y = padded.height / bounds.height().max(f64::EPSILON);
        self.scale = clamp_scale(scale_x.min(scale_y));

        let center = bounds.center();
        self.offset = Vec2::new(
            viewport.width / 2.0 - center.x * self.scale,
            viewport.height / 2.0 - center.y * self.scale,
        );
    }
}

/// Clamp a scale into the allowed range.
pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}
