//! Builds a [`Scene`] from canvas state.

use crate::renderer::{RenderContext, Renderer};
use crate::scene::{Layer, Scene};
use inkpad_core::config::GridStyle;
use inkpad_core::shapes::{Shape, StrokeStyle};
use inkpad_core::tools::ToolKind;
use kurbo::{Affine, BezPath, Cap, Circle, Join, Point, Rect, Stroke};
use peniko::{Color, Fill};

/// Radius of the endpoint snap marker in screen pixels.
const SNAP_MARKER_RADIUS: f64 = 6.0;

/// Renders the canvas into a backend-independent [`Scene`].
pub struct CanvasRenderer {
    scene: Scene,
    /// Current view scale (for zoom-independent UI elements).
    zoom: f64,
}

impl Default for CanvasRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            zoom: 1.0,
        }
    }

    /// Get the built scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take the built scene, leaving an empty one.
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Stroke a shape in world coordinates.
    fn render_shape(&mut self, shape: &Shape, transform: Affine, dash_pattern: &[f64]) {
        let color: Color = shape.color().into();
        let width = shape.width();

        match shape {
            Shape::Segment(segment) => {
                let mut stroke = round_stroke(width);
                if segment.style == StrokeStyle::Dashed && !dash_pattern.is_empty() {
                    stroke = stroke.with_dashes(0.0, dash_pattern.iter().copied());
                }
                self.scene.stroke(&stroke, transform, color, &shape.to_path());
            }
            Shape::Brush(brush) => match brush.points.as_slice() {
                [] => {}
                [only] => {
                    // A click without movement shows as a dot of the stroke width.
                    let dot = Circle::new(*only, width / 2.0);
                    self.scene.fill(Fill::NonZero, transform, color, &dot);
                }
                _ => {
                    self.scene.stroke(&round_stroke(width), transform, color, &shape.to_path());
                }
            },
        }
    }

    /// Visible world-space grid range, snapped outward to `grid_size`.
    fn grid_bounds(
        &self,
        viewport: Rect,
        view_transform: Affine,
        grid_size: f64,
    ) -> (f64, f64, f64, f64) {
        let inv = view_transform.inverse();
        let world_tl = inv * Point::new(viewport.x0, viewport.y0);
        let world_br = inv * Point::new(viewport.x1, viewport.y1);

        let start_x = (world_tl.x / grid_size).floor() * grid_size;
        let start_y = (world_tl.y / grid_size).floor() * grid_size;
        let end_x = (world_br.x / grid_size).ceil() * grid_size;
        let end_y = (world_br.y / grid_size).ceil() * grid_size;

        (start_x, start_y, end_x, end_y)
    }

    /// Render full grid lines as a single path.
    fn render_grid_lines(
        &mut self,
        viewport: Rect,
        view_transform: Affine,
        transform: Affine,
        grid_size: f64,
        color: Color,
    ) {
        let stroke = Stroke::new(1.0 / self.zoom);
        let (start_x, start_y, end_x, end_y) =
            self.grid_bounds(viewport, view_transform, grid_size);

        let mut path = BezPath::new();
        let mut x = start_x;
        while x <= end_x {
            path.move_to(Point::new(x, start_y));
            path.line_to(Point::new(x, end_y));
            x += grid_size;
        }
        let mut y = start_y;
        while y <= end_y {
            path.move_to(Point::new(start_x, y));
            path.line_to(Point::new(end_x, y));
            y += grid_size;
        }
        self.scene.stroke(&stroke, transform, color, &path);
    }

    /// Render grid as dots at intersections.
    fn render_grid_dots(
        &mut self,
        viewport: Rect,
        view_transform: Affine,
        transform: Affine,
        grid_size: f64,
        color: Color,
    ) {
        let dot_size = 1.5 / self.zoom;
        let (start_x, start_y, end_x, end_y) =
            self.grid_bounds(viewport, view_transform, grid_size);

        let mut path = BezPath::new();
        let mut x = start_x;
        while x <= end_x {
            let mut y = start_y;
            while y <= end_y {
                path.move_to(Point::new(x - dot_size, y - dot_size));
                path.line_to(Point::new(x + dot_size, y - dot_size));
                path.line_to(Point::new(x + dot_size, y + dot_size));
                path.line_to(Point::new(x - dot_size, y + dot_size));
                path.close_path();
                y += grid_size;
            }
            x += grid_size;
        }
        self.scene.fill(Fill::NonZero, transform, color, &path);
    }

    /// Axes through the world origin, spanning the viewport.
    fn render_axes(
        &mut self,
        viewport: Rect,
        view_transform: Affine,
        transform: Affine,
        color: Color,
    ) {
        let inv = view_transform.inverse();
        let world_tl = inv * Point::new(viewport.x0, viewport.y0);
        let world_br = inv * Point::new(viewport.x1, viewport.y1);
        let stroke = Stroke::new(1.5 / self.zoom);

        let mut path = BezPath::new();
        path.move_to(Point::new(world_tl.x, 0.0));
        path.line_to(Point::new(world_br.x, 0.0));
        path.move_to(Point::new(0.0, world_tl.y));
        path.line_to(Point::new(0.0, world_br.y));
        self.scene.stroke(&stroke, transform, color, &path);
    }

    /// Ring with a centre dot at a snap target (screen space).
    fn render_snap_marker(&mut self, screen: Point, transform: Affine, color: Color) {
        let ring = Circle::new(screen, SNAP_MARKER_RADIUS);
        self.scene.stroke(&Stroke::new(2.0), transform, color, &ring);
        self.scene.fill(Fill::NonZero, transform, color, &Circle::new(screen, 2.0));
    }

    /// Eraser footprint outline (screen space).
    fn render_eraser_outline(
        &mut self,
        screen: Point,
        radius_px: f64,
        transform: Affine,
        color: Color,
    ) {
        let circle = Circle::new(screen, radius_px);
        self.scene.stroke(&Stroke::new(1.5), transform, color, &circle);
    }
}

impl Renderer for CanvasRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        let canvas = ctx.canvas;
        let config = &canvas.config;
        self.zoom = canvas.view.scale;

        let viewport = Rect::from_origin_size(Point::ORIGIN, ctx.viewport_size);
        let screen_transform = Affine::scale(ctx.scale_factor);
        let view_transform = canvas.view.transform();
        let world_transform = screen_transform * view_transform;

        let background = self.background_color(ctx);
        self.scene.set_layer(Layer::Background);
        self.scene.fill(Fill::NonZero, screen_transform, background, &viewport);

        // Skipped entirely below the minimum on-screen spacing.
        let grid_size = config.grid_size;
        let spacing_px = grid_size * canvas.view.scale;
        if grid_size > 0.0 && spacing_px >= config.grid_min_spacing_px {
            self.scene.set_layer(Layer::Grid);
            match ctx.grid_style {
                GridStyle::None => {}
                GridStyle::Lines => self.render_grid_lines(
                    viewport,
                    view_transform,
                    world_transform,
                    grid_size,
                    ctx.grid_color,
                ),
                GridStyle::Dots => self.render_grid_dots(
                    viewport,
                    view_transform,
                    world_transform,
                    grid_size,
                    ctx.grid_color,
                ),
            }
        }

        self.scene.set_layer(Layer::Axes);
        self.render_axes(viewport, view_transform, world_transform, ctx.axis_color);

        self.scene.set_layer(Layer::Shapes);
        for shape in canvas.shapes() {
            self.render_shape(shape, world_transform, &config.dash_pattern);
        }

        if !ctx.show_overlays {
            return;
        }

        if let Some(preview) = canvas.tools.preview_shape() {
            self.scene.set_layer(Layer::Preview);
            self.render_shape(&preview, world_transform, &config.dash_pattern);
        }

        if let Some(target) = canvas.snap_target() {
            self.scene.set_layer(Layer::SnapMarker);
            let screen = canvas.view.to_screen(target.point);
            self.render_snap_marker(screen, screen_transform, ctx.snap_color);
        }

        if let (Some(ToolKind::Eraser), Some(hover)) = (canvas.current_tool(), canvas.hover()) {
            self.scene.set_layer(Layer::EraserOutline);
            self.render_eraser_outline(
                hover,
                config.eraser_radius_px,
                screen_transform,
                ctx.eraser_color,
            );
        }
    }
}

fn round_stroke(width: f64) -> Stroke {
    Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::DrawOp;
    use inkpad_core::camera::ViewState;
    use inkpad_core::canvas::Canvas;
    use inkpad_core::shapes::{BrushPath, Segment};
    use kurbo::{Size, Vec2};

    fn build(canvas: &Canvas) -> Scene {
        let mut renderer = CanvasRenderer::new();
        let ctx = RenderContext::new(canvas, Size::new(800.0, 600.0));
        renderer.build_scene(&ctx);
        renderer.take_scene()
    }

    #[test]
    fn test_empty_canvas_has_background_grid_axes() {
        let scene = build(&Canvas::new());
        assert_eq!(scene.commands()[0].layer, Layer::Background);
        assert_eq!(scene.layer(Layer::Grid).count(), 1);
        assert_eq!(scene.layer(Layer::Axes).count(), 1);
        assert_eq!(scene.layer(Layer::Shapes).count(), 0);
    }

    #[test]
    fn test_grid_skipped_when_too_dense() {
        let mut canvas = Canvas::new();
        // The smallest scale still gives 8px spacing, so raise the threshold.
        canvas.config.grid_min_spacing_px = 10.0;
        canvas.view = ViewState::with(0.2, Vec2::ZERO);
        let scene = build(&canvas);
        assert_eq!(scene.layer(Layer::Grid).count(), 0);
        assert_eq!(scene.layer(Layer::Axes).count(), 1);

        canvas.view = ViewState::with(0.25, Vec2::ZERO);
        assert_eq!(build(&canvas).layer(Layer::Grid).count(), 1);
    }

    #[test]
    fn test_grid_style_none() {
        let mut canvas = Canvas::new();
        canvas.config.grid_style = GridStyle::None;
        assert_eq!(build(&canvas).layer(Layer::Grid).count(), 0);
    }

    #[test]
    fn test_shapes_drawn_in_order_with_world_widths() {
        let mut canvas = Canvas::new();
        canvas
            .store
            .commit(Segment::new(Point::ZERO, Point::new(100.0, 0.0)).with_width(3.0).into());
        canvas.store.commit(
            Segment::new(Point::ZERO, Point::new(0.0, 100.0))
                .with_style(StrokeStyle::Dashed)
                .into(),
        );
        canvas.store.commit(BrushPath::from_points(vec![Point::new(5.0, 5.0)]).into());
        canvas.store.commit(BrushPath::new().into());
        canvas.view = ViewState::with(2.0, Vec2::ZERO);

        let scene = build(&canvas);
        let shapes: Vec<_> = scene.layer(Layer::Shapes).collect();
        assert_eq!(shapes.len(), 3);

        match &shapes[0].op {
            DrawOp::Stroke(stroke) => {
                assert!((stroke.width - 3.0).abs() < f64::EPSILON);
                assert!(stroke.dash_pattern.is_empty());
                assert_eq!(stroke.start_cap, Cap::Round);
            }
            other => panic!("expected stroke, got {other:?}"),
        }
        assert_eq!(shapes[0].transform, Affine::scale(2.0));
        match &shapes[1].op {
            DrawOp::Stroke(stroke) => assert_eq!(stroke.dash_pattern.as_slice(), &[10.0, 8.0]),
            other => panic!("expected stroke, got {other:?}"),
        }
        assert!(matches!(shapes[2].op, DrawOp::Fill(_)));
    }

    #[test]
    fn test_preview_and_snap_marker() {
        let mut canvas = Canvas::new();
        canvas
            .store
            .commit(Segment::new(Point::new(100.0, 100.0), Point::new(300.0, 100.0)).into());
        canvas.set_tool(Some(ToolKind::Solid));
        canvas.pointer_down(Point::new(0.0, 0.0));
        canvas.pointer_move(Point::new(103.0, 98.0));

        let scene = build(&canvas);
        assert_eq!(scene.layer(Layer::Preview).count(), 1);
        assert_eq!(scene.layer(Layer::SnapMarker).count(), 2);

        let hidden = {
            let mut renderer = CanvasRenderer::new();
            let ctx = RenderContext::new(&canvas, Size::new(800.0, 600.0)).with_overlays(false);
            renderer.build_scene(&ctx);
            renderer.take_scene()
        };
        assert_eq!(hidden.layer(Layer::Preview).count(), 0);
    }

    #[test]
    fn test_eraser_outline_follows_hover() {
        let mut canvas = Canvas::new();
        canvas.set_tool(Some(ToolKind::Eraser));
        assert_eq!(build(&canvas).layer(Layer::EraserOutline).count(), 0);

        canvas.pointer_move(Point::new(200.0, 150.0));
        let scene = build(&canvas);
        let outline: Vec<_> = scene.layer(Layer::EraserOutline).collect();
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].transform, Affine::IDENTITY);

        canvas.pointer_leave();
        assert_eq!(build(&canvas).layer(Layer::EraserOutline).count(), 0);
    }
}
