//! Renderer trait abstraction.

use inkpad_core::canvas::Canvas;
use inkpad_core::config::GridStyle;
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid image size: {0}x{1}")]
    InvalidSize(u32, u32),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Viewport size in logical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Grid display style.
    pub grid_style: GridStyle,
    pub grid_color: Color,
    pub axis_color: Color,
    /// Color of the endpoint snap marker.
    pub snap_color: Color,
    /// Color of the eraser outline.
    pub eraser_color: Color,
    /// Draw the in-progress gesture and hover feedback.
    pub show_overlays: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a render context using the canvas configuration.
    pub fn new(canvas: &'a Canvas, viewport_size: Size) -> Self {
        let config = &canvas.config;
        Self {
            canvas,
            viewport_size,
            scale_factor: 1.0,
            background_color: config.background.into(),
            grid_style: config.grid_style,
            grid_color: config.grid_color.into(),
            axis_color: config.axis_color.into(),
            snap_color: Color::from_rgba8(236, 72, 153, 220),
            eraser_color: Color::from_rgba8(100, 116, 139, 200),
            show_overlays: true,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    /// Show or hide previews, the snap marker and the eraser outline.
    pub fn with_overlays(mut self, show: bool) -> Self {
        self.show_overlays = show;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the drawing commands for a frame. Always a full repaint.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
