//! CPU rasterization of scenes and PNG export.

use crate::canvas_renderer::CanvasRenderer;
use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use crate::scene::{DrawOp, Scene};
use inkpad_core::canvas::Canvas;
use kurbo::{Affine, BezPath, Cap, Join, PathEl, Size};
use peniko::{Color, Fill};
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, StrokeDash, Transform};

/// Result of PNG rendering - contains the raw RGBA pixel data and dimensions.
#[derive(Debug)]
pub struct PngRenderResult {
    /// RGBA pixel data (4 bytes per pixel, not premultiplied).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl PngRenderResult {
    /// RGBA value of the pixel at (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = self.rgba_data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Options for [`export_png`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Output width in logical pixels; the canvas viewport width if unset.
    pub width: Option<u32>,
    /// Output height in logical pixels; the canvas viewport height if unset.
    pub height: Option<u32>,
    /// Device pixels per logical pixel.
    pub scale_factor: f64,
    /// Include the gesture preview, snap marker and eraser outline.
    pub include_overlays: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            scale_factor: 1.0,
            include_overlays: false,
        }
    }
}

/// Rasterize a scene into an RGBA buffer of `width` x `height` device pixels.
pub fn rasterize(
    scene: &Scene,
    width: u32,
    height: u32,
    background: Color,
) -> RenderResult<PngRenderResult> {
    let mut pixmap = Pixmap::new(width, height).ok_or(RendererError::InvalidSize(width, height))?;
    pixmap.fill(to_skia_color(background));

    for command in scene.commands() {
        let Some(path) = to_skia_path(&command.path) else {
            continue;
        };
        let mut paint = Paint::default();
        let rgba = command.color.to_rgba8();
        paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, rgba.a);
        paint.anti_alias = true;
        let transform = to_skia_transform(command.transform);

        match &command.op {
            DrawOp::Fill(fill) => {
                let rule = match fill {
                    Fill::NonZero => FillRule::Winding,
                    Fill::EvenOdd => FillRule::EvenOdd,
                };
                pixmap.fill_path(&path, &paint, rule, transform, None);
            }
            DrawOp::Stroke(stroke) => {
                let stroke = to_skia_stroke(stroke);
                pixmap.stroke_path(&path, &paint, &stroke, transform, None);
            }
        }
    }

    let rgba_data = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    Ok(PngRenderResult {
        rgba_data,
        width,
        height,
    })
}

/// Encode RGBA pixels as PNG.
pub fn encode_png(image: &PngRenderResult) -> RenderResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, image.width, image.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RendererError::Encode(e.to_string()))?;
        writer
            .write_image_data(&image.rgba_data)
            .map_err(|e| RendererError::Encode(e.to_string()))?;
        writer.finish().map_err(|e| RendererError::Encode(e.to_string()))?;
    }
    Ok(png_data)
}

/// Render the canvas as currently viewed.
pub fn render_canvas(canvas: &Canvas, options: &RenderOptions) -> RenderResult<PngRenderResult> {
    let logical = Size::new(
        options.width.map_or(canvas.viewport_size.width, f64::from),
        options.height.map_or(canvas.viewport_size.height, f64::from),
    );
    if !(options.scale_factor.is_finite() && options.scale_factor > 0.0) {
        return Err(RendererError::RenderFailed(format!(
            "invalid scale factor {}",
            options.scale_factor
        )));
    }
    let width = (logical.width * options.scale_factor).round();
    let height = (logical.height * options.scale_factor).round();
    if !(width >= 1.0 && height >= 1.0 && width <= u32::MAX as f64 && height <= u32::MAX as f64) {
        return Err(RendererError::InvalidSize(width.max(0.0) as u32, height.max(0.0) as u32));
    }

    let ctx = RenderContext::new(canvas, logical)
        .with_scale_factor(options.scale_factor)
        .with_overlays(options.include_overlays);
    let mut renderer = CanvasRenderer::new();
    renderer.build_scene(&ctx);
    let background = renderer.background_color(&ctx);

    rasterize(renderer.scene(), width as u32, height as u32, background)
}

/// Render the canvas and encode it as PNG.
pub fn export_png(canvas: &Canvas, options: &RenderOptions) -> RenderResult<Vec<u8>> {
    let image = render_canvas(canvas, options)?;
    let png_data = encode_png(&image)?;
    log::info!(
        "Exported {}x{} PNG ({} bytes)",
        image.width,
        image.height,
        png_data.len()
    );
    Ok(png_data)
}

fn to_skia_color(color: Color) -> tiny_skia::Color {
    let rgba = color.to_rgba8();
    tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn to_skia_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                builder.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => builder.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

fn to_skia_stroke(stroke: &kurbo::Stroke) -> tiny_skia::Stroke {
    let dash = if stroke.dash_pattern.is_empty() {
        None
    } else {
        StrokeDash::new(
            stroke.dash_pattern.iter().map(|d| *d as f32).collect(),
            stroke.dash_offset as f32,
        )
    };
    tiny_skia::Stroke {
        width: stroke.width as f32,
        miter_limit: stroke.miter_limit as f32,
        line_cap: match stroke.start_cap {
            Cap::Butt => LineCap::Butt,
            Cap::Square => LineCap::Square,
            Cap::Round => LineCap::Round,
        },
        line_join: match stroke.join {
            Join::Bevel => LineJoin::Bevel,
            Join::Miter => LineJoin::Miter,
            Join::Round => LineJoin::Round,
        },
        dash,
    }
}
