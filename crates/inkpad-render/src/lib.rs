//! Inkpad Render Library
//!
//! Turns canvas state into a backend-independent scene, rasterizes scenes
//! on the CPU with tiny-skia and exports PNG snapshots.

mod canvas_renderer;
mod raster;
mod renderer;
pub mod scene;

pub use canvas_renderer::CanvasRenderer;
pub use inkpad_core::config::GridStyle;
pub use raster::{PngRenderResult, RenderOptions, encode_png, export_png, rasterize, render_canvas};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use scene::{DrawCommand, DrawOp, Layer, Scene};
