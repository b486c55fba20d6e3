//! Backend-independent display list.

use kurbo::{Affine, BezPath, Shape as KurboShape, Stroke};
use peniko::{Color, Fill};

/// Flattening tolerance for curves such as circles.
const PATH_TOLERANCE: f64 = 0.05;

/// Which part of the frame a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Grid,
    Axes,
    Shapes,
    Preview,
    SnapMarker,
    EraserOutline,
}

/// Fill or stroke.
#[derive(Debug, Clone)]
pub enum DrawOp {
    Fill(Fill),
    Stroke(Stroke),
}

/// A single drawing command.
#[derive(Debug, Clone)]
pub struct DrawCommand {
    pub layer: Layer,
    pub op: DrawOp,
    /// Maps path coordinates to device pixels.
    pub transform: Affine,
    pub color: Color,
    pub path: BezPath,
}

/// An ordered list of drawing commands, painted back to front.
#[derive(Debug, Clone)]
pub struct Scene {
    commands: Vec<DrawCommand>,
    layer: Layer,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            layer: Layer::Background,
        }
    }

    /// Remove all commands.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.layer = Layer::Background;
    }

    /// Tag subsequent commands with `layer`.
    pub fn set_layer(&mut self, layer: Layer) {
        self.layer = layer;
    }

    /// Fill a shape.
    pub fn fill(&mut self, fill: Fill, transform: Affine, color: Color, shape: &impl KurboShape) {
        self.push(DrawOp::Fill(fill), transform, color, shape);
    }

    /// Stroke a shape.
    pub fn stroke(
        &mut self,
        stroke: &Stroke,
        transform: Affine,
        color: Color,
        shape: &impl KurboShape,
    ) {
        self.push(DrawOp::Stroke(stroke.clone()), transform, color, shape);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands tagged with `layer`.
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |c| c.layer == layer)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn push(&mut self, op: DrawOp, transform: Affine, color: Color, shape: &impl KurboShape) {
        self.commands.push(DrawCommand {
            layer: self.layer,
            op,
            transform,
            color,
            path: shape.to_path(PATH_TOLERANCE),
        });
    }
}
