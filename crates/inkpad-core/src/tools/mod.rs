//! Drawing tools and the interaction state.

use crate::shapes::{BrushPath, Segment, SerializableColor, Shape, StrokeStyle};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available drawing tools. No tool selected means pointer drags pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Solid,
    Dashed,
    Brush,
    Eraser,
}

impl ToolKind {
    /// Segment style drawn by this tool, if it draws segments.
    pub fn segment_style(self) -> Option<StrokeStyle> {
        match self {
            ToolKind::Solid => Some(StrokeStyle::Solid),
            ToolKind::Dashed => Some(StrokeStyle::Dashed),
            ToolKind::Brush | ToolKind::Eraser => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Solid => "solid",
            ToolKind::Dashed => "dashed",
            ToolKind::Brush => "brush",
            ToolKind::Eraser => "eraser",
        }
    }
}

/// The single active interaction state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Dragging the view. `last` is the previous pointer position (screen).
    Panning { last: Point },
    /// Drawing a straight segment (world coordinates).
    DrawingSegment {
        start: Point,
        live_end: Point,
        style: StrokeStyle,
    },
    /// Drawing a freehand stroke (world coordinates).
    DrawingBrush { points: Vec<Point> },
    /// Eraser held down.
    Erasing,
}

impl InteractionState {
    /// True while a segment or brush stroke is being drawn.
    pub fn is_drawing(&self) -> bool {
        matches!(
            self,
            InteractionState::DrawingSegment { .. } | InteractionState::DrawingBrush { .. }
        )
    }

    /// True for any state other than `Idle`.
    pub fn is_active(&self) -> bool {
        !matches!(self, InteractionState::Idle)
    }
}

/// Manages the current tool, its stroke settings and the interaction state.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: Option<ToolKind>,
    /// Current interaction state.
    pub state: InteractionState,
    /// Color applied to new shapes.
    pub stroke_color: SerializableColor,
    /// Width of new segments (world units).
    pub segment_width: f64,
    /// Width of new brush paths (world units).
    pub brush_width: f64,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            current_tool: None,
            state: InteractionState::Idle,
            stroke_color: SerializableColor::black(),
            segment_width: crate::shapes::DEFAULT_SEGMENT_WIDTH,
            brush_width: crate::shapes::DEFAULT_BRUSH_WIDTH,
        }
    }
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool. Any gesture in progress is dropped.
    pub fn set_tool(&mut self, tool: Option<ToolKind>) {
        self.current_tool = tool;
        self.state = InteractionState::Idle;
    }

    /// Drop any gesture in progress without producing a shape.
    pub fn cancel(&mut self) {
        self.state = InteractionState::Idle;
    }

    /// Check if a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Build a segment with the current stroke settings.
    pub fn make_segment(&self, start: Point, end: Point, style: StrokeStyle) -> Segment {
        Segment::new(start, end)
            .with_style(style)
            .with_color(self.stroke_color)
            .with_width(self.segment_width)
    }

    /// Build a brush path with the current stroke settings.
    pub fn make_brush(&self, points: Vec<Point>) -> BrushPath {
        BrushPath::from_points(points)
            .with_color(self.stroke_color)
            .with_width(self.brush_width)
    }

    /// The shape the in-progress gesture would commit, for previews.
    pub fn preview_shape(&self) -> Option<Shape> {
        match &self.state {
            InteractionState::DrawingSegment { start, live_end, style } => {
                Some(self.make_segment(*start, *live_end, *style).into())
            }
            InteractionState::DrawingBrush { points } => {
                Some(self.make_brush(points.clone()).into())
            }
            _ => None,
        }
    }
}
