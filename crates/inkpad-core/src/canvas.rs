//! The interactive canvas: drawing, erasing, pan and zoom.

use crate::camera::ViewState;
use crate::config::CanvasConfig;
use crate::eraser;
use crate::input::{Command, InputEvent, Modifiers};
use crate::shapes::Shape;
use crate::snap::{self, SnapKind, SnapTarget};
use crate::store::GeometryStore;
use crate::tools::{InteractionState, ToolKind, ToolManager};
use kurbo::{Point, Size};

/// Padding in screen pixels used by fit-to-content.
const FIT_PADDING: f64 = 50.0;

/// The working copy of the active page and the interaction around it.
///
/// Every mutation that changes what is on screen raises the redraw flag;
/// hosts poll it with [`Canvas::take_redraw`].
#[derive(Debug, Clone)]
pub struct Canvas {
    pub store: GeometryStore,
    pub view: ViewState,
    pub tools: ToolManager,
    pub config: CanvasConfig,
    /// Viewport size in screen pixels.
    pub viewport_size: Size,
    /// Last known pointer position (screen), `None` once the pointer left.
    hover: Option<Point>,
    /// Endpoint currently snapped to, for the marker.
    snap_target: Option<SnapTarget>,
    dirty: bool,
    needs_redraw: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an empty canvas with default settings.
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    pub fn with_config(config: CanvasConfig) -> Self {
        let mut tools = ToolManager::new();
        tools.stroke_color = config.stroke_color;
        tools.segment_width = config.segment_width;
        tools.brush_width = config.brush_width;
        Self {
            store: GeometryStore::new(),
            view: ViewState::new(),
            tools,
            config,
            viewport_size: Size::new(800.0, 600.0),
            hover: None,
            snap_target: None,
            dirty: false,
            needs_redraw: true,
        }
    }

    /// Load a page: replace shapes and view wholesale and clear the dirty flag.
    pub fn activate(&mut self, shapes: Vec<Shape>, view: ViewState) {
        self.tools.cancel();
        self.store.replace(shapes);
        self.view = view.sanitized();
        self.snap_target = None;
        self.dirty = false;
        self.needs_redraw = true;
    }

    /// Shapes and view to write back to the page.
    pub fn working_copy(&self) -> (Vec<Shape>, ViewState) {
        (self.store.shapes().to_vec(), self.view)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag after the working copy was persisted.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Return and clear the redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn shapes(&self) -> &[Shape] {
        self.store.shapes()
    }

    pub fn state(&self) -> &InteractionState {
        &self.tools.state
    }

    pub fn current_tool(&self) -> Option<ToolKind> {
        self.tools.current_tool
    }

    /// Pointer position in screen coordinates, if over the canvas.
    pub fn hover(&self) -> Option<Point> {
        self.hover
    }

    /// Active endpoint snap target, for the marker.
    pub fn snap_target(&self) -> Option<SnapTarget> {
        self.snap_target
    }

    /// Eraser radius in world units at the current zoom.
    pub fn eraser_world_radius(&self) -> f64 {
        eraser::world_radius(self.config.eraser_radius_px, self.view.scale)
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
        self.request_redraw();
    }

    /// Select a tool. Any gesture in progress is dropped.
    pub fn set_tool(&mut self, tool: Option<ToolKind>) {
        if self.tools.state.is_drawing() {
            log::debug!("Gesture aborted by tool change");
        }
        self.tools.set_tool(tool);
        self.refresh_hover_snap();
        self.request_redraw();
    }

    /// Dispatch an input event.
    pub fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerDown { position } => self.pointer_down(*position),
            InputEvent::PointerMove { position } => self.pointer_move(*position),
            InputEvent::PointerUp { position } => self.pointer_up(*position),
            InputEvent::PointerLeave => self.pointer_leave(),
            InputEvent::Wheel { position, delta_y } => self.wheel(*position, *delta_y),
            InputEvent::Key { key, modifiers } => self.key(key, modifiers),
            InputEvent::Command { command } => self.execute(*command),
            InputEvent::Resize { width, height } => self.set_viewport_size(*width, *height),
        }
    }

    /// Run a command.
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Undo => {
                self.undo();
            }
            Command::Redo => {
                self.redo();
            }
            Command::Cancel => self.cancel_segment(),
            Command::SetTool(tool) => self.set_tool(tool),
            Command::FitToContent => self.fit_to_content(),
            Command::ResetView => {
                self.view.reset();
                self.mark_dirty();
            }
        }
    }

    /// Handle a key press through the shortcut table.
    pub fn key(&mut self, key: &str, modifiers: &Modifiers) {
        if let Some(command) = Command::from_key(key, modifiers) {
            self.execute(command);
        }
    }

    pub fn pointer_down(&mut self, screen: Point) {
        self.hover = Some(screen);
        let world = self.view.to_world(screen);

        self.tools.state = match self.tools.current_tool {
            None => InteractionState::Panning { last: screen },
            Some(ToolKind::Solid | ToolKind::Dashed) => {
                let style = self
                    .tools
                    .current_tool
                    .and_then(ToolKind::segment_style)
                    .unwrap_or_default();
                let snapped = snap::snap_segment_start(
                    world,
                    self.store.shapes(),
                    &self.view,
                    &self.config.snap,
                );
                self.snap_target = snapped.endpoint_target();
                InteractionState::DrawingSegment {
                    start: snapped.point,
                    live_end: snapped.point,
                    style,
                }
            }
            Some(ToolKind::Brush) => InteractionState::DrawingBrush { points: vec![world] },
            Some(ToolKind::Eraser) => {
                self.erase(world);
                InteractionState::Erasing
            }
        };
        self.request_redraw();
    }

    pub fn pointer_move(&mut self, screen: Point) {
        let previous_hover = self.hover.replace(screen);
        let world = self.view.to_world(screen);

        match &mut self.tools.state {
            InteractionState::Idle => {
                self.refresh_hover_snap();
                if previous_hover != Some(screen) {
                    self.request_redraw();
                }
            }
            InteractionState::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                self.view.pan(delta);
                self.mark_dirty();
            }
            InteractionState::DrawingSegment { start, .. } => {
                let start = *start;
                self.update_live_end(start, world);
                self.request_redraw();
            }
            InteractionState::DrawingBrush { points } => {
                points.push(world);
                self.request_redraw();
            }
            InteractionState::Erasing => {
                self.erase(world);
                self.request_redraw();
            }
        }
    }

    pub fn pointer_up(&mut self, screen: Point) {
        self.hover = Some(screen);
        let world = self.view.to_world(screen);

        match std::mem::take(&mut self.tools.state) {
            InteractionState::DrawingSegment { start, style, .. } => {
                let result = snap::snap_segment_endpoint(
                    start,
                    world,
                    self.store.shapes(),
                    &self.view,
                    &self.config.snap,
                );
                let segment = self.tools.make_segment(start, result.point, style);
                log::debug!(
                    "Committed {style:?} segment ({:.1}, {:.1}) -> ({:.1}, {:.1})",
                    start.x,
                    start.y,
                    result.point.x,
                    result.point.y
                );
                self.commit(segment.into());
            }
            InteractionState::DrawingBrush { points } => {
                log::debug!("Committed brush path with {} points", points.len());
                let brush = self.tools.make_brush(points);
                self.commit(brush.into());
            }
            InteractionState::Idle
            | InteractionState::Panning { .. }
            | InteractionState::Erasing => {}
        }
        self.refresh_hover_snap();
        self.request_redraw();
    }

    /// The pointer left the canvas: drawing gestures are dropped without committing.
    pub fn pointer_leave(&mut self) {
        if self.tools.state.is_drawing() {
            log::debug!("Gesture aborted: pointer left the canvas");
        }
        self.tools.cancel();
        self.hover = None;
        self.snap_target = None;
        self.request_redraw();
    }

    /// Zoom toward the cursor. The interaction state is untouched.
    pub fn wheel(&mut self, screen: Point, delta_y: f64) {
        if self.view.zoom_by_wheel(screen, delta_y, self.config.zoom_sensitivity) {
            self.mark_dirty();
        }
    }

    /// Abort the segment being drawn, if any.
    pub fn cancel_segment(&mut self) {
        if matches!(self.tools.state, InteractionState::DrawingSegment { .. }) {
            log::debug!("Segment cancelled");
            self.tools.cancel();
            self.refresh_hover_snap();
            self.request_redraw();
        }
    }

    /// Undo the last committed shape. Ignored while a gesture is in progress.
    pub fn undo(&mut self) -> bool {
        if self.tools.is_active() {
            return false;
        }
        let changed = self.store.undo();
        if changed {
            self.mark_dirty();
        }
        changed
    }

    /// Restore the shape in the redo slot. Ignored while a gesture is in progress.
    pub fn redo(&mut self) -> bool {
        if self.tools.is_active() {
            return false;
        }
        let changed = self.store.redo();
        if changed {
            self.mark_dirty();
        }
        changed
    }

    /// Fit the view to the committed shapes, or reset it for an empty page.
    pub fn fit_to_content(&mut self) {
        match self.store.bounds() {
            Some(bounds) => self.view.fit_to_bounds(bounds, self.viewport_size, FIT_PADDING),
            None => self.view.reset(),
        }
        self.mark_dirty();
    }

    fn commit(&mut self, shape: Shape) {
        self.store.commit(shape);
        self.mark_dirty();
    }

    fn erase(&mut self, world: Point) {
        let removed = self.store.erase_at(world, self.eraser_world_radius());
        if removed > 0 {
            log::debug!("Erased {removed} shape(s) at ({:.1}, {:.1})", world.x, world.y);
            self.mark_dirty();
        }
    }

    fn update_live_end(&mut self, start: Point, world: Point) {
        let result = snap::snap_segment_endpoint(
            start,
            world,
            self.store.shapes(),
            &self.view,
            &self.config.snap,
        );
        self.snap_target = match result.kind {
            SnapKind::Endpoint(target) => Some(target),
            _ => None,
        };
        if let InteractionState::DrawingSegment { live_end, .. } = &mut self.tools.state {
            *live_end = result.point;
        }
    }

    /// Recompute the snap marker shown while hovering with a segment tool.
    fn refresh_hover_snap(&mut self) {
        let segment_tool = self
            .tools
            .current_tool
            .is_some_and(|tool| tool.segment_style().is_some());
        self.snap_target = match (self.hover, segment_tool, &self.tools.state) {
            (Some(screen), true, InteractionState::Idle) => {
                let world = self.view.to_world(screen);
                snap::snap_segment_start(world, self.store.shapes(), &self.view, &self.config.snap)
                    .endpoint_target()
            }
            _ => None,
        };
    }

    /// Shapes or view changed: needs saving and repainting.
    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.needs_redraw = true;
    }

    fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{BrushPath, Segment, StrokeStyle};
    use kurbo::Vec2;

    fn canvas_with_tool(tool: Option<ToolKind>) -> Canvas {
        let mut canvas = Canvas::new();
        canvas.set_tool(tool);
        canvas
    }

    fn drag(canvas: &mut Canvas, points: &[Point]) {
        let (first, rest) = points.split_first().unwrap();
        canvas.pointer_down(*first);
        for p in rest {
            canvas.pointer_move(*p);
        }
        canvas.pointer_up(*points.last().unwrap());
    }

    #[test]
    fn test_draw_segment_commits_with_axis_snap() {
        let mut canvas = canvas_with_tool(Some(ToolKind::Dashed));
        drag(&mut canvas, &[Point::new(0.0, 0.0), Point::new(50.0, 2.0), Point::new(100.0, 6.0)]);

        assert_eq!(canvas.state(), &InteractionState::Idle);
        assert_eq!(canvas.shapes().len(), 1);
        let segment = canvas.shapes()[0].as_segment().unwrap();
        assert_eq!(segment.start, Point::ZERO);
        assert_eq!(segment.end, Point::new(100.0, 0.0));
        assert_eq!(segment.style, StrokeStyle::Dashed);
        assert!(canvas.is_dirty());
    }

    #[test]
    fn test_segment_live_end_tracks_pointer() {
        let mut canvas = canvas_with_tool(Some(ToolKind::Solid));
        canvas.pointer_down(Point::new(10.0, 10.0));
        canvas.pointer_move(Point::new(60.0, 40.0));
        match canvas.state() {
            InteractionState::DrawingSegment { start, live_end, .. } => {
                assert_eq!(*start, Point::new(10.0, 10.0));
                assert_eq!(*live_end, Point::new(60.0, 40.0));
            }
            other => panic!("unexpected state {other:?}"),
        }
        assert!(canvas.shapes().is_empty());
    }

    #[test]
    fn test_segment_start_snaps_to_endpoint() {
        let mut canvas = canvas_with_tool(Some(ToolKind::Solid));
        canvas
            .store
            .commit(Segment::new(Point::new(100.0, 100.0), Point::new(200.0, 300.0)).into());
        // 20 world units at scale 0.5 is 10 screen pixels.
        canvas.view = ViewState::with(0.5, Vec2::ZERO);
        canvas.pointer_down(canvas.view.to_screen(Point::new(120.0, 100.0)));
        match canvas.state() {
            InteractionState::DrawingSegment { start, .. } => {
                assert_eq!(*start, Point::new(100.0, 100.0))
            }
            other => panic!("unexpected state {other:?}"),
        }
        assert!(canvas.snap_target().is_some());
    }

    #[test]
    fn test_brush_stroke() {
        let mut canvas = canvas_with_tool(Some(ToolKind::Brush));
        canvas.view = ViewState::with(2.0, Vec2::new(10.0, 10.0));
        drag(
            &mut canvas,
            &[Point::new(10.0, 10.0), Point::new(30.0, 10.0), Point::new(30.0, 50.0)],
        );

        let brush = canvas.shapes()[0].as_brush().unwrap();
        assert_eq!(
            brush.points,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 20.0)]
        );
    }

    #[test]
    fn test_brush_click_commits_single_point() {
        let mut canvas = canvas_with_tool(Some(ToolKind::Brush));
        canvas.pointer_down(Point::new(5.0, 5.0));
        canvas.pointer_up(Point::new(5.0, 5.0));
        assert_eq!(canvas.shapes()[0].as_brush().map(BrushPath::len), Some(1));
    }

    #[test]
    fn test_leave_aborts_drawing() {
        let mut canvas = canvas_with_tool(Some(ToolKind::Brush));
        canvas.pointer_down(Point::new(0.0, 0.0));
        canvas.pointer_move(Point::new(20.0, 20.0));
        canvas.pointer_leave();
        assert_eq!(canvas.state(), &InteractionState::Idle);
        assert!(canvas.shapes().is_empty());
        assert!(!canvas.is_dirty());
        assert!(canvas.hover().is_none());
    }

    #[test]
    fn test_leave_aborts_segment() {
        let mut canvas = canvas_with_tool(Some(ToolKind::Solid));
        canvas.pointer_down(Point::new(10.0, 10.0));
        canvas.pointer_move(Point::new(120.0, 80.0));
        canvas.pointer_leave();
        assert_eq!(canvas.state(), &InteractionState::Idle);
        assert!(canvas.tools.preview_shape().is_none());

        canvas.pointer_up(Point::new(120.0, 80.0));
        assert!(canvas.shapes().is_empty());
        assert!(!canvas.is_dirty());
    }

    #[test]
    fn test_leave_ends_erasing() {
        let mut canvas = canvas_with_tool(Some(ToolKind::Eraser));
        canvas
            .store
            .commit(Segment::new(Point::new(0.0, 300.0), Point::new(100.0, 300.0)).into());
        canvas.pointer_down(Point::new(50.0, 50.0));
        assert_eq!(canvas.state(), &InteractionState::Erasing);

        canvas.pointer_leave();
        assert_eq!(canvas.state(), &InteractionState::Idle);

        // Moving over the shape after leaving no longer erases.
        canvas.pointer_move(Point::new(50.0, 300.0));
        assert_eq!(canvas.shapes().len(), 1);
        assert!(!canvas.is_dirty());
    }

    #[test]
    fn test_escape_cancels_segment_only() {
        let mut canvas = canvas_with_tool(Some(ToolKind::Solid));
        canvas.pointer_down(Point::ZERO);
        canvas.key("Escape", &Modifiers::default());
        assert_eq!(canvas.state(), &InteractionState::Idle);
        canvas.pointer_up(Point::new(50.0, 50.0));
        assert!(canvas.shapes().is_empty());

        canvas.set_tool(Some(ToolKind::Brush));
        canvas.pointer_down(Point::ZERO);
        canvas.key("Escape", &Modifiers::default());
        assert!(matches!(canvas.state(), InteractionState::DrawingBrush { .. }));
    }

    #[test]
    fn test_pan_moves_offset_not_redo() {
        let mut canvas = canvas_with_tool(Some(ToolKind::Solid));
        drag(&mut canvas, &[Point::ZERO, Point::new(30.0, 70.0)]);
        assert!(canvas.undo());
        assert!(canvas.store.can_redo());

        canvas.set_tool(None);
        canvas.view = ViewState::with(3.0, Vec2::ZERO);
        drag(
            &mut canvas,
            &[Point::new(100.0, 100.0), Point::new(110.0, 95.0), Point::new(130.0, 90.0)],
        );
        assert_eq!(canvas.view.offset, Vec2::new(30.0, -10.0));
        assert_eq!(canvas.state(), &InteractionState::Idle);

        canvas.wheel(Point::new(50.0, 50.0), -100.0);
        assert!(canvas.store.can_redo());
        assert!(canvas.redo());
        assert_eq!(canvas.shapes().len(), 1);
    }

    #[test]
    fn test_wheel_keeps_state() {
        let mut canvas = canvas_with_tool(Some(ToolKind::Solid));
        canvas.pointer_down(Point::new(10.0, 10.0));
        canvas.wheel(Point::new(10.0, 10.0), -240.0);
        assert!(matches!(canvas.state(), InteractionState::DrawingSegment { .. }));
        assert!(canvas.view.scale > 1.0);
    }

    #[test]
    fn test_eraser_uses_screen_radius() {
        let mut canvas = canvas_with_tool(Some(ToolKind::Eraser));
        canvas.store.commit(Segment::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).into());
        canvas.store.commit(Segment::new(Point::new(0.0, 40.0), Point::new(100.0, 40.0)).into());
        canvas.view = ViewState::with(0.5, Vec2::ZERO);
        // Eraser radius is 10px -> 20 world units at scale 0.5.
        canvas.pointer_down(canvas.view.to_screen(Point::new(50.0, 15.0)));
        assert_eq!(canvas.state(), &InteractionState::Erasing);
        assert_eq!(canvas.shapes().len(), 1);

        canvas.pointer_move(canvas.view.to_screen(Point::new(50.0, 30.0)));
        assert!(canvas.shapes().is_empty());
        canvas.pointer_up(Point::ZERO);
        assert_eq!(canvas.state(), &InteractionState::Idle);
        assert!(!canvas.store.can_redo());
    }

    #[test]
    fn test_undo_ignored_mid_gesture() {
        let mut canvas = canvas_with_tool(Some(ToolKind::Solid));
        drag(&mut canvas, &[Point::ZERO, Point::new(40.0, 40.0)]);
        canvas.pointer_down(Point::new(100.0, 100.0));
        assert!(!canvas.undo());
        assert_eq!(canvas.shapes().len(), 1);
    }

    #[test]
    fn test_undo_redo_shortcuts() {
        let mut canvas = canvas_with_tool(Some(ToolKind::Solid));
        drag(&mut canvas, &[Point::ZERO, Point::new(40.0, 90.0)]);
        canvas.mark_saved();

        let ctrl = Modifiers { ctrl: true, ..Default::default() };
        canvas.key("z", &ctrl);
        assert!(canvas.shapes().is_empty());
        assert!(canvas.is_dirty());

        canvas.key("y", &ctrl);
        assert_eq!(canvas.shapes().len(), 1);
    }

    #[test]
    fn test_activate_resets_session() {
        let mut canvas = canvas_with_tool(Some(ToolKind::Brush));
        canvas.pointer_down(Point::ZERO);
        let shapes = vec![Segment::new(Point::ZERO, Point::new(1.0, 1.0)).into()];
        canvas.activate(shapes, ViewState { scale: 99.0, offset: Vec2::new(5.0, 5.0) });

        assert_eq!(canvas.state(), &InteractionState::Idle);
        assert_eq!(canvas.shapes().len(), 1);
        assert!((canvas.view.scale - crate::camera::MAX_SCALE).abs() < f64::EPSILON);
        assert!(!canvas.is_dirty());
        assert!(!canvas.store.can_redo());
    }

    #[test]
    fn test_redraw_flag() {
        let mut canvas = Canvas::new();
        assert!(canvas.take_redraw());
        assert!(!canvas.take_redraw());
        canvas.wheel(Point::ZERO, 50.0);
        assert!(canvas.take_redraw());
    }

    #[test]
    fn test_hover_snap_marker_when_idle() {
        let mut canvas = canvas_with_tool(Some(ToolKind::Solid));
        canvas
            .store
            .commit(Segment::new(Point::new(100.0, 100.0), Point::new(200.0, 100.0)).into());
        canvas.pointer_move(Point::new(104.0, 103.0));
        assert_eq!(canvas.snap_target().map(|t| t.point), Some(Point::new(100.0, 100.0)));

        canvas.set_tool(Some(ToolKind::Brush));
        assert!(canvas.snap_target().is_none());
    }

    #[test]
    fn test_fit_to_content() {
        let mut canvas = Canvas::new();
        canvas.set_viewport_size(800.0, 600.0);
        canvas.store.commit(Segment::new(Point::new(0.0, 0.0), Point::new(1000.0, 500.0)).into());
        canvas.execute(Command::FitToContent);
        let center = canvas.view.to_screen(Point::new(500.0, 250.0));
        assert!((center.x - 400.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
        assert!((canvas.view.scale - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_handle_event_dispatch() {
        let mut canvas = Canvas::new();
        let events = [
            InputEvent::Command { command: Command::SetTool(Some(ToolKind::Solid)) },
            InputEvent::PointerDown { position: Point::new(0.0, 0.0) },
            InputEvent::PointerMove { position: Point::new(0.0, 80.0) },
            InputEvent::PointerUp { position: Point::new(3.0, 80.0) },
        ];
        for event in &events {
            canvas.handle_event(event);
        }
        let segment = canvas.shapes()[0].as_segment().unwrap();
        assert_eq!(segment.end, Point::new(0.0, 80.0));
    }
}
