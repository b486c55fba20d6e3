//! Ordered shape storage with a single redo slot.

use crate::eraser;
use crate::shapes::Shape;
use kurbo::{Point, Rect};

/// The committed shapes of the active page.
///
/// Order is z-order (back to front). Undo moves the last shape into the
/// redo slot; there is exactly one level of redo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryStore {
    shapes: Vec<Shape>,
    redo: Option<Shape>,
}

impl GeometryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `shapes` with an empty redo slot.
    pub fn with_shapes(shapes: Vec<Shape>) -> Self {
        Self { shapes, redo: None }
    }

    /// Append a shape. Clears the redo slot.
    pub fn commit(&mut self, shape: Shape) {
        self.shapes.push(shape);
        self.redo = None;
    }

    /// Move the last shape into the redo slot.
    pub fn undo(&mut self) -> bool {
        match self.shapes.pop() {
            Some(shape) => {
                self.redo = Some(shape);
                true
            }
            None => false,
        }
    }

    /// Re-append the shape held in the redo slot. No-op if the slot is empty.
    pub fn redo(&mut self) -> bool {
        match self.redo.take() {
            Some(shape) => {
                self.shapes.push(shape);
                true
            }
            None => false,
        }
    }

    /// Erase every shape within `radius` (world units) of `point`.
    ///
    /// The redo slot is cleared only when something was removed.
    pub fn erase_at(&mut self, point: Point, radius: f64) -> usize {
        let removed = eraser::erase_at(&mut self.shapes, point, radius);
        if removed > 0 {
            self.redo = None;
        }
        removed
    }

    /// Replace all shapes, e.g. when another page is activated.
    pub fn replace(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
        self.redo = None;
    }

    /// Endpoints of all shapes, in store order.
    pub fn endpoints(&self) -> impl Iterator<Item = Point> + '_ {
        self.shapes.iter().flat_map(Shape::endpoints)
    }

    /// Union of all shape bounds, `None` when the store is empty.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes
            .iter()
            .map(Shape::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn can_undo(&self) -> bool {
        !self.shapes.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        self.redo.is_some()
    }

    /// The shape currently held for redo.
    pub fn redo_slot(&self) -> Option<&Shape> {
        self.redo.as_ref()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
