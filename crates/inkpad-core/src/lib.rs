//! Inkpad Core Library
//!
//! Platform-agnostic data model and interaction logic for the Inkpad
//! drawing surface: view transform, shape storage, snapping, erasing,
//! the pointer state machine and page persistence.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod document;
pub mod eraser;
pub mod input;
pub mod pages;
pub mod shapes;
pub mod snap;
pub mod storage;
pub mod store;
pub mod tools;

pub use camera::ViewState;
pub use canvas::Canvas;
pub use config::{CanvasConfig, ConfigError, GridStyle};
pub use document::Document;
pub use input::{Command, InputEvent, Modifiers, SHORTCUTS, Shortcut};
pub use pages::PageManager;
pub use shapes::{BrushPath, Segment, SerializableColor, Shape, ShapeTrait, StrokeStyle};
pub use snap::{SnapConfig, SnapKind, SnapResult, SnapTarget, SnapTargetKind};
pub use storage::{DocumentStore, FileStore, MemoryStore, StorageError, StorageResult};
pub use store::GeometryStore;
pub use tools::{InteractionState, ToolKind, ToolManager};
