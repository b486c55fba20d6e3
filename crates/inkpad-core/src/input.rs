//! Input events and keyboard shortcuts.

use crate::tools::ToolKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// An editor command, triggered by a shortcut or directly by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    Undo,
    Redo,
    /// Abort the segment being drawn.
    Cancel,
    /// Select a tool; `None` selects panning.
    SetTool(Option<ToolKind>),
    FitToContent,
    ResetView,
}

/// An input event in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    PointerDown { position: Point },
    PointerMove { position: Point },
    PointerUp { position: Point },
    PointerLeave,
    #[serde(rename_all = "camelCase")]
    Wheel { position: Point, delta_y: f64 },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Command { command: Command },
    Resize { width: f64, height: f64 },
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub command: Command,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: Command,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, key: &str, modifiers: &Modifiers) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == modifiers.command()
            && self.shift == modifiers.shift
    }
}

/// All keyboard shortcuts.
pub const SHORTCUTS: &[Shortcut] = &[
    Shortcut::new("Z", true, false, Command::Undo, "Undo"),
    Shortcut::new("Z", true, true, Command::Redo, "Redo"),
    Shortcut::new("Y", true, false, Command::Redo, "Redo"),
    Shortcut::new("Escape", false, false, Command::Cancel, "Cancel current segment"),
    Shortcut::new("L", false, false, Command::SetTool(Some(ToolKind::Solid)), "Solid segment tool"),
    Shortcut::new(
        "D",
        false,
        false,
        Command::SetTool(Some(ToolKind::Dashed)),
        "Dashed segment tool",
    ),
    Shortcut::new("B", false, false, Command::SetTool(Some(ToolKind::Brush)), "Brush tool"),
    Shortcut::new("E", false, false, Command::SetTool(Some(ToolKind::Eraser)), "Eraser tool"),
    Shortcut::new("H", false, false, Command::SetTool(None), "Pan (no tool)"),
    Shortcut::new("1", true, false, Command::FitToContent, "Fit to content"),
    Shortcut::new("0", true, false, Command::ResetView, "Reset view"),
];

impl Command {
    /// Look up the command bound to a key press.
    pub fn from_key(key: &str, modifiers: &Modifiers) -> Option<Command> {
        SHORTCUTS
            .iter()
            .find(|shortcut| shortcut.matches(key, modifiers))
            .map(|shortcut| shortcut.command)
    }
}
