//! Keyboard shortcut listing.

use inkpad_core::SHORTCUTS;
use std::io::{self, Write};

/// Print all shortcuts.
pub fn print_all(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "=== Keyboard Shortcuts ===")?;
    for shortcut in SHORTCUTS {
        writeln!(out, "  {:20} {}", shortcut.format(), shortcut.description)?;
    }
    Ok(())
}
