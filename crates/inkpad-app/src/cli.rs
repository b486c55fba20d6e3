//! Command line interface for the Inkpad shell.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inkpad CLI arguments
///
/// Examples:
///   inkpad list                               # List pages, marking the active one
///   inkpad new "Floor plan" --switch          # Create a page and make it active
///   inkpad replay strokes.json                # Feed recorded input into the active page
///   inkpad export --out page.png --fit        # Snapshot the active page
#[derive(Parser, Debug, Clone)]
#[command(
    name = "inkpad",
    version,
    about = "Headless shell for the Inkpad drawing surface"
)]
pub struct Cli {
    /// Directory holding the page store (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// JSON file with canvas settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// List all pages
    List,
    /// Create a page
    New {
        /// Page name
        name: Option<String>,
        /// Make the new page active
        #[arg(long)]
        switch: bool,
    },
    /// Rename a page
    Rename {
        /// Page id, unique id prefix, or exact name
        page: String,
        /// New name
        name: String,
    },
    /// Delete a page
    Delete {
        /// Page id, unique id prefix, or exact name
        page: String,
    },
    /// Make a page active
    Switch {
        /// Page id, unique id prefix, or exact name
        page: String,
    },
    /// Replay a JSON array of input events into the active page and save it
    Replay {
        /// Event script
        events: PathBuf,
        /// Viewport width in pixels
        #[arg(long, default_value_t = 800)]
        width: u32,
        /// Viewport height in pixels
        #[arg(long, default_value_t = 600)]
        height: u32,
        /// Do not save the result
        #[arg(long)]
        dry_run: bool,
    },
    /// Export the active page as PNG
    Export {
        /// Output file
        #[arg(long, short)]
        out: PathBuf,
        /// Image width in logical pixels
        #[arg(long, default_value_t = 800)]
        width: u32,
        /// Image height in logical pixels
        #[arg(long, default_value_t = 600)]
        height: u32,
        /// Device pixels per logical pixel
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        /// Fit the view to the page content instead of using the saved view
        #[arg(long)]
        fit: bool,
    },
    /// Print keyboard shortcuts
    Shortcuts,
}
