//! Inkpad Application
//!
//! Headless shell around the drawing surface: page management on a file
//! store, replay of recorded input and PNG snapshots.

mod app;
mod cli;
mod shortcuts;

pub use app::{App, AppError, run};
pub use cli::{Cli, Commands};
