//! Application shell: wires the page store, the canvas and the renderer.

use crate::cli::{Cli, Commands};
use crate::shortcuts;
use inkpad_core::{
    Canvas, CanvasConfig, ConfigError, Document, DocumentStore, FileStore, InputEvent, PageManager,
    StorageError,
};
use inkpad_render::{RenderOptions, RendererError, export_png};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by the shell.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid event script {}: {source}", path.display())]
    Script {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("No page matches '{0}'")]
    UnknownPage(String),
    #[error("'{0}' matches more than one page")]
    AmbiguousPage(String),
}

/// The Inkpad shell.
pub struct App {
    pages: PageManager,
    canvas: Canvas,
}

impl App {
    /// Open the page store and activate the current page.
    pub fn open(store: Arc<dyn DocumentStore>, config: CanvasConfig) -> Result<Self, AppError> {
        let pages = PageManager::open(store)?;
        let mut canvas = Canvas::with_config(config);
        pages.activate_into(&mut canvas);
        Ok(Self { pages, canvas })
    }

    /// Open the store and config named on the command line.
    pub fn from_cli(cli: &Cli) -> Result<Self, AppError> {
        let config = match &cli.config {
            Some(path) => CanvasConfig::from_json_file(path)?,
            None => CanvasConfig::default(),
        };
        let store = match &cli.data_dir {
            Some(dir) => FileStore::new(dir)?,
            None => FileStore::default_location()?,
        };
        log::debug!("Using page store at {}", store.base_path().display());
        Self::open(Arc::new(store), config)
    }

    pub fn pages(&self) -> &PageManager {
        &self.pages
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Run one command, writing user-facing output to `out`.
    pub fn run_command(
        &mut self,
        command: &Commands,
        out: &mut impl Write,
    ) -> Result<(), AppError> {
        match command {
            Commands::List => self.list(out),
            Commands::New { name, switch } => {
                let id = self.pages.create(name.as_deref())?;
                if *switch {
                    self.pages.switch_to(&id, &mut self.canvas)?;
                }
                write_line(out, &id)
            }
            Commands::Rename { page, name } => {
                let id = self.resolve(page)?;
                self.pages.rename(&id, name)?;
                Ok(())
            }
            Commands::Delete { page } => {
                let id = self.resolve(page)?;
                self.pages.delete(&id, &mut self.canvas)?;
                Ok(())
            }
            Commands::Switch { page } => {
                let id = self.resolve(page)?;
                self.pages.switch_to(&id, &mut self.canvas)?;
                Ok(())
            }
            Commands::Replay {
                events,
                width,
                height,
                dry_run,
            } => self.replay(events, *width, *height, *dry_run, out),
            Commands::Export {
                out: path,
                width,
                height,
                scale,
                fit,
            } => self.export(path, *width, *height, *scale, *fit),
            Commands::Shortcuts => shortcuts::print_all(out).map_err(|source| AppError::Io {
                path: PathBuf::from("<stdout>"),
                source,
            }),
        }
    }

    fn list(&self, out: &mut impl Write) -> Result<(), AppError> {
        let current = self.pages.current_id();
        for doc in self.pages.documents() {
            let marker = if doc.id == current { '*' } else { ' ' };
            let line = format!(
                "{marker} {}  {:<24} {:>4} shape(s)  updated {}",
                doc.id,
                doc.name,
                doc.shapes.len(),
                doc.updated_at.format("%Y-%m-%d %H:%M")
            );
            write_line(out, &line)?;
        }
        Ok(())
    }

    /// Feed an event script into the active page.
    fn replay(
        &mut self,
        path: &Path,
        width: u32,
        height: u32,
        dry_run: bool,
        out: &mut impl Write,
    ) -> Result<(), AppError> {
        let json = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let events: Vec<InputEvent> =
            serde_json::from_str(&json).map_err(|source| AppError::Script {
                path: path.to_path_buf(),
                source,
            })?;

        self.canvas.set_viewport_size(f64::from(width), f64::from(height));
        for event in &events {
            self.canvas.handle_event(event);
        }
        log::info!(
            "Replayed {} event(s), page has {} shape(s)",
            events.len(),
            self.canvas.shapes().len()
        );

        let saved = if dry_run {
            false
        } else {
            self.pages.save_if_dirty(&mut self.canvas)?
        };
        let summary = format!(
            "{} event(s), {} shape(s){}",
            events.len(),
            self.canvas.shapes().len(),
            if saved { ", saved" } else { "" }
        );
        write_line(out, &summary)
    }

    fn export(
        &mut self,
        path: &Path,
        width: u32,
        height: u32,
        scale: f64,
        fit: bool,
    ) -> Result<(), AppError> {
        self.canvas.set_viewport_size(f64::from(width), f64::from(height));
        if fit {
            self.canvas.fit_to_content();
        }
        let options = RenderOptions {
            width: Some(width),
            height: Some(height),
            scale_factor: scale,
            include_overlays: false,
        };
        let png_data = export_png(&self.canvas, &options)?;
        std::fs::write(path, png_data).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Wrote {}", path.display());
        Ok(())
    }

    /// Find a page by exact id, unique id prefix, or exact name.
    fn resolve(&self, query: &str) -> Result<String, AppError> {
        let documents = self.pages.documents();
        if let Some(doc) = documents.iter().find(|d| d.id == query) {
            return Ok(doc.id.clone());
        }

        let matches: Vec<&Document> = documents
            .iter()
            .filter(|d| d.id.starts_with(query) || d.name == query)
            .collect();
        match matches.as_slice() {
            [doc] => Ok(doc.id.clone()),
            [] => Err(AppError::UnknownPage(query.to_string())),
            _ => Err(AppError::AmbiguousPage(query.to_string())),
        }
    }
}

/// Run the command line once.
pub fn run(cli: Cli) -> Result<(), AppError> {
    let mut app = App::from_cli(&cli)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app.run_command(&cli.command, &mut out)
}

fn write_line(out: &mut impl Write, line: &str) -> Result<(), AppError> {
    writeln!(out, "{line}").map_err(|source| AppError::Io {
        path: PathBuf::from("<stdout>"),
        source,
    })
}
