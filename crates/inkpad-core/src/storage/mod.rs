//! Storage abstraction for persistence.
//!
//! Backends are simple key/value stores. Pages live under
//! [`DOCUMENTS_KEY`] as one JSON array; the active page id under
//! [`CURRENT_KEY`].

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::document::{Document, documents_from_json, documents_to_json};
use thiserror::Error;

/// Key holding the JSON array of documents.
pub const DOCUMENTS_KEY: &str = "inkpad.documents";
/// Key holding the id of the active document.
pub const CURRENT_KEY: &str = "inkpad.current";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for document storage backends.
pub trait DocumentStore: Send + Sync {
    /// Read the raw value under `key`, `None` if it was never written.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write the raw value under `key`.
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Load every document. A missing key yields an empty list.
    fn load_all(&self) -> StorageResult<Vec<Document>> {
        match self.read(DOCUMENTS_KEY)? {
            Some(json) => {
                documents_from_json(&json).map_err(|e| StorageError::Serialization(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    /// Replace the stored documents.
    fn save_all(&self, documents: &[Document]) -> StorageResult<()> {
        let json = documents_to_json(documents)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.write(DOCUMENTS_KEY, &json)
    }

    /// Id of the active document, if one was recorded.
    fn current_id(&self) -> StorageResult<Option<String>> {
        Ok(self.read(CURRENT_KEY)?.filter(|id| !id.is_empty()))
    }

    fn set_current_id(&self, id: &str) -> StorageResult<()> {
        self.write(CURRENT_KEY, id)
    }
}
