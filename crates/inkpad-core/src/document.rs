//! Persisted pages.

use crate::camera::ViewState;
use crate::shapes::Shape;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to pages created without one.
pub const DEFAULT_DOCUMENT_NAME: &str = "Untitled";

/// A named page of drawings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique document identifier (UUID v4).
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub view_state: ViewState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_DOCUMENT_NAME)
    }
}

impl Document {
    /// Create an empty document with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            shapes: Vec::new(),
            view_state: ViewState::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Serialize a list of documents to JSON.
pub fn documents_to_json(documents: &[Document]) -> Result<String, serde_json::Error> {
    serde_json::to_string(documents)
}

/// Deserialize a list of documents from JSON.
pub fn documents_from_json(json: &str) -> Result<Vec<Document>, serde_json::Error> {
    serde_json::from_str(json)
}
