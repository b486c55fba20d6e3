//! Page management on top of a [`DocumentStore`].

use crate::canvas::Canvas;
use crate::document::{DEFAULT_DOCUMENT_NAME, Document};
use crate::storage::{DocumentStore, StorageError, StorageResult};
use std::sync::Arc;

/// Owns the list of pages and keeps the store in sync with it.
///
/// The active page's shapes live in a [`Canvas`] while it is being edited;
/// they are written back on save and before switching pages.
pub struct PageManager {
    store: Arc<dyn DocumentStore>,
    documents: Vec<Document>,
    current_id: String,
}

impl PageManager {
    /// Load pages from `store`.
    ///
    /// Unreadable or empty data is replaced by a single fresh page instead
    /// of failing, and an unreadable current id falls back to the first
    /// page. I/O errors are returned.
    pub fn open(store: Arc<dyn DocumentStore>) -> StorageResult<Self> {
        let documents = match store.load_all() {
            Ok(documents) if !documents.is_empty() => documents,
            Ok(_) => {
                log::warn!("No stored documents, starting with an empty page");
                vec![Document::default()]
            }
            Err(StorageError::Serialization(e)) => {
                log::warn!("Stored documents are malformed ({e}), starting with an empty page");
                vec![Document::default()]
            }
            Err(e) => return Err(e),
        };

        let stored_id = match store.current_id() {
            Err(StorageError::Serialization(e)) => {
                log::warn!("Stored current page id is malformed ({e}), using the first page");
                None
            }
            result => result?,
        };
        let current_id = match stored_id {
            Some(id) if documents.iter().any(|d| d.id == id) => id,
            _ => documents[0].id.clone(),
        };

        log::debug!("Opened {} document(s), current {}", documents.len(), current_id);
        Ok(Self {
            store,
            documents,
            current_id,
        })
    }

    /// All pages, in creation order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn current_id(&self) -> &str {
        &self.current_id
    }

    /// The active page.
    pub fn current(&self) -> &Document {
        let index = self.index_of(&self.current_id).unwrap_or(0);
        &self.documents[index]
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Load the active page into `canvas`, replacing its working copy.
    pub fn activate_into(&self, canvas: &mut Canvas) {
        let document = self.current();
        canvas.activate(document.shapes.clone(), document.view_state);
        log::debug!("Activated document {} ({})", document.name, document.id);
    }

    /// Create an empty page and return its id. The active page is unchanged.
    pub fn create(&mut self, name: Option<&str>) -> StorageResult<String> {
        let name = page_name(name);
        let document = Document::new(name);
        let id = document.id.clone();
        let mut documents = self.documents.clone();
        documents.push(document);
        self.commit(documents, self.current_id.clone())?;
        log::debug!("Created document {name} ({id})");
        Ok(id)
    }

    /// Rename a page. A blank name falls back to the default page name.
    pub fn rename(&mut self, id: &str, name: &str) -> StorageResult<()> {
        let index = self
            .index_of(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        let mut documents = self.documents.clone();
        let document = &mut documents[index];
        document.name = page_name(Some(name)).to_string();
        document.touch();
        self.commit(documents, self.current_id.clone())
    }

    /// Make `id` the active page. The working copy is written back first.
    pub fn switch_to(&mut self, id: &str, canvas: &mut Canvas) -> StorageResult<()> {
        if self.index_of(id).is_none() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        self.write_back(canvas);
        self.commit(self.documents.clone(), id.to_string())?;
        canvas.mark_saved();
        self.activate_into(canvas);
        Ok(())
    }

    /// Delete a page.
    ///
    /// Deleting the only page leaves a fresh empty one in its place.
    /// Deleting the active page activates its neighbour.
    pub fn delete(&mut self, id: &str, canvas: &mut Canvas) -> StorageResult<()> {
        let index = self
            .index_of(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        let was_current = self.current_id == id;

        let mut documents = self.documents.clone();
        documents.remove(index);
        if documents.is_empty() {
            log::debug!("Deleted last document, creating a replacement");
            documents.push(Document::default());
        }

        let current_id = if was_current {
            let neighbour = index.min(documents.len() - 1);
            documents[neighbour].id.clone()
        } else {
            self.current_id.clone()
        };
        self.commit(documents, current_id)?;

        if was_current {
            self.activate_into(canvas);
        }
        Ok(())
    }

    /// Write the working copy back to the active page and persist everything.
    pub fn save(&mut self, canvas: &mut Canvas) -> StorageResult<()> {
        self.write_back(canvas);
        if let Some(index) = self.index_of(&self.current_id) {
            self.documents[index].touch();
        }
        self.persist()?;
        canvas.mark_saved();
        log::info!("Saved document {}", self.current_id);
        Ok(())
    }

    /// Save only if the canvas has unsaved changes. Returns whether it saved.
    pub fn save_if_dirty(&mut self, canvas: &mut Canvas) -> StorageResult<bool> {
        if !canvas.is_dirty() {
            return Ok(false);
        }
        self.save(canvas)?;
        Ok(true)
    }

    fn write_back(&mut self, canvas: &Canvas) {
        let dirty = canvas.is_dirty();
        let Some(index) = self.index_of(&self.current_id) else {
            return;
        };
        let (shapes, view) = canvas.working_copy();
        let document = &mut self.documents[index];
        document.shapes = shapes;
        document.view_state = view;
        if dirty {
            document.touch();
        }
    }

    fn persist(&self) -> StorageResult<()> {
        self.store.save_all(&self.documents)?;
        self.store.set_current_id(&self.current_id)
    }

    /// Persist a new page list and active id, adopting them only once the
    /// store accepted both.
    fn commit(&mut self, documents: Vec<Document>, current_id: String) -> StorageResult<()> {
        self.store.save_all(&documents)?;
        if let Err(e) = self.store.set_current_id(&current_id) {
            // Keep the stored list in step with the unchanged in-memory one.
            if let Err(restore) = self.store.save_all(&self.documents) {
                log::warn!("Failed to restore stored documents: {restore}");
            }
            return Err(e);
        }
        self.documents = documents;
        self.current_id = current_id;
        Ok(())
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }
}

fn page_name(name: Option<&str>) -> &str {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_DOCUMENT_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Segment;
    use crate::storage::{CURRENT_KEY, DOCUMENTS_KEY, FileStore, MemoryStore};
    use crate::tools::ToolKind;
    use kurbo::Point;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory store whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        failing: AtomicBool,
    }

    impl FlakyStore {
        fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    impl DocumentStore for FlakyStore {
        fn read(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &str) -> StorageResult<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StorageError::Io("disk full".to_string()));
            }
            self.inner.write(key, value)
        }
    }

    fn open_memory() -> (Arc<MemoryStore>, PageManager, Canvas) {
        let store = Arc::new(MemoryStore::new());
        let pages = PageManager::open(store.clone()).unwrap();
        let mut canvas = Canvas::new();
        pages.activate_into(&mut canvas);
        (store, pages, canvas)
    }

    fn draw_segment(canvas: &mut Canvas) {
        canvas.set_tool(Some(ToolKind::Solid));
        canvas.pointer_down(Point::new(0.0, 0.0));
        canvas.pointer_up(Point::new(60.0, 30.0));
    }

    #[test]
    fn test_open_empty_store() {
        let (_, pages, _) = open_memory();
        assert_eq!(pages.documents().len(), 1);
        assert_eq!(pages.current().name, "Untitled");
    }

    #[test]
    fn test_open_malformed_recovers() {
        let store = Arc::new(MemoryStore::new());
        store.write(DOCUMENTS_KEY, "not json at all").unwrap();
        let pages = PageManager::open(store).unwrap();
        assert_eq!(pages.documents().len(), 1);
        assert!(pages.current().shapes.is_empty());
    }

    #[test]
    fn test_open_non_utf8_file_recovers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("inkpad.documents.json"), [0xff, 0xfe]).unwrap();
        std::fs::write(dir.path().join("inkpad.current.json"), [0xff, 0xfe]).unwrap();

        let store = Arc::new(FileStore::new(dir.path()).unwrap());
        let pages = PageManager::open(store).unwrap();
        assert_eq!(pages.documents().len(), 1);
        assert_eq!(pages.current().name, "Untitled");
    }

    #[test]
    fn test_open_restores_current() {
        let store = Arc::new(MemoryStore::new());
        let docs = vec![Document::new("a"), Document::new("b")];
        store.save_all(&docs).unwrap();
        store.set_current_id(&docs[1].id).unwrap();
        let pages = PageManager::open(store.clone()).unwrap();
        assert_eq!(pages.current().name, "b");

        store.set_current_id("gone").unwrap();
        let pages = PageManager::open(store).unwrap();
        assert_eq!(pages.current().name, "a");
    }

    #[test]
    fn test_save_persists_and_clears_dirty() {
        let (store, mut pages, mut canvas) = open_memory();
        draw_segment(&mut canvas);
        assert!(canvas.is_dirty());

        assert!(pages.save_if_dirty(&mut canvas).unwrap());
        assert!(!canvas.is_dirty());
        assert!(!pages.save_if_dirty(&mut canvas).unwrap());

        let stored = store.load_all().unwrap();
        assert_eq!(stored[0].shapes.len(), 1);
        assert!(stored[0].updated_at >= stored[0].created_at);
    }

    #[test]
    fn test_switch_writes_back_and_activates() {
        let (store, mut pages, mut canvas) = open_memory();
        let first = pages.current_id().to_string();
        let second = pages.create(Some("Second")).unwrap();
        assert_eq!(pages.current_id(), first);

        draw_segment(&mut canvas);
        pages.switch_to(&second, &mut canvas).unwrap();
        assert!(canvas.shapes().is_empty());
        assert!(!canvas.is_dirty());
        assert_eq!(store.current_id().unwrap(), Some(second.clone()));

        pages.switch_to(&first, &mut canvas).unwrap();
        assert_eq!(canvas.shapes().len(), 1);
        assert!(matches!(pages.switch_to("missing", &mut canvas), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_switch_keeps_view() {
        let (_, mut pages, mut canvas) = open_memory();
        let first = pages.current_id().to_string();
        let second = pages.create(None).unwrap();
        canvas.wheel(Point::new(100.0, 100.0), -300.0);
        let view = canvas.view;

        pages.switch_to(&second, &mut canvas).unwrap();
        assert_ne!(canvas.view, view);
        pages.switch_to(&first, &mut canvas).unwrap();
        assert_eq!(canvas.view, view);
    }

    #[test]
    fn test_rename() {
        let (store, mut pages, _) = open_memory();
        let id = pages.current_id().to_string();
        pages.rename(&id, "  Plans ").unwrap();
        assert_eq!(pages.current().name, "Plans");
        assert_eq!(store.load_all().unwrap()[0].name, "Plans");
        assert!(pages.rename("nope", "x").is_err());

        pages.rename(&id, "   ").unwrap();
        assert_eq!(pages.current().name, "Untitled");
        assert_eq!(store.read(CURRENT_KEY).unwrap(), Some(id));
    }

    #[test]
    fn test_failed_switch_keeps_current_page() {
        let store = Arc::new(FlakyStore::default());
        let mut pages = PageManager::open(store.clone()).unwrap();
        let mut canvas = Canvas::new();
        pages.activate_into(&mut canvas);
        let first = pages.current_id().to_string();
        let second = pages.create(Some("Second")).unwrap();
        draw_segment(&mut canvas);

        store.set_failing(true);
        assert!(pages.switch_to(&second, &mut canvas).is_err());
        assert_eq!(pages.current_id(), first);
        assert_eq!(canvas.shapes().len(), 1);
        assert!(canvas.is_dirty());

        store.set_failing(false);
        pages.save(&mut canvas).unwrap();
        let stored = store.load_all().unwrap();
        assert_eq!(stored[0].shapes.len(), 1);
        assert!(stored[1].shapes.is_empty());
        assert_eq!(store.current_id().unwrap(), Some(first));
    }

    #[test]
    fn test_failed_delete_and_create_change_nothing() {
        let store = Arc::new(FlakyStore::default());
        let mut pages = PageManager::open(store.clone()).unwrap();
        let mut canvas = Canvas::new();
        pages.activate_into(&mut canvas);
        let first = pages.current_id().to_string();
        pages.create(Some("Second")).unwrap();

        store.set_failing(true);
        assert!(pages.delete(&first, &mut canvas).is_err());
        assert!(pages.create(Some("Third")).is_err());
        assert_eq!(pages.documents().len(), 2);
        assert_eq!(pages.current_id(), first);
    }

    #[test]
    fn test_delete_last_document_creates_replacement() {
        let (store, mut pages, mut canvas) = open_memory();
        let only = pages.current_id().to_string();
        draw_segment(&mut canvas);

        pages.delete(&only, &mut canvas).unwrap();
        assert_eq!(pages.documents().len(), 1);
        assert_ne!(pages.current_id(), only);
        assert!(canvas.shapes().is_empty());
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_current_activates_neighbour() {
        let (_, mut pages, mut canvas) = open_memory();
        let a = pages.current_id().to_string();
        let b = pages.create(Some("b")).unwrap();
        let c = pages.create(Some("c")).unwrap();

        pages.switch_to(&b, &mut canvas).unwrap();
        pages.delete(&b, &mut canvas).unwrap();
        assert_eq!(pages.current_id(), c);

        pages.delete(&c, &mut canvas).unwrap();
        assert_eq!(pages.current_id(), a);
    }

    #[test]
    fn test_delete_other_keeps_working_copy() {
        let (_, mut pages, mut canvas) = open_memory();
        let other = pages.create(Some("other")).unwrap();
        draw_segment(&mut canvas);
        pages.delete(&other, &mut canvas).unwrap();
        assert_eq!(canvas.shapes().len(), 1);
        assert!(canvas.is_dirty());
    }

    #[test]
    fn test_saved_shapes_roundtrip_through_store() {
        let (store, mut pages, mut canvas) = open_memory();
        canvas.store.commit(Segment::new(Point::new(1.0, 2.0), Point::new(3.0, 4.0)).into());
        pages.save(&mut canvas).unwrap();

        let reopened = PageManager::open(store).unwrap();
        let mut fresh = Canvas::new();
        reopened.activate_into(&mut fresh);
        assert_eq!(fresh.shapes(), canvas.shapes());
    }
}
