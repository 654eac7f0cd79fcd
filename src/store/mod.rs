//! Recent-documents store.
//!
//! The whole collection lives in one slot as a JSON array, newest first.
//! Every mutation rewrites the slot before the in-memory copy changes, so
//! reads always reflect the last persisted state.

mod slots;

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tracing::{info, warn};

use crate::models::Document;

pub use slots::{FileSlotStore, MemorySlotStore, SlotStore, SqliteSlotStore};

/// Slot holding the serialized document list.
pub const STORAGE_KEY: &str = "nomiko_recent_documents";

/// Errors from the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Please paste some text to analyze.")]
    EmptyContent,
}

/// The persisted collection of recently analyzed documents.
pub struct RecentDocuments {
    slots: Arc<dyn SlotStore>,
    documents: Mutex<Vec<Document>>,
}

impl RecentDocuments {
    /// Load the collection from `slots`.
    ///
    /// Unreadable JSON is logged and treated as an empty collection; it is
    /// overwritten by the next mutation.
    pub fn open(slots: Arc<dyn SlotStore>) -> Result<Self, StoreError> {
        let mut documents = match slots.load(STORAGE_KEY)? {
            Some(raw) => serde_json::from_str::<Vec<Document>>(&raw).unwrap_or_else(|e| {
                warn!("Failed to parse recent documents, starting empty: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        sort_newest_first(&mut documents);

        Ok(Self {
            slots,
            documents: Mutex::new(documents),
        })
    }

    /// In-memory store, for tests and one-off runs.
    pub fn in_memory() -> Self {
        Self {
            slots: Arc::new(MemorySlotStore::new()),
            documents: Mutex::new(Vec::new()),
        }
    }

    /// Add a document and persist the collection.
    pub fn add(
        &self,
        content: &str,
        name: Option<&str>,
        data_uri: Option<String>,
        file_type: Option<String>,
    ) -> Result<Document, StoreError> {
        if content.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }

        let document = Document::new(content, name, data_uri, file_type);
        let mut documents = self.lock();

        let mut updated = Vec::with_capacity(documents.len() + 1);
        updated.push(document.clone());
        updated.extend(documents.iter().cloned());
        sort_newest_first(&mut updated);

        self.persist(&updated)?;
        *documents = updated;

        info!("Added document {} ({})", document.id, document.name);
        Ok(document)
    }

    pub fn get(&self, id: &str) -> Option<Document> {
        self.lock().iter().find(|d| d.id == id).cloned()
    }

    /// Remove a document. Unknown ids are ignored.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut documents = self.lock();
        if !documents.iter().any(|d| d.id == id) {
            return Ok(());
        }

        let updated: Vec<Document> = documents.iter().filter(|d| d.id != id).cloned().collect();
        self.persist(&updated)?;
        *documents = updated;

        info!("Deleted document {}", id);
        Ok(())
    }

    /// All documents, newest first.
    pub fn list(&self) -> Vec<Document> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn persist(&self, documents: &[Document]) -> Result<(), StoreError> {
        let json = serde_json::to_string(documents)?;
        self.slots.save(STORAGE_KEY, &json)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Document>> {
        self.documents.lock().unwrap_or_else(|p| p.into_inner())
    }
}

fn sort_newest_first(documents: &mut [Document]) {
    documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
