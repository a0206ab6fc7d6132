//! DocumentTable implementation
//!
//! HashMap-based table mapping `_id` to its document.

use std::collections::HashMap;

use super::Document;

/// Associative container of documents keyed by id
///
/// Not internally synchronized: a table lives inside a `Collection`, which is
/// only ever touched while the owning database's lock is held.
#[derive(Debug, Default, Clone)]
pub struct DocumentTable {
    documents: HashMap<String, Document>,
}

impl DocumentTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table sized for `capacity` documents
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            documents: HashMap::with_capacity(capacity),
        }
    }

    /// Insert or overwrite the document stored under `id`
    pub fn put(&mut self, id: impl Into<String>, doc: Document) {
        self.documents.insert(id.into(), doc);
    }

    /// Look up a document by id
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Remove a document by id, returning it if it was present
    pub fn remove(&mut self, id: &str) -> Option<Document> {
        self.documents.remove(id)
    }

    /// Whether a document with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Snapshot of every (id, document) pair at call time
    ///
    /// The returned vector is owned; later mutations of the table are not
    /// reflected in it. Order is unspecified.
    pub fn items(&self) -> Vec<(String, Document)> {
        self.documents
            .iter()
            .map(|(id, doc)| (id.clone(), doc.clone()))
            .collect()
    }

    /// Borrowing iterator over the stored documents (unspecified order)
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Snapshot of the stored ids
    pub fn ids(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the table holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Drop every document
    pub fn clear(&mut self) {
        self.documents.clear();
    }
}
