//! Collection
//!
//! One document table backed by one JSON file.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::document::{document_id, generate_id, Document, DocumentTable, ID_FIELD};
use crate::error::{Result, StoreError};
use crate::query;

use super::INDEX_EXT;

/// A named set of documents persisted as a single JSON array file
///
/// ## Lifecycle
/// - `open` reads the whole file into memory
/// - every successful `insert`/`remove` rewrites the whole file
/// - the in-memory table is a working copy; the file stays authoritative
///
/// Two `Collection`s over the same file must not be alive while either one
/// mutates; `DatabaseManager` guarantees this with the per-database lock.
#[derive(Debug)]
pub struct Collection {
    /// Collection name (file stem)
    name: String,

    /// Backing file
    path: PathBuf,

    /// Working copy of the documents
    table: DocumentTable,
}

/// Outcome of a batch insert
#[derive(Debug, Default)]
pub struct InsertReport {
    /// Ids assigned to the documents that were stored, in input order
    pub ids: Vec<String>,

    /// Elements skipped because they were not JSON objects
    pub skipped: usize,

    /// The storage failure that stopped the batch, if any
    pub error: Option<StoreError>,
}

impl InsertReport {
    /// Number of documents stored
    pub fn inserted(&self) -> usize {
        self.ids.len()
    }
}

impl Collection {
    /// Open the collection stored at `path`
    ///
    /// - Missing or blank file: empty collection
    /// - File that cannot be read: `StorageIo`
    /// - Content that is not a JSON array: empty collection (logged)
    /// - Entries that are not objects or lack a string `_id`: skipped
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let table = Self::load(&path)?;

        tracing::trace!("Opened collection {} with {} document(s)", path.display(), table.len());

        Ok(Self { name, path, table })
    }

    fn load(path: &Path) -> Result<DocumentTable> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(DocumentTable::new()),
            Err(e) => return Err(StoreError::storage(path, e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(DocumentTable::new());
        }

        let entries = match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                tracing::warn!("Collection file {} is not a JSON array, treating as empty", path.display());
                return Ok(DocumentTable::new());
            }
            Err(e) => {
                tracing::warn!("Collection file {} is corrupt ({}), treating as empty", path.display(), e);
                return Ok(DocumentTable::new());
            }
        };

        let mut table = DocumentTable::with_capacity(entries.len());
        let mut skipped = 0usize;
        for entry in entries {
            let Value::Object(doc) = entry else {
                skipped += 1;
                continue;
            };
            match document_id(&doc).map(str::to_owned) {
                Some(id) => table.put(id, doc),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!("Skipped {} entries without a string _id in {}", skipped, path.display());
        }

        Ok(table)
    }

    /// Insert a document, returning its newly assigned `_id`
    ///
    /// Any `_id` supplied by the caller is overwritten. The file is rewritten
    /// before returning; if that fails the document is not kept.
    pub fn insert(&mut self, document: &Value) -> Result<String> {
        let Value::Object(doc) = document else {
            return Err(StoreError::validation("Document must be a JSON object"));
        };

        let id = self.fresh_id();
        let mut doc = doc.clone();
        doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        self.table.put(id.clone(), doc);

        if let Err(e) = self.persist() {
            self.table.remove(&id);
            return Err(e);
        }

        Ok(id)
    }

    /// Insert each object in `documents` independently
    ///
    /// Non-objects are skipped. The first storage failure stops the batch;
    /// documents stored before it stay stored.
    pub fn insert_many(&mut self, documents: &[Value]) -> InsertReport {
        let mut report = InsertReport::default();
        for document in documents {
            if !document.is_object() {
                report.skipped += 1;
                continue;
            }
            match self.insert(document) {
                Ok(id) => report.ids.push(id),
                Err(e) => {
                    report.error = Some(e);
                    break;
                }
            }
        }
        report
    }

    /// All documents matching `query` (unspecified order)
    pub fn find(&self, query: &Value) -> Vec<Document> {
        self.table
            .items()
            .into_iter()
            .filter(|(_, doc)| query::matches(doc, query))
            .map(|(_, doc)| doc)
            .collect()
    }

    /// Remove every document matching `query`, returning how many went
    ///
    /// The file is rewritten only if something was removed. If the rewrite
    /// fails the removed documents are restored.
    pub fn remove(&mut self, query: &Value) -> Result<usize> {
        let doomed: Vec<String> = self
            .table
            .items()
            .into_iter()
            .filter(|(_, doc)| query::matches(doc, query))
            .map(|(id, _)| id)
            .collect();

        if doomed.is_empty() {
            return Ok(0);
        }

        let removed: Vec<(String, Document)> = doomed
            .into_iter()
            .filter_map(|id| self.table.remove(&id).map(|doc| (id, doc)))
            .collect();

        if let Err(e) = self.persist() {
            for (id, doc) in removed {
                self.table.put(id, doc);
            }
            return Err(e);
        }

        Ok(removed.len())
    }

    /// Record an index request for `field`
    ///
    /// Writes a small marker file next to the collection. Queries never
    /// consult it; every find is still a full scan. The marker is
    /// best-effort: a field that cannot become a file name (path separators,
    /// overlong names) is logged and skipped, and `None` is returned.
    pub fn create_index(&self, field: &str) -> Option<PathBuf> {
        if field.is_empty() || field.contains(['/', '\\', '\0']) {
            tracing::warn!("Skipping index marker for field {:?}: not a valid file name", field);
            return None;
        }

        let index_path = self.index_path(field);
        let marker = json!({ "field": field, "collection": self.name });

        let written = serde_json::to_vec_pretty(&marker)
            .map_err(StoreError::from)
            .and_then(|bytes| {
                fs::write(&index_path, bytes).map_err(|e| StoreError::storage(&index_path, e))
            });
        match written {
            Ok(()) => {
                tracing::debug!("Recorded index marker {}", index_path.display());
                Some(index_path)
            }
            Err(e) => {
                tracing::warn!("Skipping index marker for field {:?}: {}", field, e);
                None
            }
        }
    }

    /// Look up a document by id
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.table.get(id)
    }

    /// Number of documents
    pub fn count(&self) -> usize {
        self.table.len()
    }

    /// Check if the collection holds no documents
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Draw ids until one is unused in this collection
    fn fresh_id(&self) -> String {
        loop {
            let id = generate_id();
            if !self.table.contains(&id) {
                return id;
            }
        }
    }

    fn index_path(&self, field: &str) -> PathBuf {
        let file_name = format!("{}_{}.{}", self.name, field, INDEX_EXT);
        self.path.with_file_name(file_name)
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }

    /// Rewrite the backing file with the full current snapshot
    ///
    /// Writes to a sibling temp file, fsyncs, then renames over the target so
    /// a crash never leaves a half-written collection behind.
    fn persist(&self) -> Result<()> {
        let snapshot: Vec<&Document> = self.table.documents().collect();
        let bytes = serde_json::to_vec_pretty(&snapshot)?;

        let temp_path = self.temp_path();
        let write_temp = || -> std::io::Result<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()
        };
        write_temp().map_err(|e| StoreError::storage(&temp_path, e))?;

        fs::rename(&temp_path, &self.path).map_err(|e| StoreError::storage(&self.path, e))?;

        tracing::trace!("Persisted {} document(s) to {}", snapshot.len(), self.path.display());
        Ok(())
    }
}
