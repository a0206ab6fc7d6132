//! Document Module
//!
//! In-memory representation of stored documents.
//!
//! ## Responsibilities
//! - Define the `Document` shape (a JSON object)
//! - Keyed table of documents by `_id`
//! - Generate fresh document ids
//!
//! ## Data Structure Choice
//! `DocumentTable` wraps a `HashMap` rather than an ordered map:
//! - Lookups and removals are by `_id` only
//! - Enumeration order is never promised to callers
//! - Growth and rehashing past the load factor come for free

mod id;
mod table;

pub use id::{generate_id, ID_LEN};
pub use table::DocumentTable;

/// A stored document: a JSON object that always carries `_id` once inserted
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Reserved key holding the store-assigned identity
pub const ID_FIELD: &str = "_id";

/// Read the `_id` of a document, if it holds a string id
pub fn document_id(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD).and_then(|v| v.as_str())
}
