//! Storage Module
//!
//! File-backed collections grouped into database directories.
//!
//! ## Responsibilities
//! - Load a collection file fully into memory on open
//! - Rewrite the whole file after every successful mutation
//! - Map database names to directories and collection names to files
//! - Serialize access per database with reader/writer locks
//!
//! ## On-Disk Layout
//! ```text
//! {data_dir}/
//!   └── {database}/
//!         ├── {collection}.json          JSON array of documents
//!         ├── {collection}.json.tmp      transient, renamed over the above
//!         └── {collection}_{field}.idx   create_index marker (no effect on queries)
//! ```
//!
//! ## Collection File Format
//! ```text
//! [
//!   { "_id": "5f2c...", "name": "Alice", "age": 25 },
//!   { "_id": "9ab1...", "name": "Bob" }
//! ]
//! ```

mod collection;
mod database;
mod manager;

pub use collection::{Collection, InsertReport};
pub use database::Database;
pub use manager::DatabaseManager;

use crate::error::{Result, StoreError};

/// File extension of collection files
pub const COLLECTION_EXT: &str = "json";

/// File extension of create_index side-files
pub const INDEX_EXT: &str = "idx";

/// Check that a database or collection name is safe to use as a path component
pub fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StoreError::validation(format!("Invalid {} name: must not be empty", kind)));
    }
    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(StoreError::validation(format!(
            "Invalid {} name '{}': must not contain path separators",
            kind, name
        )));
    }
    Ok(())
}
