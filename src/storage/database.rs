//! Database
//!
//! A directory namespace holding collection files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

use super::{validate_name, Collection, COLLECTION_EXT};

/// A database directory
///
/// Owns no state beyond the directory itself; collections are opened on
/// demand and dropped when the caller is done with them.
#[derive(Debug, Clone)]
pub struct Database {
    name: String,
    path: PathBuf,
}

impl Database {
    /// Open (creating if needed) the database `name` under `root`
    pub fn open(root: &Path, name: &str) -> Result<Self> {
        validate_name("database", name)?;

        let path = root.join(name);
        fs::create_dir_all(&path).map_err(|e| StoreError::storage(&path, e))?;

        Ok(Self {
            name: name.to_string(),
            path,
        })
    }

    /// Load the collection `name`; a collection with no file yet is empty
    pub fn open_collection(&self, name: &str) -> Result<Collection> {
        validate_name("collection", name)?;
        Collection::open(self.collection_path(name))
    }

    /// Path of the file backing collection `name`
    pub fn collection_path(&self, name: &str) -> PathBuf {
        self.path.join(format!("{}.{}", name, COLLECTION_EXT))
    }

    /// Names of the collections that have a file on disk, sorted
    pub fn list_collections(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.path).map_err(|e| StoreError::storage(&self.path, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let file_path = entry.map_err(|e| StoreError::storage(&self.path, e))?.path();
            if !file_path.is_file() {
                continue;
            }
            if file_path.extension().and_then(|e| e.to_str()) != Some(COLLECTION_EXT) {
                continue;
            }
            if let Some(stem) = file_path.file_stem() {
                names.push(stem.to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Database directory
    pub fn path(&self) -> &Path {
        &self.path
    }
}
