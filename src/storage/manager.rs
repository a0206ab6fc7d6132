//! Database Manager
//!
//! Serializes access to each database with a reader/writer lock.
//!
//! ## Responsibilities
//! - Lazily create one lock per database name (never removed)
//! - Open the requested collection while holding the lock
//! - Run the caller's operation and release the lock on every exit path

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::Result;

use super::{validate_name, Collection, Database};

/// Owns the per-database lock table
///
/// ## Concurrency:
/// - `locks`: short-held Mutex, only taken to find or create a lock
/// - per-database `RwLock`: shared for reads, exclusive for writes
/// - operations on different databases never contend
///
/// parking_lot's `RwLock` is task-fair, so a steady stream of readers cannot
/// starve a writer. Strict FIFO order between waiters is not promised.
pub struct DatabaseManager {
    /// Root directory holding one sub-directory per database
    data_dir: PathBuf,

    /// Database name → its reader/writer lock
    locks: Mutex<HashMap<String, Arc<RwLock<()>>>>,
}

impl DatabaseManager {
    /// Create a manager rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Run `op` against a collection under the database's shared lock
    pub fn execute_read<T, F>(&self, database: &str, collection: &str, op: F) -> Result<T>
    where
        F: FnOnce(&Collection) -> Result<T>,
    {
        let lock = self.lock_for(database)?;
        let _guard = lock.read();

        let collection = Database::open(&self.data_dir, database)?.open_collection(collection)?;
        op(&collection)
    }

    /// Run `op` against a collection under the database's exclusive lock
    pub fn execute_write<T, F>(&self, database: &str, collection: &str, op: F) -> Result<T>
    where
        F: FnOnce(&mut Collection) -> Result<T>,
    {
        let lock = self.lock_for(database)?;
        let _guard = lock.write();

        let mut collection =
            Database::open(&self.data_dir, database)?.open_collection(collection)?;
        op(&mut collection)
    }

    /// Number of databases that have a lock so far
    pub fn lock_count(&self) -> usize {
        self.locks.lock().len()
    }

    /// Root data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Get or create the lock for `database`
    ///
    /// Names are validated first so rejected requests leave no entry behind.
    fn lock_for(&self, database: &str) -> Result<Arc<RwLock<()>>> {
        validate_name("database", database)?;

        let mut locks = self.locks.lock();
        let lock = locks
            .entry(database.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(())));
        Ok(Arc::clone(lock))
    }
}
