//! Engine Module
//!
//! Routes validated requests to the storage layer.
//!
//! ## Responsibilities
//! - Parse request bodies into `Request`s
//! - Pick the lock mode (shared for find, exclusive otherwise)
//! - Run the operation through `DatabaseManager`
//! - Turn every failure into an error envelope

use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::protocol::{Operation, Request, Response};
use crate::storage::DatabaseManager;

/// The request dispatcher shared by all connections
///
/// ## Concurrency Model
/// The engine itself holds no mutable state; all coordination lives in the
/// per-database locks of `DatabaseManager`. Any number of connections may
/// call into one engine at once.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Lock table and data directory
    manager: Arc<DatabaseManager>,
}

impl Engine {
    /// Open an engine with the given config
    ///
    /// Creates the data directory if it does not exist yet.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        std::fs::create_dir_all(&config.data_dir)
            .map_err(|e| StoreError::storage(&config.data_dir, e))?;

        let manager = Arc::new(DatabaseManager::new(&config.data_dir));
        Ok(Self { config, manager })
    }

    /// Parse a frame body, execute it, and always produce a response
    pub fn handle_frame(&self, body: &[u8]) -> Response {
        match Request::parse(body, &self.config.default_collection) {
            Ok(request) => self.handle(&request),
            Err(e) => Response::error(e.to_string()),
        }
    }

    /// Validate and execute an already-decoded request object
    pub fn handle_value(&self, value: &Value) -> Response {
        match Request::from_value(value, &self.config.default_collection) {
            Ok(request) => self.handle(&request),
            Err(e) => Response::error(e.to_string()),
        }
    }

    /// Execute a request, converting failures into an error envelope
    pub fn handle(&self, request: &Request) -> Response {
        match self.execute(request) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(
                    "{} on {}/{} failed: {}",
                    request.operation.name(),
                    request.database,
                    request.collection,
                    e
                );
                Response::error(format!("{} failed: {}", stage(&request.operation), e))
            }
        }
    }

    /// Execute a request
    ///
    /// Errors raised inside the locked section have already released the
    /// lock by the time they reach the caller.
    pub fn execute(&self, request: &Request) -> Result<Response> {
        let Request {
            database,
            collection,
            operation,
        } = request;

        tracing::debug!(
            "{} on {}/{} ({} lock)",
            operation.name(),
            database,
            collection,
            if operation.is_write() { "write" } else { "read" }
        );

        match operation {
            Operation::Insert { data } => self.insert(database, collection, data),
            Operation::Find { query } => {
                let documents = self
                    .manager
                    .execute_read(database, collection, |c| Ok(c.find(query)))?;
                Ok(Response::with_documents(
                    format!("Found {} document(s)", documents.len()),
                    documents,
                ))
            }
            Operation::Delete { query } => {
                let removed = self
                    .manager
                    .execute_write(database, collection, |c| c.remove(query))?;
                Ok(Response::success(
                    format!("Deleted {} document(s)", removed),
                    removed,
                ))
            }
            Operation::CreateIndex { field } => {
                self.manager
                    .execute_write(database, collection, |c| Ok(c.create_index(field)))?;
                Ok(Response::success(format!("Index created on field: {}", field), 0))
            }
        }
    }

    fn insert(&self, database: &str, collection: &str, data: &Value) -> Result<Response> {
        match data {
            Value::Array(documents) => {
                let report = self
                    .manager
                    .execute_write(database, collection, |c| Ok(c.insert_many(documents)))?;

                let inserted = report.inserted();
                if let Some(e) = report.error {
                    return Ok(Response::error(format!(
                        "Insert failed after {} document(s): {}",
                        inserted, e
                    ))
                    .with_count(inserted));
                }
                Ok(Response::success(
                    format!("Inserted {} document(s)", inserted),
                    inserted,
                ))
            }
            _ => {
                self.manager
                    .execute_write(database, collection, |c| c.insert(data))?;
                Ok(Response::success("Inserted 1 document(s)", 1))
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the database manager
    pub fn manager(&self) -> &Arc<DatabaseManager> {
        &self.manager
    }
}

/// Prefix naming the stage that failed, as shown to clients
fn stage(operation: &Operation) -> &'static str {
    match operation {
        Operation::Insert { .. } => "Insert",
        Operation::Find { .. } => "Find",
        Operation::Delete { .. } => "Delete",
        Operation::CreateIndex { .. } => "Create index",
    }
}
