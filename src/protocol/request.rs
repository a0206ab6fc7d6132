//! Request definitions
//!
//! Parses and validates client requests.

use serde_json::{json, Map, Value};

use crate::error::{Result, StoreError};

/// The operation a request asks for, with its validated arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Insert one object or an array of objects
    Insert { data: Value },

    /// Find documents matching a query object
    Find { query: Value },

    /// Delete documents matching a query object
    Delete { query: Value },

    /// Record an index on a field (queries are unaffected)
    CreateIndex { field: String },
}

impl Operation {
    /// Wire name of the operation
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Insert { .. } => "insert",
            Operation::Find { .. } => "find",
            Operation::Delete { .. } => "delete",
            Operation::CreateIndex { .. } => "create_index",
        }
    }

    /// Whether the operation needs the exclusive database lock
    pub fn is_write(&self) -> bool {
        !matches!(self, Operation::Find { .. })
    }
}

/// A parsed, validated request
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub database: String,
    pub collection: String,
    pub operation: Operation,
}

impl Request {
    /// Build an insert request
    pub fn insert(database: impl Into<String>, collection: impl Into<String>, data: Value) -> Self {
        Self::new(database, collection, Operation::Insert { data })
    }

    /// Build a find request
    pub fn find(database: impl Into<String>, collection: impl Into<String>, query: Value) -> Self {
        Self::new(database, collection, Operation::Find { query })
    }

    /// Build a delete request
    pub fn delete(database: impl Into<String>, collection: impl Into<String>, query: Value) -> Self {
        Self::new(database, collection, Operation::Delete { query })
    }

    /// Build a create_index request
    pub fn create_index(
        database: impl Into<String>,
        collection: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::new(
            database,
            collection,
            Operation::CreateIndex {
                field: field.into(),
            },
        )
    }

    fn new(database: impl Into<String>, collection: impl Into<String>, operation: Operation) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
            operation,
        }
    }

    /// Decode a frame body (UTF-8 JSON) into a request
    pub fn parse(body: &[u8], default_collection: &str) -> Result<Self> {
        let text = std::str::from_utf8(body)
            .map_err(|_| StoreError::validation("Invalid request: body is not valid UTF-8"))?;
        let value: Value = serde_json::from_str(text)
            .map_err(|e| StoreError::validation(format!("Invalid JSON in request: {}", e)))?;
        Self::from_value(&value, default_collection)
    }

    /// Validate a request object
    ///
    /// Checks run in order: object shape, presence of `database` and
    /// `operation`, their types, the optional `collection`, then the
    /// arguments of the named operation. Operation names are matched
    /// case-insensitively.
    pub fn from_value(value: &Value, default_collection: &str) -> Result<Self> {
        let Value::Object(fields) = value else {
            return Err(StoreError::validation("Invalid request: must be a JSON object"));
        };

        if !fields.contains_key("database") || !fields.contains_key("operation") {
            return Err(StoreError::validation(
                "Missing required fields: database, operation",
            ));
        }

        let database = required_string(fields, "database")?;
        let operation_name = required_string(fields, "operation")?;

        let collection = match fields.get("collection") {
            None | Some(Value::Null) => default_collection.to_string(),
            Some(Value::String(name)) => name.clone(),
            Some(_) => {
                return Err(StoreError::validation(
                    "Invalid 'collection' field: must be a string",
                ))
            }
        };

        let operation = match operation_name.to_ascii_lowercase().as_str() {
            "insert" => {
                let data = fields.get("data").ok_or_else(|| {
                    StoreError::validation("Missing 'data' field for insert operation")
                })?;
                if !data.is_object() && !data.is_array() {
                    return Err(StoreError::validation(
                        "Invalid 'data' field: must be object or array",
                    ));
                }
                Operation::Insert { data: data.clone() }
            }
            "find" => {
                let query = match fields.get("query") {
                    Some(query) => object_query(query)?,
                    None => Value::Object(Map::new()),
                };
                Operation::Find { query }
            }
            "delete" => {
                let query = fields.get("query").ok_or_else(|| {
                    StoreError::validation("Missing 'query' field for delete operation")
                })?;
                Operation::Delete {
                    query: object_query(query)?,
                }
            }
            "create_index" => {
                if !fields.contains_key("field") {
                    return Err(StoreError::validation(
                        "Missing 'field' field for create_index operation",
                    ));
                }
                Operation::CreateIndex {
                    field: required_string(fields, "field")?,
                }
            }
            _ => {
                return Err(StoreError::validation(format!(
                    "Unknown operation: {} (supported: insert, find, delete, create_index)",
                    operation_name
                )))
            }
        };

        Ok(Self {
            database,
            collection,
            operation,
        })
    }

    /// Render the request as wire JSON
    pub fn to_value(&self) -> Value {
        let mut value = json!({
            "database": self.database,
            "collection": self.collection,
            "operation": self.operation.name(),
        });
        let (key, argument) = match &self.operation {
            Operation::Insert { data } => ("data", data.clone()),
            Operation::Find { query } | Operation::Delete { query } => ("query", query.clone()),
            Operation::CreateIndex { field } => ("field", Value::String(field.clone())),
        };
        if let Value::Object(fields) = &mut value {
            fields.insert(key.to_string(), argument);
        }
        value
    }
}

fn required_string(fields: &Map<String, Value>, key: &str) -> Result<String> {
    match fields.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(StoreError::validation(format!(
            "Invalid '{}' field: must be a string",
            key
        ))),
    }
}

fn object_query(query: &Value) -> Result<Value> {
    if query.is_object() {
        Ok(query.clone())
    } else {
        Err(StoreError::validation("Invalid 'query' field: must be an object"))
    }
}
