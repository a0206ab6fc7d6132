//! Response definitions
//!
//! The JSON envelope returned for every request.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::error::{Result, StoreError};

/// Outcome of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => f.write_str("success"),
            Status::Error => f.write_str("error"),
        }
    }
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Human-readable summary
    pub message: String,

    /// Matched documents (empty unless the request was a find)
    #[serde(default)]
    pub data: Vec<Value>,

    /// Documents inserted, found or deleted
    #[serde(default)]
    pub count: u64,
}

impl Response {
    /// Create a success response carrying only a count
    pub fn success(message: impl Into<String>, count: usize) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            data: Vec::new(),
            count: count as u64,
        }
    }

    /// Create a success response carrying documents; count is their number
    pub fn with_documents(message: impl Into<String>, documents: Vec<Document>) -> Self {
        let data: Vec<Value> = documents.into_iter().map(Value::Object).collect();
        Self {
            status: Status::Success,
            message: message.into(),
            count: data.len() as u64,
            data,
        }
    }

    /// Create an ERROR response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            data: Vec::new(),
            count: 0,
        }
    }

    /// Replace the count (used to report partial batch progress)
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count as u64;
        self
    }

    /// Check for a success status
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Encode as a JSON body
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a JSON body
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| StoreError::Serialization(format!("Invalid response: {}", e)))
    }
}
