//! # docstore
//!
//! An embedded JSON document store with:
//! - Whole-file JSON persistence per collection
//! - Recursive query matching (`$and`, `$or`, `$eq`, `$gt`, `$lt`, `$in`, `$like`)
//! - Per-database reader/writer locking
//! - Length-prefixed JSON protocol over TCP
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │           (one supervised worker per connection)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Request
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │           (validate, pick lock mode, dispatch)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  DatabaseManager                             │
//! │        (one RwLock per database, created lazily)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────┐
//!   │ Collection  │─────────▶│    Query     │
//!   │ (JSON file) │          │  Evaluator   │
//!   └──────┬──────┘          └──────────────┘
//!          ▼
//!   ┌─────────────┐
//!   │DocumentTable│
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod document;
pub mod query;
pub mod storage;
pub mod protocol;
pub mod engine;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::Config;
pub use engine::Engine;
pub use client::Client;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of docstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
