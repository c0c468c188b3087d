//! Folio document storage abstraction.
//!
//! This crate provides the contract between the daemon and its embeddable
//! document databases: a [`DocumentStore`] trait for per-database access, a
//! [`StorageAdapter`] trait for the physical engine behind it, a registry of
//! compiled-in adapters with process-wide exactly-once activation, and a thin
//! factory that opens named logical databases under a root directory.
//!
//! # Features
//! - `sled` (default): persistent sled-backed adapter
//!
//! The in-memory adapter is always available and is the expected engine for
//! development and tests.
//!
//! Which adapter backs the process is decided once, at startup, before any
//! logical database is opened; the opening code depends only on the adapter
//! contract, never on a concrete engine type.

pub mod factory;
pub mod memory;
pub mod registry;
#[cfg(feature = "sled")]
pub mod sled_store;

pub use factory::{DbFactory, LogicalDb};
pub use registry::{activate_adapter, active_adapter, AdapterRegistry};

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Library-local result type.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Typed error for adapters, the registry and the factory.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unknown storage adapter '{requested}' (available: {available:?})")]
    UnknownAdapter {
        requested: String,
        available: Vec<&'static str>,
    },

    #[error("storage adapter '{active}' is already active; cannot activate '{requested}'")]
    AdapterAlreadyActive { active: String, requested: String },

    #[error("no storage adapter has been activated")]
    NoActiveAdapter,

    #[error("failed to open logical database '{database}': {source}")]
    OpenDatabase {
        database: String,
        #[source]
        source: Box<StoreError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "sled")]
    #[error(transparent)]
    Sled(#[from] sled::Error),
}

/// A single document in a logical database: a string identifier plus an
/// arbitrary JSON body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub body: serde_json::Value,
}

impl Document {
    pub fn new(id: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }
}

/// Access to one logical database. Each store is exclusively owned by the
/// service wrapping it; no two services share a store.
pub trait DocumentStore: Send + Sync {
    /// Insert or replace the document under its id.
    fn put(&self, doc: Document) -> Result<()>;

    /// Fetch a document by id.
    fn get(&self, id: &str) -> Result<Option<Document>>;

    /// Remove a document; returns whether it existed.
    fn delete(&self, id: &str) -> Result<bool>;

    /// All documents, in unspecified order.
    fn all(&self) -> Result<Vec<Document>>;

    /// Number of stored documents.
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// A physical storage engine implementation. Opening never shares state
/// between logical names: each `(dir, logical_name)` pair is an independent
/// namespace.
pub trait StorageAdapter: std::fmt::Debug + Send + Sync {
    /// Stable adapter name used for selection and activation.
    fn name(&self) -> &'static str;

    /// Create or open the logical database at `dir/logical_name`.
    fn open(&self, dir: &Path, logical_name: &str) -> Result<Box<dyn DocumentStore>>;
}
