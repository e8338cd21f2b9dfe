//! Document store for the catalog: JSON documents grouped into collections
//! and addressed by a string `_id`.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use catalog_kernel::settings::DatabaseSettings;

pub mod memory;

pub use memory::MemoryStore;

/// A stored document.
pub type Document = Map<String, Value>;

/// Field holding a document's identifier.
pub const ID_FIELD: &str = "_id";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("field `_id` must be a string")]
    InvalidId,
    #[error("document with id {0} already exists")]
    DuplicateId(String),
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Selection applied by [`DocumentStore::find`].
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    /// Numeric `field` greater than or equal to `value`.
    Gte { field: String, value: f64 },
}

impl Filter {
    pub fn gte(field: impl Into<String>, value: f64) -> Self {
        Self::Gte {
            field: field.into(),
            value,
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Gte { field, value } => doc
                .get(field)
                .and_then(Value::as_f64)
                .is_some_and(|v| v >= *value),
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, generating `_id` when absent. Returns the id.
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<String, StoreError>;
    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError>;
    /// Replace the document stored under `id`. Returns false when absent.
    async fn replace_one(&self, collection: &str, id: &str, doc: Document)
        -> Result<bool, StoreError>;
    /// Remove the document stored under `id`. Returns false when absent.
    async fn delete_one(&self, collection: &str, id: &str) -> Result<bool, StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Shared handle acquired once at startup.
pub type Store = Arc<dyn DocumentStore>;

/// Open the document store described by `settings` and check it responds.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Store> {
    let store = match &settings.snapshot_path {
        Some(path) => {
            tracing::info!(target: "catalog-db", path = %path.display(), "opening snapshot store");
            MemoryStore::with_snapshot(path.clone())
                .await
                .with_context(|| format!("failed to load snapshot {}", path.display()))?
        }
        None => {
            tracing::info!(target: "catalog-db", "opening in-memory store");
            MemoryStore::new()
        }
    };

    store.ping().await.context("document store did not respond")?;
    Ok(Arc::new(store))
}
