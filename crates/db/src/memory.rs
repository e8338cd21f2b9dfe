//! In-process document store, optionally mirrored to a JSON snapshot file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::{Timestamp, Uuid};

use crate::{Document, DocumentStore, Filter, StoreError, ID_FIELD};

/// Collections keyed by name; each keeps insertion order.
type Collections = BTreeMap<String, Vec<Document>>;

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
    snapshot: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` if it exists and persist every later mutation to it.
    pub async fn with_snapshot(path: PathBuf) -> Result<Self, StoreError> {
        let collections = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collections::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            collections: RwLock::new(collections),
            snapshot: Some(path),
        })
    }

    /// Make `docs` the content of `collection`. The snapshot is written
    /// first; memory only changes once that write succeeded.
    async fn commit(
        &self,
        collections: &mut Collections,
        collection: &str,
        docs: Vec<Document>,
    ) -> Result<(), StoreError> {
        let mut next = collections.clone();
        next.insert(collection.to_string(), docs);

        if let Some(path) = &self.snapshot {
            let bytes = serde_json::to_vec_pretty(&next)?;
            tokio::fs::write(path, bytes).await?;
        }

        *collections = next;
        Ok(())
    }
}

fn new_id() -> String {
    Uuid::new_v7(Timestamp::now(uuid::NoContext)).to_string()
}

fn id_of(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, mut doc: Document) -> Result<String, StoreError> {
        let id = match doc.get(ID_FIELD) {
            None | Some(Value::Null) => new_id(),
            Some(Value::String(id)) => id.clone(),
            Some(_) => return Err(StoreError::InvalidId),
        };
        doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));

        let mut collections = self.collections.write().await;
        let mut docs = collections.get(collection).cloned().unwrap_or_default();
        if docs.iter().any(|d| id_of(d) == Some(id.as_str())) {
            return Err(StoreError::DuplicateId(id));
        }
        docs.push(doc);

        self.commit(&mut collections, collection, docs).await?;
        Ok(id)
    }

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| id_of(d) == Some(id)))
            .cloned())
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    async fn replace_one(
        &self,
        collection: &str,
        id: &str,
        mut doc: Document,
    ) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let mut docs = collections.get(collection).cloned().unwrap_or_default();
        let Some(slot) = docs.iter_mut().find(|d| id_of(d) == Some(id)) else {
            return Ok(false);
        };

        doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        *slot = doc;

        self.commit(&mut collections, collection, docs).await?;
        Ok(true)
    }

    async fn delete_one(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let mut docs = collections.get(collection).cloned().unwrap_or_default();
        let Some(pos) = docs.iter().position(|d| id_of(d) == Some(id)) else {
            return Ok(false);
        };
        docs.remove(pos);

        self.commit(&mut collections, collection, docs).await?;
        Ok(true)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let _ = self.collections.read().await;
        Ok(())
    }
}
