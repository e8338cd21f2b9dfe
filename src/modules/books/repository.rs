//! Typed access to the books collection of the document store.

use catalog_db::{Document, Filter, Store, StoreError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::models::{Book, NewBook};

#[derive(Clone)]
pub struct BookRepository {
    store: Store,
    collection: String,
}

fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(doc) => Ok(doc),
        _ => Err(<serde_json::Error as serde::ser::Error>::custom(
            "book did not serialize to an object",
        )
        .into()),
    }
}

fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

impl BookRepository {
    pub fn new(store: Store, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Insert `book` and return the document as stored.
    pub async fn insert(&self, book: &NewBook) -> Result<Option<Book>, StoreError> {
        let id = self
            .store
            .insert_one(&self.collection, to_document(book)?)
            .await?;
        self.find(&id).await
    }

    pub async fn find(&self, id: &str) -> Result<Option<Book>, StoreError> {
        self.store
            .find_one(&self.collection, id)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Books rated at least `min_rating`, in store order.
    pub async fn list(&self, min_rating: f64) -> Result<Vec<Book>, StoreError> {
        self.store
            .find(&self.collection, &Filter::gte("average_rating", min_rating))
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    pub async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.store.find(&self.collection, &Filter::All).await?.len())
    }

    /// Replace the stored document. Returns false when it no longer exists.
    pub async fn replace(&self, book: &Book) -> Result<bool, StoreError> {
        self.store
            .replace_one(&self.collection, &book.id, to_document(book)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete_one(&self.collection, id).await
    }
}
