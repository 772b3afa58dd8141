//! In-memory document store - used when no Redis server is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use lookat_core::ports::{DocumentStore, Query, StoreError};

type Collection = HashMap<String, Value>;

/// In-memory document store using nested HashMaps behind an async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Number of documents in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, HashMap::len)
    }

    pub async fn get(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections
            .read()
            .await
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned()
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        document: Value,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);

        tracing::debug!(collection = %collection, id = %id, "Document written");
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|documents| documents.remove(id))
            .is_some();

        tracing::debug!(collection = %collection, id = %id, removed, "Document deleted");
        Ok(())
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        let documents = collections
            .get(collection)
            .map(|documents| query.apply(documents.values().cloned()))
            .unwrap_or_default();

        tracing::debug!(collection = %collection, count = documents.len(), "Query executed");
        Ok(documents)
    }
}
