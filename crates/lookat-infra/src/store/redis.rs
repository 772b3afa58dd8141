//! Redis document store.
//!
//! Each document is a JSON string at `<prefix>:<collection>:<id>`; the ids of a
//! collection are kept in a set at `<prefix>:<collection>`. Document and index
//! are written together in one MULTI/EXEC pipeline. Queries load the whole
//! collection and evaluate filters and ordering client-side.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde_json::Value;

use lookat_core::ports::{DocumentStore, Query, StoreError};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Prefix for every key written by the store
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            key_prefix: "lookat".to_string(),
        }
    }
}

impl RedisConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            key_prefix: std::env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "lookat".to_string()),
        }
    }
}

/// Redis-backed document store.
///
/// Uses connection manager for automatic reconnection.
pub struct RedisDocumentStore {
    conn: ConnectionManager,
    config: RedisConfig,
}

impl RedisDocumentStore {
    pub async fn new(config: RedisConfig) -> Result<Self, StoreError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| StoreError::Connection(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn_manager_fut = ConnectionManager::new(client);
        let conn = tokio::time::timeout(config.connect_timeout, conn_manager_fut)
            .await
            .map_err(|_| StoreError::Connection("Connection timed out".to_string()))?
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, prefix = %config.key_prefix, "Connected to Redis document store");

        Ok(Self { conn, config })
    }

    /// Create from environment configuration.
    pub async fn from_env() -> Result<Self, StoreError> {
        Self::new(RedisConfig::from_env()).await
    }

    fn index_key(&self, collection: &str) -> String {
        format!("{}:{}", self.config.key_prefix, collection)
    }

    fn document_key(&self, collection: &str, id: &str) -> String {
        format!("{}:{}:{}", self.config.key_prefix, collection, id)
    }
}

#[async_trait]
impl DocumentStore for RedisDocumentStore {
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        document: Value,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let json =
            serde_json::to_string(&document).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let _: () = redis::pipe()
            .atomic()
            .set(self.document_key(collection, id), json)
            .ignore()
            .sadd(self.index_key(collection), id)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tracing::debug!(collection = %collection, id = %id, "Document written");
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();

        let _: () = redis::pipe()
            .atomic()
            .del(self.document_key(collection, id))
            .ignore()
            .srem(self.index_key(collection), id)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tracing::debug!(collection = %collection, id = %id, "Document deleted");
        Ok(())
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        let mut conn = self.conn.clone();

        let ids: Vec<String> = conn
            .smembers(self.index_key(collection))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids
            .iter()
            .map(|id| self.document_key(collection, id))
            .collect();
        let raw: Vec<Option<String>> = conn
            .mget(&keys)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        // Ids whose document vanished between SMEMBERS and MGET are skipped
        let documents = raw
            .into_iter()
            .flatten()
            .map(|json| {
                serde_json::from_str::<Value>(&json)
                    .map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let matched = query.apply(documents);
        tracing::debug!(collection = %collection, count = matched.len(), "Query executed");
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn get_test_store() -> Option<RedisDocumentStore> {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6389".to_string()),
            connect_timeout: Duration::from_secs(1),
            key_prefix: format!("lookat-test-{}", uuid::Uuid::new_v4()),
        };

        RedisDocumentStore::new(config).await.ok()
    }

    #[tokio::test]
    async fn test_redis_store_set_query_delete() {
        let store = match get_test_store().await {
            Some(s) => s,
            None => {
                tracing::warn!("Redis not available, skipping test");
                return;
            }
        };

        store
            .set_document("likes", "p1-u1", json!({ "postID": "p1", "userID": "u1" }))
            .await
            .unwrap();
        store
            .set_document("likes", "p2-u2", json!({ "postID": "p2", "userID": "u2" }))
            .await
            .unwrap();

        let query = Query::new().where_equal("userID", "u1");
        let result = store.query("likes", &query).await.unwrap();
        assert_eq!(result, vec![json!({ "postID": "p1", "userID": "u1" })]);

        store.delete_document("likes", "p1-u1").await.unwrap();
        store.delete_document("likes", "p1-u1").await.unwrap();
        assert!(store.query("likes", &query).await.unwrap().is_empty());

        store.delete_document("likes", "p2-u2").await.unwrap();
    }

    #[tokio::test]
    async fn test_document_and_index_change_together() {
        let store = match get_test_store().await {
            Some(s) => s,
            None => {
                tracing::warn!("Redis not available, skipping test");
                return;
            }
        };
        let mut conn = store.conn.clone();
        let document_key = store.document_key("posts", "p1");
        let index_key = store.index_key("posts");

        store
            .set_document("posts", "p1", json!({ "id": "p1" }))
            .await
            .unwrap();
        let stored: Option<String> = conn.get(&document_key).await.unwrap();
        let indexed: bool = conn.sismember(&index_key, "p1").await.unwrap();
        assert!(stored.is_some());
        assert!(indexed);

        store.delete_document("posts", "p1").await.unwrap();
        let stored: Option<String> = conn.get(&document_key).await.unwrap();
        let indexed: bool = conn.sismember(&index_key, "p1").await.unwrap();
        assert!(stored.is_none());
        assert!(!indexed);
    }
}
