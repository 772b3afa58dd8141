//! Application state - the wired-up repository.

use std::sync::Arc;

use lookat_core::StorePostsRepository;
use lookat_core::ports::{AttachmentStore, DocumentStore, PostsRepository};
use lookat_infra::{InMemoryDocumentStore, LocalAttachmentStore};

#[cfg(feature = "redis")]
use lookat_infra::RedisDocumentStore;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn PostsRepository>,
    /// Whether documents survive the process.
    pub persistent: bool,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (store, persistent) = Self::document_store(config).await;
        let attachments: Arc<dyn AttachmentStore> =
            Arc::new(LocalAttachmentStore::new(config.attachments.clone()));

        let repository =
            StorePostsRepository::new(config.user.clone(), store, attachments)
                .with_collections(config.collections.clone());

        tracing::info!(
            user = %config.user.id,
            posts = %config.collections.posts,
            likes = %config.collections.likes,
            persistent,
            "Application state initialized"
        );

        Self {
            repository: Arc::new(repository),
            persistent,
        }
    }

    #[cfg(feature = "redis")]
    async fn document_store(config: &AppConfig) -> (Arc<dyn DocumentStore>, bool) {
        if !config.use_redis {
            tracing::warn!("REDIS_URL not set. Running with in-memory document store.");
            return (Arc::new(InMemoryDocumentStore::new()), false);
        }

        match RedisDocumentStore::from_env().await {
            Ok(store) => (Arc::new(store), true),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to Redis: {}. Using in-memory fallback.",
                    e
                );
                (Arc::new(InMemoryDocumentStore::new()), false)
            }
        }
    }

    #[cfg(not(feature = "redis"))]
    async fn document_store(config: &AppConfig) -> (Arc<dyn DocumentStore>, bool) {
        if config.use_redis {
            tracing::warn!("Built without redis feature - ignoring REDIS_URL");
        }
        tracing::info!("Running with in-memory document store");
        (Arc::new(InMemoryDocumentStore::new()), false)
    }
}
