//! Store-backed posts repository.
//!
//! Posts and likes live in two independent collections. Reads join them on the
//! client: the posts query and the current user's likes query run concurrently
//! and the like set is overlaid onto each post. The two queries are not
//! transactional, so a like toggled between them may be missed or included
//! until the next fetch.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{Like, Post, PostDocument, User};
use crate::error::RepositoryError;
use crate::ports::{AttachmentStore, DocumentStore, PostsRepository, Query, StoreError};

/// Namespace for post attachments in the attachment store.
pub const ATTACHMENT_NAMESPACE: &str = "posts";

const TIMESTAMP_FIELD: &str = "timestamp";
const AUTHOR_ID_FIELD: &str = "author.id";
const POST_ID_FIELD: &str = "id";
const USER_ID_FIELD: &str = "userID";

/// Collection names used by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collections {
    pub posts: String,
    pub likes: String,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            posts: "posts".to_string(),
            likes: "likes".to_string(),
        }
    }
}

/// [`PostsRepository`] backed by a [`DocumentStore`] and an [`AttachmentStore`].
pub struct StorePostsRepository {
    user: User,
    store: Arc<dyn DocumentStore>,
    attachments: Arc<dyn AttachmentStore>,
    collections: Collections,
}

impl StorePostsRepository {
    pub fn new(
        user: User,
        store: Arc<dyn DocumentStore>,
        attachments: Arc<dyn AttachmentStore>,
    ) -> Self {
        Self {
            user,
            store,
            attachments,
            collections: Collections::default(),
        }
    }

    pub fn with_collections(mut self, collections: Collections) -> Self {
        self.collections = collections;
        self
    }

    /// Run `query` against posts alongside the likes query and overlay the result.
    async fn fetch_posts(&self, query: Query) -> Result<Vec<Post>, RepositoryError> {
        let query = query.order_by(TIMESTAMP_FIELD, true);
        let (documents, liked) =
            futures::try_join!(self.query_posts(&query), self.fetch_liked_ids())?;

        Ok(documents
            .into_iter()
            .map(|document| {
                let is_favorite = liked.contains(&document.id);
                document.into_post(is_favorite)
            })
            .collect())
    }

    async fn query_posts(&self, query: &Query) -> Result<Vec<PostDocument>, RepositoryError> {
        self.store
            .query(&self.collections.posts, query)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    async fn fetch_liked_ids(&self) -> Result<HashSet<Uuid>, RepositoryError> {
        let query = Query::new().where_equal(USER_ID_FIELD, self.user.id.as_str());
        self.store
            .query(&self.collections.likes, &query)
            .await?
            .into_iter()
            .map(|document| decode::<Like>(document).map(|like| like.post_id))
            .collect()
    }

    fn like_for(&self, post: &Post) -> Like {
        Like::new(post.id, self.user.id.clone())
    }
}

#[async_trait]
impl PostsRepository for StorePostsRepository {
    fn user(&self) -> &User {
        &self.user
    }

    async fn fetch_all_posts(&self) -> Result<Vec<Post>, RepositoryError> {
        self.fetch_posts(Query::new()).await
    }

    async fn fetch_posts_by_author(&self, author: &User) -> Result<Vec<Post>, RepositoryError> {
        self.fetch_posts(Query::new().where_equal(AUTHOR_ID_FIELD, author.id.as_str()))
            .await
    }

    async fn fetch_liked_posts(&self) -> Result<Vec<Post>, RepositoryError> {
        let liked = self.fetch_liked_ids().await?;
        if liked.is_empty() {
            return Ok(Vec::new());
        }

        // Membership is known from the like set, no second overlay needed
        let query = Query::new()
            .where_in(POST_ID_FIELD, liked.iter().map(Uuid::to_string))
            .order_by(TIMESTAMP_FIELD, true);
        Ok(self
            .query_posts(&query)
            .await?
            .into_iter()
            .map(|document| document.into_post(true))
            .collect())
    }

    async fn create(&self, mut post: Post) -> Result<Post, RepositoryError> {
        let local = post.image_url.clone().filter(|_| post.has_local_image());
        if let Some(local) = local {
            let durable = self
                .attachments
                .put_file(ATTACHMENT_NAMESPACE, &post.id.to_string(), &local)
                .await
                .map_err(RepositoryError::Upload)?;
            post.image_url = Some(durable);
        }

        let document = encode(&PostDocument::from(&post))?;
        self.store
            .set_document(&self.collections.posts, &post.id.to_string(), document)
            .await?;

        Ok(post.with_favorite(false))
    }

    async fn delete(&self, post: &Post) -> Result<(), RepositoryError> {
        if !self.can_delete(post) {
            return Err(RepositoryError::OwnershipViolation {
                post_id: post.id,
                user_id: self.user.id.clone(),
            });
        }

        self.store
            .delete_document(&self.collections.posts, &post.id.to_string())
            .await?;

        if let Some(url) = post
            .image_url
            .as_ref()
            .filter(|url| self.attachments.is_managed(url))
        {
            self.attachments
                .delete(url)
                .await
                .map_err(|source| RepositoryError::AttachmentCleanup {
                    post_id: post.id,
                    source,
                })?;
        }

        Ok(())
    }

    async fn like(&self, post: &Post) -> Result<(), RepositoryError> {
        let like = self.like_for(post);
        self.store
            .set_document(&self.collections.likes, &like.id(), encode(&like)?)
            .await?;
        Ok(())
    }

    async fn remove_like(&self, post: &Post) -> Result<(), RepositoryError> {
        let like = self.like_for(post);
        self.store
            .delete_document(&self.collections.likes, &like.id())
            .await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(document: Value) -> Result<T, RepositoryError> {
    serde_json::from_value(document).map_err(|e| RepositoryError::Decode(e.to_string()))
}

fn encode<T: Serialize>(value: &T) -> Result<Value, RepositoryError> {
    serde_json::to_value(value)
        .map_err(|e| RepositoryError::Store(StoreError::Serialization(e.to_string())))
}
