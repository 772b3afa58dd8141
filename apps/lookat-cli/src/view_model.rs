//! Feed view state - holds the loaded posts and maps repository results into it.

use std::sync::Arc;

use uuid::Uuid;

use lookat_core::RepositoryError;
use lookat_core::domain::{Post, User};
use lookat_core::ports::PostsRepository;
use lookat_shared::Loadable;

/// Which slice of the feed the view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedFilter {
    All,
    Author(User),
    Liked,
}

pub struct FeedViewModel {
    repository: Arc<dyn PostsRepository>,
    filter: FeedFilter,
    posts: Loadable<Vec<Post>>,
}

impl FeedViewModel {
    pub fn new(repository: Arc<dyn PostsRepository>, filter: FeedFilter) -> Self {
        Self {
            repository,
            filter,
            posts: Loadable::Loading,
        }
    }

    pub fn posts(&self) -> &Loadable<Vec<Post>> {
        &self.posts
    }

    pub fn can_delete(&self, post: &Post) -> bool {
        self.repository.can_delete(post)
    }

    /// Reload the feed. Failures end up in the view state, not in the caller.
    pub async fn fetch_posts(&mut self) {
        self.posts = Loadable::Loading;

        let result = match &self.filter {
            FeedFilter::All => self.repository.fetch_all_posts().await,
            FeedFilter::Author(author) => self.repository.fetch_posts_by_author(author).await,
            FeedFilter::Liked => self.repository.fetch_liked_posts().await,
        };

        if let Err(e) = &result {
            tracing::error!(error = %e, filter = ?self.filter, "Cannot fetch posts");
        }
        self.posts = result.into();
    }

    pub fn find(&self, id: Uuid) -> Option<&Post> {
        self.posts.value()?.iter().find(|post| post.id == id)
    }

    /// Loaded posts matching `query`.
    pub fn search(&self, query: &str) -> Vec<&Post> {
        self.posts
            .value()
            .map(|posts| posts.iter().filter(|post| post.contains(query)).collect())
            .unwrap_or_default()
    }

    pub async fn create(&mut self, post: Post) -> Result<Post, RepositoryError> {
        let created = self.repository.create(post).await?;
        if self.shows(&created) {
            if let Some(posts) = self.posts.value_mut() {
                posts.insert(0, created.clone());
            }
        }
        Ok(created)
    }

    /// Delete a post. A leftover attachment is logged, not reported: the post is gone.
    pub async fn delete(&mut self, post: &Post) -> Result<(), RepositoryError> {
        match self.repository.delete(post).await {
            Ok(()) => {}
            Err(RepositoryError::AttachmentCleanup { post_id, source }) => {
                tracing::warn!(%post_id, error = %source, "Post deleted, attachment left behind");
            }
            Err(e) => return Err(e),
        }

        if let Some(posts) = self.posts.value_mut() {
            posts.retain(|p| p.id != post.id);
        }
        Ok(())
    }

    /// Like or unlike `post`. Returns the new favorite state.
    pub async fn toggle_favorite(&mut self, post: &Post) -> Result<bool, RepositoryError> {
        let is_favorite = !post.is_favorite;
        if is_favorite {
            self.repository.like(post).await?;
        } else {
            self.repository.remove_like(post).await?;
        }

        let drop_from_view = !is_favorite && self.filter == FeedFilter::Liked;
        if let Some(posts) = self.posts.value_mut() {
            if drop_from_view {
                posts.retain(|p| p.id != post.id);
            } else if let Some(local) = posts.iter_mut().find(|p| p.id == post.id) {
                local.is_favorite = is_favorite;
            }
        }
        Ok(is_favorite)
    }

    fn shows(&self, post: &Post) -> bool {
        match &self.filter {
            FeedFilter::All => true,
            FeedFilter::Author(author) => post.author.id == author.id,
            FeedFilter::Liked => post.is_favorite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use lookat_core::StorePostsRepository;
    use lookat_core::fixtures;
    use lookat_infra::{InMemoryAttachmentStore, InMemoryDocumentStore, PostsRepositoryStub};

    #[derive(Debug, thiserror::Error)]
    #[error("offline")]
    struct Offline;

    fn in_memory() -> Arc<dyn PostsRepository> {
        Arc::new(StorePostsRepository::new(
            fixtures::test_user(),
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(InMemoryAttachmentStore::new()),
        ))
    }

    #[tokio::test]
    async fn test_fetch_maps_success_into_loaded() {
        let posts = vec![fixtures::test_post()];
        let stub = Arc::new(PostsRepositoryStub::new(Loadable::Loaded(posts.clone())));
        let mut model = FeedViewModel::new(stub, FeedFilter::All);
        assert!(model.posts().is_loading());

        model.fetch_posts().await;
        assert_eq!(model.posts().value(), Some(&posts));
    }

    #[tokio::test]
    async fn test_fetch_maps_failure_into_error_state() {
        let stub = Arc::new(PostsRepositoryStub::new(Loadable::error(Offline)));
        let mut model = FeedViewModel::new(stub, FeedFilter::Liked);

        model.fetch_posts().await;
        assert!(model.posts().failure().is_some());
        assert!(model.search("").is_empty());
    }

    #[tokio::test]
    async fn test_create_inserts_at_front() {
        let repository = in_memory();
        let older = repository.create(fixtures::test_post()).await.unwrap();
        let mut model = FeedViewModel::new(repository, FeedFilter::All);
        model.fetch_posts().await;

        let newer = model
            .create(Post::new("Principia", "Three laws", fixtures::test_user()))
            .await
            .unwrap();

        let ids: Vec<Uuid> = model.posts().value().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[tokio::test]
    async fn test_toggle_favorite_and_liked_filter() {
        let repository = in_memory();
        let post = repository.create(fixtures::test_post()).await.unwrap();

        let mut all = FeedViewModel::new(repository.clone(), FeedFilter::All);
        all.fetch_posts().await;
        assert!(all.toggle_favorite(&post).await.unwrap());
        assert!(all.find(post.id).unwrap().is_favorite);

        let mut liked = FeedViewModel::new(repository, FeedFilter::Liked);
        liked.fetch_posts().await;
        let loaded = liked.find(post.id).unwrap().clone();
        assert!(loaded.is_favorite);

        assert!(!liked.toggle_favorite(&loaded).await.unwrap());
        assert!(liked.find(post.id).is_none());
    }

    #[tokio::test]
    async fn test_delete_and_search() {
        let repository = in_memory();
        let post = repository.create(fixtures::test_post()).await.unwrap();
        let mut model = FeedViewModel::new(repository, FeedFilter::All);
        model.fetch_posts().await;

        assert_eq!(model.search("NEWTON").len(), 1);
        assert!(model.search("gravity").is_empty());

        assert!(model.can_delete(&post));
        model.delete(&post).await.unwrap();
        assert!(model.posts().value().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_of_foreign_post_is_refused() {
        let repository = in_memory();
        let foreign = repository
            .create(Post::new("Hooke's law", "ut tensio, sic vis", User::new("hooke", "Robert Hooke")))
            .await
            .unwrap();
        let mut model = FeedViewModel::new(repository, FeedFilter::All);
        model.fetch_posts().await;

        let err = model.delete(&foreign).await.unwrap_err();
        assert!(matches!(err, RepositoryError::OwnershipViolation { .. }));
        assert_eq!(model.posts().value().unwrap().len(), 1);
    }
}
