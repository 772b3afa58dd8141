//! Fixture repository for previews and tests - serves a fixed view state.

use std::time::Duration;

use async_trait::async_trait;

use lookat_core::RepositoryError;
use lookat_core::domain::{Post, User};
use lookat_core::fixtures;
use lookat_core::ports::{PostsRepository, StoreError};
use lookat_shared::Loadable;

/// Repository that replays a fixed [`Loadable`] for every fetch.
///
/// Mutations succeed without doing anything.
pub struct PostsRepositoryStub {
    state: Loadable<Vec<Post>>,
    user: User,
    delay: Duration,
}

impl PostsRepositoryStub {
    pub fn new(state: Loadable<Vec<Post>>) -> Self {
        Self {
            state,
            user: fixtures::test_user(),
            delay: Duration::ZERO,
        }
    }

    /// Wait this long before answering a fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = user;
        self
    }

    async fn simulate(&self) -> Result<Vec<Post>, RepositoryError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.state {
            Loadable::Loaded(posts) => Ok(posts.clone()),
            Loadable::Error(cause) => Err(StoreError::Backend(cause.to_string()).into()),
            Loadable::Loading => Err(StoreError::Backend(format!(
                "still loading after {:?}",
                self.delay
            ))
            .into()),
        }
    }
}

#[async_trait]
impl PostsRepository for PostsRepositoryStub {
    fn user(&self) -> &User {
        &self.user
    }

    async fn fetch_all_posts(&self) -> Result<Vec<Post>, RepositoryError> {
        self.simulate().await
    }

    async fn fetch_posts_by_author(&self, _author: &User) -> Result<Vec<Post>, RepositoryError> {
        self.simulate().await
    }

    async fn fetch_liked_posts(&self) -> Result<Vec<Post>, RepositoryError> {
        self.simulate().await
    }

    async fn create(&self, post: Post) -> Result<Post, RepositoryError> {
        Ok(post)
    }

    async fn delete(&self, _post: &Post) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn like(&self, _post: &Post) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn remove_like(&self, _post: &Post) -> Result<(), RepositoryError> {
        Ok(())
    }
}
