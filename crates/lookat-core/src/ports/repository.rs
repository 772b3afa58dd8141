use async_trait::async_trait;

use crate::domain::{Post, User};
use crate::error::RepositoryError;

/// Posts repository - the data-access boundary used by the presentation layer.
///
/// Every fetch overlays the current user's likes onto `Post::is_favorite`.
#[async_trait]
pub trait PostsRepository: Send + Sync {
    /// The authenticated user this repository acts for.
    fn user(&self) -> &User;

    /// All posts, newest first.
    async fn fetch_all_posts(&self) -> Result<Vec<Post>, RepositoryError>;

    /// Posts written by `author`, newest first.
    async fn fetch_posts_by_author(&self, author: &User) -> Result<Vec<Post>, RepositoryError>;

    /// Posts the current user has liked, newest first.
    async fn fetch_liked_posts(&self) -> Result<Vec<Post>, RepositoryError>;

    /// Persist a new post, uploading a local attachment first.
    /// Returns the post as stored.
    async fn create(&self, post: Post) -> Result<Post, RepositoryError>;

    /// Delete a post owned by the current user, together with its attachment.
    async fn delete(&self, post: &Post) -> Result<(), RepositoryError>;

    async fn like(&self, post: &Post) -> Result<(), RepositoryError>;

    async fn remove_like(&self, post: &Post) -> Result<(), RepositoryError>;

    /// Only authors may delete their posts.
    fn can_delete(&self, post: &Post) -> bool {
        post.author.id == self.user().id
    }
}
