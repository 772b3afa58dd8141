//! Repository-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::UserId;
use crate::ports::{StoreError, UploadError};

/// Failures surfaced by [`PostsRepository`](crate::ports::PostsRepository) operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Upload failed during create; no post document was written.
    #[error("Attachment upload failed: {0}")]
    Upload(#[source] UploadError),

    /// The post document is gone but its attachment could not be removed.
    #[error("Post {post_id} was deleted but its attachment was not: {source}")]
    AttachmentCleanup {
        post_id: Uuid,
        #[source]
        source: UploadError,
    },

    /// Delete attempted by someone other than the author. Nothing was touched.
    #[error("User {user_id} does not own post {post_id}")]
    OwnershipViolation { post_id: Uuid, user_id: UserId },

    #[error("Stored document has an unexpected shape: {0}")]
    Decode(String),
}
