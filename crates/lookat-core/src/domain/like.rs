use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// A user's like of a post, stored in the `likes` collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Like {
    #[serde(rename = "postID")]
    pub post_id: Uuid,
    #[serde(rename = "userID")]
    pub user_id: UserId,
}

impl Like {
    pub fn new(post_id: Uuid, user_id: UserId) -> Self {
        Self { post_id, user_id }
    }

    /// Composite document key `<postID>-<userID>`.
    ///
    /// At most one like per (post, user) pair can exist under this key.
    pub fn id(&self) -> String {
        format!("{}-{}", self.post_id, self.user_id)
    }
}
