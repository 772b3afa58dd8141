use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::User;

/// Post entity - a feed entry as seen by the current user.
///
/// `is_favorite` is derived on every read from the current user's likes and is
/// never persisted. Writes go through [`PostDocument`], which has no such field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: User,
    pub image_url: Option<Url>,
    pub timestamp: DateTime<Utc>,
    pub is_favorite: bool,
}

impl Post {
    /// Create a new post authored by `author`, stamped now.
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: User) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            author,
            image_url: None,
            timestamp: Utc::now(),
            is_favorite: false,
        }
    }

    pub fn with_image(mut self, url: Url) -> Self {
        self.image_url = Some(url);
        self
    }

    /// Copy of this post with the like flag replaced.
    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    /// Case-insensitive substring match over title, content and author name.
    pub fn contains(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [&self.title, &self.content, &self.author.name]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }

    /// Whether the attachment still points at a file on this device.
    pub fn has_local_image(&self) -> bool {
        self.image_url
            .as_ref()
            .is_some_and(|url| url.scheme() == "file")
    }
}

/// Stored shape of a post in the `posts` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDocument {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: User,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<Url>,
    pub timestamp: DateTime<Utc>,
}

impl PostDocument {
    pub fn into_post(self, is_favorite: bool) -> Post {
        Post {
            id: self.id,
            title: self.title,
            content: self.content,
            author: self.author,
            image_url: self.image_url,
            timestamp: self.timestamp,
            is_favorite,
        }
    }
}

impl From<&Post> for PostDocument {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            author: post.author.clone(),
            image_url: post.image_url.clone(),
            timestamp: post.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_contains_matches_author_name_case_insensitively() {
        let post = fixtures::test_post();
        assert!(post.contains("newton"));
        assert!(post.contains("GOES UP"));
        assert!(post.contains("look@"));
        assert!(!post.contains("gravity"));
    }

    #[test]
    fn test_contains_empty_query_matches() {
        assert!(fixtures::test_post().contains(""));
    }

    #[test]
    fn test_document_never_carries_favorite_flag() {
        let post = fixtures::test_post().with_favorite(true);
        let json = serde_json::to_value(PostDocument::from(&post)).unwrap();

        let object = json.as_object().unwrap();
        assert!(!object.contains_key("isFavorite"));
        assert!(!object.contains_key("is_favorite"));
        assert_eq!(json["author"]["id"], serde_json::json!(post.author.id.as_str()));
        assert_eq!(json["id"], serde_json::json!(post.id.to_string()));
        assert!(object.contains_key("imageURL"));
    }

    #[test]
    fn test_document_restores_post_with_given_flag() {
        let post = fixtures::test_post();
        let restored = PostDocument::from(&post).into_post(true);
        assert_eq!(restored, post.clone().with_favorite(true));
    }

    #[test]
    fn test_has_local_image() {
        let post = fixtures::test_post();
        assert!(!post.has_local_image());

        let local = post
            .clone()
            .with_image(Url::parse("file:///tmp/photo.jpg").unwrap());
        assert!(local.has_local_image());

        let remote = post.with_image(Url::parse("https://cdn.example.com/p.jpg").unwrap());
        assert!(!remote.has_local_image());
    }
}
