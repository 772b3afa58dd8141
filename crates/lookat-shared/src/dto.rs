//! Data Transfer Objects - request/response types for front ends.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

/// Form input for a new post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image_path: Option<PathBuf>,
}

impl NewPostRequest {
    /// `file://` URL for the attached image, if any.
    pub fn image_url(&self) -> Result<Option<Url>, InvalidImagePath> {
        self.image_path
            .as_ref()
            .map(|path| {
                let absolute = std::path::absolute(path).map_err(|_| InvalidImagePath(path.clone()))?;
                Url::from_file_path(&absolute).map_err(|_| InvalidImagePath(path.clone()))
            })
            .transpose()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Image path cannot be used as an attachment: {}", .0.display())]
pub struct InvalidImagePath(pub PathBuf);

/// A post as shown to the current user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub timestamp: String,
    pub is_favorite: bool,
}
