//! Attachment store port - namespaced blob storage addressed by URL.

use async_trait::async_trait;
use url::Url;

/// Attachment store trait - turns local files into durable, retrievable URLs.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Upload the file at `local` (a `file://` URL) under `namespace/id`.
    /// Returns the durable URL of the stored copy.
    async fn put_file(&self, namespace: &str, id: &str, local: &Url) -> Result<Url, UploadError>;

    /// Delete the blob behind `url`. A blob that no longer exists is not an error.
    async fn delete(&self, url: &Url) -> Result<(), UploadError>;

    /// Whether `url` was issued by this store.
    fn is_managed(&self, url: &Url) -> bool;
}

/// Attachment upload/delete errors.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Failed to read local file: {0}")]
    Read(String),

    #[error("Failed to store attachment: {0}")]
    Write(String),

    #[error("Failed to delete attachment: {0}")]
    Delete(String),

    #[error("Invalid attachment URL: {0}")]
    InvalidUrl(String),
}
