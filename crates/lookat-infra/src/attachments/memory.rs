//! In-memory attachment store - keeps uploaded bytes in a HashMap.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use url::Url;

use lookat_core::ports::{AttachmentStore, UploadError};

const SCHEME: &str = "memory";
const HOST: &str = "attachments";

/// In-memory attachment store.
///
/// Issues `memory://attachments/<namespace>/<id>` URLs. Note: Data is lost on process restart.
pub struct InMemoryAttachmentStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryAttachmentStore {
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Bytes stored behind `url`, if any.
    pub async fn get(&self, url: &Url) -> Option<Vec<u8>> {
        let key = Self::key_for(url)?;
        self.blobs.read().await.get(&key).cloned()
    }

    pub async fn count(&self) -> usize {
        self.blobs.read().await.len()
    }

    fn key_for(url: &Url) -> Option<String> {
        (url.scheme() == SCHEME && url.host_str() == Some(HOST))
            .then(|| url.path().trim_start_matches('/').to_string())
    }
}

impl Default for InMemoryAttachmentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttachmentStore for InMemoryAttachmentStore {
    async fn put_file(&self, namespace: &str, id: &str, local: &Url) -> Result<Url, UploadError> {
        let path = local
            .to_file_path()
            .map_err(|_| UploadError::InvalidUrl(local.to_string()))?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| UploadError::Read(format!("{}: {}", path.display(), e)))?;

        let key = format!("{namespace}/{id}");
        let url = Url::parse(&format!("{SCHEME}://{HOST}/{key}"))
            .map_err(|e| UploadError::InvalidUrl(e.to_string()))?;

        tracing::debug!(key = %key, size = bytes.len(), "Attachment stored in memory");
        self.blobs.write().await.insert(key, bytes);
        Ok(url)
    }

    async fn delete(&self, url: &Url) -> Result<(), UploadError> {
        let key = Self::key_for(url).ok_or_else(|| UploadError::InvalidUrl(url.to_string()))?;
        let removed = self.blobs.write().await.remove(&key).is_some();
        tracing::debug!(key = %key, removed, "Attachment deleted");
        Ok(())
    }

    fn is_managed(&self, url: &Url) -> bool {
        Self::key_for(url).is_some()
    }
}
