//! Filesystem attachment store - copies uploads under a root directory and
//! serves them from a public base URL.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use url::Url;

use lookat_core::ports::{AttachmentStore, UploadError};

/// Local attachment storage configuration.
#[derive(Debug, Clone)]
pub struct LocalAttachmentConfig {
    /// Directory holding `<namespace>/<id>` files
    pub root: PathBuf,
    /// URL the root directory is published under
    pub public_base_url: Url,
}

impl Default for LocalAttachmentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./attachments"),
            public_base_url: default_base_url(),
        }
    }
}

impl LocalAttachmentConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let public_base_url = match std::env::var("ATTACHMENTS_BASE_URL") {
            Ok(raw) => Url::parse(&raw).unwrap_or_else(|e| {
                tracing::warn!(url = %raw, error = %e, "Invalid ATTACHMENTS_BASE_URL, using default");
                default_base_url()
            }),
            Err(_) => default_base_url(),
        };

        Self {
            root: std::env::var("ATTACHMENTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./attachments")),
            public_base_url,
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("http://localhost:8080/attachments/").expect("static URL is valid")
}

/// Attachment store backed by a local directory.
pub struct LocalAttachmentStore {
    root: PathBuf,
    base_url: Url,
}

impl LocalAttachmentStore {
    pub fn new(config: LocalAttachmentConfig) -> Self {
        let mut base_url = config.public_base_url;
        // Url::join drops the last segment unless the base ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            root: config.root,
            base_url,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path relative to the base URL, e.g. `posts/<id>`.
    fn relative_path<'a>(&self, url: &'a Url) -> Option<&'a str> {
        if url.scheme() != self.base_url.scheme()
            || url.host_str() != self.base_url.host_str()
            || url.port_or_known_default() != self.base_url.port_or_known_default()
        {
            return None;
        }
        url.path().strip_prefix(self.base_url.path())
    }
}

fn check_segment(segment: &str) -> Result<(), UploadError> {
    if segment.is_empty() || segment == "." || segment == ".." || segment.contains(['/', '\\']) {
        return Err(UploadError::InvalidUrl(format!(
            "invalid attachment path segment: {segment:?}"
        )));
    }
    Ok(())
}

#[async_trait]
impl AttachmentStore for LocalAttachmentStore {
    async fn put_file(&self, namespace: &str, id: &str, local: &Url) -> Result<Url, UploadError> {
        check_segment(namespace)?;
        check_segment(id)?;

        let source = local
            .to_file_path()
            .map_err(|_| UploadError::InvalidUrl(local.to_string()))?;
        let bytes = tokio::fs::read(&source)
            .await
            .map_err(|e| UploadError::Read(format!("{}: {}", source.display(), e)))?;

        let directory = self.root.join(namespace);
        tokio::fs::create_dir_all(&directory)
            .await
            .map_err(|e| UploadError::Write(e.to_string()))?;
        let destination = directory.join(id);
        tokio::fs::write(&destination, &bytes)
            .await
            .map_err(|e| UploadError::Write(format!("{}: {}", destination.display(), e)))?;

        let url = self
            .base_url
            .join(&format!("{namespace}/{id}"))
            .map_err(|e| UploadError::InvalidUrl(e.to_string()))?;

        tracing::debug!(path = %destination.display(), url = %url, "Attachment stored");
        Ok(url)
    }

    async fn delete(&self, url: &Url) -> Result<(), UploadError> {
        let relative = self
            .relative_path(url)
            .ok_or_else(|| UploadError::InvalidUrl(url.to_string()))?;

        let mut path = self.root.clone();
        for segment in relative.split('/') {
            check_segment(segment)?;
            path.push(segment);
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Attachment deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Attachment already gone");
                Ok(())
            }
            Err(e) => Err(UploadError::Delete(format!("{}: {}", path.display(), e))),
        }
    }

    fn is_managed(&self, url: &Url) -> bool {
        self.relative_path(url).is_some_and(|path| !path.is_empty())
    }
}
