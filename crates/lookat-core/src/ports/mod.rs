//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod attachment_store;
mod document_store;
mod repository;

pub use attachment_store::{AttachmentStore, UploadError};
pub use document_store::{DocumentStore, Filter, OrderBy, Query, StoreError};
pub use repository::PostsRepository;
