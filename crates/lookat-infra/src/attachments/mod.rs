//! Attachment store implementations - local filesystem and in-memory.

mod local;
mod memory;

pub use local::{LocalAttachmentConfig, LocalAttachmentStore};
pub use memory::InMemoryAttachmentStore;
