//! # LookAt Infrastructure
//!
//! Concrete implementations of the ports defined in `lookat-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory and filesystem only
//! - `redis` - Redis-backed document store

pub mod attachments;
pub mod store;
pub mod stub;

// Re-exports - In-Memory / local
pub use attachments::{InMemoryAttachmentStore, LocalAttachmentConfig, LocalAttachmentStore};
pub use store::InMemoryDocumentStore;
pub use stub::PostsRepositoryStub;

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use store::{RedisConfig, RedisDocumentStore};

#[cfg(test)]
mod tests;
